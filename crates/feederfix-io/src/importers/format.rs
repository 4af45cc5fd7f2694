//! Study file format detection.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("study file '{0}' has no extension; expected .toml or .json")]
    MissingExtension(String),
    #[error("unsupported study file extension '.{0}'; expected .toml or .json")]
    UnknownExtension(String),
}

/// Supported study file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    pub const ALL: &'static [Format] = &[Format::Toml, Format::Json];

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Toml => &["toml"],
            Format::Json => &["json"],
        }
    }

    pub fn friendly_name(&self) -> &'static str {
        match self {
            Format::Toml => "TOML study",
            Format::Json => "JSON study",
        }
    }

    /// Pick the format from the file extension (case-insensitive).
    pub fn detect(path: &Path) -> Result<Format, FormatError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| FormatError::MissingExtension(path.display().to_string()))?;
        Self::ALL
            .iter()
            .copied()
            .find(|format| {
                format
                    .extensions()
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(ext))
            })
            .ok_or_else(|| FormatError::UnknownExtension(ext.to_string()))
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.friendly_name())
    }
}
