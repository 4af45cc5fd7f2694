//! Load quantity for feeder nodes and sections.
//!
//! Spot loads and aggregated downstream loads are both kVA; the similarity
//! gate only ever sees the raw `f64` through [`KiloVoltAmperes::value`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Apparent power in kilovolt-amperes (kVA)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KiloVoltAmperes(pub f64);

impl KiloVoltAmperes {
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Add for KiloVoltAmperes {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for KiloVoltAmperes {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|x| x.0).sum())
    }
}

impl fmt::Display for KiloVoltAmperes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} kVA", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtree_loads_sum() {
        let total: KiloVoltAmperes = [10.0, 20.5, 4.5]
            .into_iter()
            .map(KiloVoltAmperes)
            .sum();
        assert_eq!(total.value(), 35.0);
        assert_eq!((total + KiloVoltAmperes(5.0)).value(), 40.0);
    }

    #[test]
    fn display_includes_unit() {
        assert_eq!(KiloVoltAmperes(12.345).to_string(), "12.35 kVA");
    }
}
