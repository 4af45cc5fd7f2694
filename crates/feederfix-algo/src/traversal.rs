use feederfix_core::{DeviceRef, Direction, FeederResult, NetworkModel, SectionId};
use tracing::trace;

/// Depth-bounded view over a network walk, seen from one source section.
///
/// - Meeting the source section again widens the horizon by one hop and the
///   section itself is skipped.
/// - Past the horizon, an upstream walk ends; a downstream walk skips that
///   section and keeps going, since a meshed lateral may come back at a
///   shallower depth.
pub struct DirectionalTraversal<I> {
    inner: I,
    start: SectionId,
    direction: Direction,
    depth_max: usize,
    done: bool,
}

impl<I> DirectionalTraversal<I>
where
    I: Iterator<Item = (SectionId, usize)>,
{
    pub fn new(inner: I, start: SectionId, direction: Direction, depth_max: usize) -> Self {
        Self {
            inner,
            start,
            direction,
            depth_max,
            done: false,
        }
    }

    /// Current horizon, including any widening from meeting the start section.
    pub fn depth_max(&self) -> usize {
        self.depth_max
    }
}

impl<I> Iterator for DirectionalTraversal<I>
where
    I: Iterator<Item = (SectionId, usize)>,
{
    type Item = (SectionId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let (section, depth) = self.inner.next()?;
            if section == self.start {
                self.depth_max += 1;
                continue;
            }
            if depth > self.depth_max {
                match self.direction {
                    Direction::Upstream => {
                        trace!(section = %section, depth, "upstream horizon reached");
                        self.done = true;
                        return None;
                    }
                    Direction::Downstream => continue,
                }
            }
            return Some((section, depth));
        }
    }
}

/// Start a bounded walk from a device's section: upstream from its from-node,
/// downstream from its to-node.
pub fn traverse<'a, N: NetworkModel>(
    model: &'a N,
    device: &DeviceRef,
    direction: Direction,
    depth_max: usize,
) -> FeederResult<DirectionalTraversal<Box<dyn Iterator<Item = (SectionId, usize)> + 'a>>> {
    let (from, to) = model.section_endpoints(&device.section)?;
    let start = match direction {
        Direction::Upstream => from,
        Direction::Downstream => to,
    };
    let walk = model.walk(&start, direction)?;
    Ok(DirectionalTraversal::new(
        walk,
        device.section.clone(),
        direction,
        depth_max,
    ))
}
