use crate::frames::{Frame, Phase};

/// Counts completed work sessions from a stream of emitted frames.
///
/// Looks at consecutive pairs of frames and counts each work -> break
/// boundary. The first frame has no predecessor and never counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCounter {
    previous: Option<Phase>,
    elapsed: u32,
}

impl SessionCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next emitted frame.
    ///
    /// Returns the new tally when `frame` closes a work session.
    pub fn observe(&mut self, frame: &Frame) -> Option<u32> {
        let current = frame.phase();
        let previous = self.previous.replace(current);

        if previous == Some(Phase::Work) && current == Phase::Break {
            self.elapsed += 1;
            Some(self.elapsed)
        } else {
            None
        }
    }

    /// Sessions completed so far
    #[must_use]
    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Every tally value produced by feeding `frames` in order
    pub fn count<'a, I>(frames: I) -> Vec<u32>
    where
        I: IntoIterator<Item = &'a Frame>,
    {
        let mut counter = Self::new();
        frames
            .into_iter()
            .filter_map(|frame| counter.observe(frame))
            .collect()
    }
}
