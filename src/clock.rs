//! Simulated time.

use std::fmt::{self, Display};

use tokio::time::Duration;

/// Compresses simulated time into real time.
///
/// Every configured duration is simulated. A scale of 5000 turns a 30 second simulated tick into a
/// 6ms real sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeScale(u32);

impl TimeScale {
    /// Returns `None` for a zero scale.
    pub fn new(scale: u32) -> Option<Self> {
        (scale > 0).then_some(Self(scale))
    }

    /// How many simulated seconds pass per real second.
    pub fn factor(&self) -> u32 {
        self.0
    }

    /// How long to really wait for a simulated duration.
    pub fn compress(&self, simulated: Duration) -> Duration {
        simulated / self.0
    }

    /// How much simulated time a real elapsed duration stands for.
    pub fn expand(&self, real: Duration) -> Duration {
        real.saturating_mul(self.0)
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self(5000)
    }
}

impl Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{}", self.0)
    }
}
