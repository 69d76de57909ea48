use std::time::Duration;

/// Gates simulation steps to a fixed update interval while frames run at
/// their own cadence.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    pending: Duration,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "update interval must be positive");
        Ticker { interval, pending: Duration::ZERO }
    }

    /// Feeds the time since the last frame. Returns true when a step is due.
    /// At most one step fires per call; backlog beyond one interval is
    /// dropped so a stalled frame doesn't cause a burst of steps.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.pending += elapsed;
        if self.pending < self.interval {
            return false;
        }

        self.pending -= self.interval;
        if self.pending >= self.interval {
            self.pending = Duration::ZERO;
        }
        true
    }

    pub fn reset(&mut self) {
        self.pending = Duration::ZERO;
    }
}
