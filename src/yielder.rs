use crate::host::Host;
use std::time::{Duration, Instant};

/// Tracks when the guest last gave control back to the host.
#[derive(Debug)]
pub struct SleepingYielder {
    pause: Duration,
    last_yield: Instant,
}

impl SleepingYielder {
    pub fn new(pause: Duration) -> Self {
        Self {
            pause,
            last_yield: Instant::now(),
        }
    }

    pub fn reset(&mut self) {
        self.last_yield = Instant::now();
    }

    /// Suspends for one host tick, then restarts the timer.
    pub fn force_yield<H: Host>(&mut self, host: &mut H) {
        host.yield_now(self.pause);
        self.reset();
    }

    /// Time since the last yield or reset.
    pub fn elapsed(&self) -> Duration {
        self.last_yield.elapsed()
    }
}
