//! Cancellable waiting between attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Granularity at which [`InterruptibleSleeper`] checks for shutdown.
const SLICE: Duration = Duration::from_millis(100);

/// Something that can wait for a duration.
pub trait Sleeper {
    /// Wait for `duration`. Returns `false` when the wait was cancelled early.
    fn sleep(&self, duration: Duration) -> bool;
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    fn sleep(&self, duration: Duration) -> bool {
        (**self).sleep(duration)
    }
}

/// Sleeps the full duration unless a shared shutdown flag is raised.
#[derive(Debug, Clone, Default)]
pub struct InterruptibleSleeper {
    shutdown: Arc<AtomicBool>,
}

impl InterruptibleSleeper {
    pub fn new(shutdown: Arc<AtomicBool>) -> Self {
        Self { shutdown }
    }

    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

impl Sleeper for InterruptibleSleeper {
    fn sleep(&self, duration: Duration) -> bool {
        // A deadline past what Instant can represent waits until shutdown.
        let deadline = Instant::now().checked_add(duration);
        loop {
            if self.is_shutdown() {
                return false;
            }
            let remaining = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return true;
                    }
                    deadline - now
                }
                None => SLICE,
            };
            thread::sleep(SLICE.min(remaining));
        }
    }
}
