// src/cooking/timer.rs - Elapsed-time ticker for a cooking session

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Tick period of the elapsed counter.
pub const TICK: Duration = Duration::from_secs(1);

/// Shared flag marking a session as torn down.
///
/// Cloned into the ticker and handed out to whoever owns the view, so the
/// session can be abandoned while one of its requests is still in flight.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Counts whole seconds on a background task until stopped or dropped.
///
/// Must be started from within a tokio runtime.
#[derive(Debug)]
pub struct CookingTimer {
    elapsed: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl CookingTimer {
    pub fn start(cancel: CancellationToken) -> Self {
        Self::with_period(TICK, cancel)
    }

    pub fn with_period(period: Duration, cancel: CancellationToken) -> Self {
        let elapsed = Arc::new(AtomicU64::new(0));
        let counter = elapsed.clone();

        let handle = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                if cancel.is_cancelled() {
                    break;
                }
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        Self { elapsed, handle }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    /// Cancel the ticker and return the seconds counted so far.
    pub fn stop(self) -> u64 {
        self.handle.abort();
        self.elapsed_seconds()
    }
}

impl Drop for CookingTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
