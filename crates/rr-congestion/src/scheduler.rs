//! Background congestion refresh.
//!
//! # Lifecycle
//!
//! ```text
//! start(interval, g) ─▶ [spawn thread] ─▶ tick ─▶ wait ─▶ tick ─▶ wait ─▶ …
//!                                                   │
//! stop() ──────────── stop signal ──────────────────┘─▶ thread exits ─▶ join
//! ```
//!
//! The first tick runs immediately.  Ticks are scheduled at a fixed rate; a
//! slow tick delays the next one but does not cause a burst of catch-up
//! ticks.  `stop()` joins the thread before returning, so no `upsert` from
//! that schedule can happen afterwards.  Only one schedule is active per
//! scheduler; `start` cancels and joins the previous one first.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::{CongestionError, CongestionGenerator, CongestionLedger, CongestionResult};

/// Default refresh cadence: 30 s.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(30_000);

struct ActiveRefresh {
    stop_tx:  mpsc::Sender<()>,
    handle:   JoinHandle<()>,
    interval: Duration,
}

impl ActiveRefresh {
    fn shutdown(self) {
        // A send error means the thread already exited.
        let _ = self.stop_tx.send(());
        if self.handle.join().is_err() {
            error!("congestion refresh thread panicked");
        }
    }
}

/// Periodically feeds a [`CongestionGenerator`] into a [`CongestionLedger`].
pub struct RefreshScheduler {
    ledger: Arc<CongestionLedger>,
    active: Mutex<Option<ActiveRefresh>>,
}

impl RefreshScheduler {
    pub fn new(ledger: Arc<CongestionLedger>) -> Self {
        Self { ledger, active: Mutex::new(None) }
    }

    pub fn ledger(&self) -> &Arc<CongestionLedger> {
        &self.ledger
    }

    /// Begin refreshing every `interval`, replacing any running schedule.
    ///
    /// # Errors
    ///
    /// [`CongestionError::InvalidInterval`] for a zero interval and
    /// [`CongestionError::Spawn`] if the thread cannot be created.  The
    /// previous schedule is stopped in either case.
    pub fn start<G: CongestionGenerator>(&self, interval: Duration, generator: G) -> CongestionResult<()> {
        let mut active = self.active.lock();
        if let Some(previous) = active.take() {
            previous.shutdown();
            info!("replaced congestion refresh schedule");
        }
        if interval.is_zero() {
            return Err(CongestionError::InvalidInterval);
        }

        let (stop_tx, stop_rx) = mpsc::channel();
        let ledger = Arc::clone(&self.ledger);
        let handle = thread::Builder::new()
            .name("congestion-refresh".into())
            .spawn(move || run_refresh_loop(&ledger, generator, interval, &stop_rx))?;

        info!(interval_ms = interval.as_millis() as u64, "congestion refresh started");
        *active = Some(ActiveRefresh { stop_tx, handle, interval });
        Ok(())
    }

    /// Cancel the active schedule and wait for its thread to finish.
    /// Does nothing when no schedule is running.
    pub fn stop(&self) {
        if let Some(active) = self.active.lock().take() {
            active.shutdown();
            info!("congestion refresh stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|a| !a.handle.is_finished())
    }

    /// Interval of the running schedule, if any.
    pub fn interval(&self) -> Option<Duration> {
        self.active.lock().as_ref().map(|a| a.interval)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Worker ────────────────────────────────────────────────────────────────────

fn run_refresh_loop<G: CongestionGenerator>(
    ledger:        &CongestionLedger,
    mut generator: G,
    interval:      Duration,
    stop_rx:       &mpsc::Receiver<()>,
) {
    let mut tick: u64 = 0;
    let mut next = Instant::now();
    loop {
        refresh_once(ledger, &mut generator, tick);
        tick += 1;

        next += interval;
        let now = Instant::now();
        if next < now {
            next = now;
        }
        match stop_rx.recv_timeout(next - now) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!(ticks = tick, "congestion refresh loop exited");
}

/// Run one generation and apply it.  Errors and panics from the generator
/// are logged and swallowed so the next tick still runs.
fn refresh_once<G: CongestionGenerator>(ledger: &CongestionLedger, generator: &mut G, tick: u64) {
    match panic::catch_unwind(AssertUnwindSafe(|| generator.generate())) {
        Ok(Ok(samples)) => match ledger.upsert(samples) {
            Ok(applied) => debug!(tick, applied, "congestion refreshed"),
            Err(e) => warn!(tick, error = %e, "rejected congestion batch"),
        },
        Ok(Err(e)) => warn!(tick, error = %e, "congestion generator failed"),
        Err(_) => error!(tick, "congestion generator panicked"),
    }
}
