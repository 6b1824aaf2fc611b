//! Periodic and foreground-triggered sweep driver.
//!
//! [`ExpirationScheduler`] owns the background task that invokes the
//! reconciler on a fixed cadence and on app-foreground transitions. The
//! timer and the lifecycle subscription live inside one task owned by a
//! [`CancellationToken`]; `stop()` cancels the token, which releases both
//! on every exit path. An in-flight sweep is never cancelled mid-run.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::lifecycle::{LifecycleEvent, LifecycleSignal};
use crate::reconciler::{Reconciler, SweepOutcome};

/// Snapshot of scheduler state for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStatus {
    pub running: bool,
    pub poll_interval: Duration,
    pub sweep_in_flight: bool,
}

struct RunningTask {
    cancel: CancellationToken,
    // Held so the task is owned for the scheduler's lifetime; the task
    // exits via the token, not via abort.
    _handle: JoinHandle<()>,
}

/// Drives the reconciler on a cadence and on foreground events.
pub struct ExpirationScheduler {
    reconciler: Arc<Reconciler>,
    lifecycle: Arc<LifecycleSignal>,
    config: EngineConfig,
    running: Mutex<Option<RunningTask>>,
}

impl ExpirationScheduler {
    pub fn new(
        reconciler: Arc<Reconciler>,
        lifecycle: Arc<LifecycleSignal>,
        config: EngineConfig,
    ) -> Self {
        Self {
            reconciler,
            lifecycle,
            config,
            running: Mutex::new(None),
        }
    }

    /// Start the background sweep task. No-op if already running.
    ///
    /// The first sweep runs after the configured initial delay, then on the
    /// fixed poll interval. Foreground transitions trigger an immediate
    /// sweep unless one was foreground-triggered within the debounce
    /// window.
    pub fn start(&self) {
        let mut slot = self.running.lock().expect("scheduler state lock poisoned");
        if slot.is_some() {
            tracing::debug!("Scheduler already running, start ignored");
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.reconciler),
            self.lifecycle.subscribe(),
            self.config.clone(),
            cancel.clone(),
        ));
        *slot = Some(RunningTask {
            cancel,
            _handle: handle,
        });

        tracing::info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            initial_delay_secs = self.config.initial_delay.as_secs(),
            "Expiration scheduler started"
        );
    }

    /// Stop future ticks. The in-flight sweep, if any, finishes on its own.
    /// No-op when not running.
    pub fn stop(&self) {
        let mut slot = self.running.lock().expect("scheduler state lock poisoned");
        match slot.take() {
            Some(task) => {
                task.cancel.cancel();
                tracing::info!("Expiration scheduler stopped");
            }
            None => tracing::debug!("Scheduler not running, stop ignored"),
        }
    }

    /// Current scheduler state.
    pub fn status(&self) -> SchedulerStatus {
        let running = self
            .running
            .lock()
            .expect("scheduler state lock poisoned")
            .is_some();
        SchedulerStatus {
            running,
            poll_interval: self.config.poll_interval,
            sweep_in_flight: self.reconciler.sweep_in_flight(),
        }
    }
}

async fn run_loop(
    reconciler: Arc<Reconciler>,
    mut lifecycle: broadcast::Receiver<LifecycleEvent>,
    config: EngineConfig,
    cancel: CancellationToken,
) {
    // The initial delay avoids reprocessing stale state immediately after
    // process start.
    let mut ticker = interval_at(
        Instant::now() + config.initial_delay,
        config.poll_interval,
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_foreground_sweep: Option<Instant> = None;
    let mut lifecycle_open = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Expiration scheduler cancelled");
                break;
            }
            _ = ticker.tick() => {
                run_sweep(&reconciler).await;
            }
            event = lifecycle.recv(), if lifecycle_open => match event {
                Ok(LifecycleEvent::Foreground) => {
                    let debounced = last_foreground_sweep
                        .is_some_and(|at| at.elapsed() < config.foreground_debounce);
                    if debounced {
                        tracing::debug!("Foreground sweep debounced");
                    } else {
                        last_foreground_sweep = Some(Instant::now());
                        run_sweep(&reconciler).await;
                    }
                }
                Ok(LifecycleEvent::Background) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Lifecycle receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("Lifecycle signal closed, continuing on timer only");
                    lifecycle_open = false;
                }
            }
        }
    }
}

/// Invoke one sweep, absorbing the outcome: the timer must never stop.
async fn run_sweep(reconciler: &Reconciler) {
    match reconciler.sweep().await {
        SweepOutcome::Completed(_) => {}
        SweepOutcome::AlreadyRunning => {
            tracing::debug!("Sweep already in flight, request dropped");
        }
    }
}
