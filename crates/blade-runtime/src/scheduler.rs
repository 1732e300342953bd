//! # Phase scheduler
//!
//! Drives the behavior lists through the blade lifecycle:
//!
//! - **Start**: once, when the scheduler leaves `Idle`.
//! - **Update**: every `update_ms`. Firings are serialized; a slow pass delays
//!   the next tick instead of overlapping it.
//! - **StatusLog**: every `status_log_ms`, logs the behavior total. No behaviors run.
//! - **RemotePoll**: refresh the broker, then run the web-update list. The next
//!   poll is armed only after the previous one finished.
//! - **Stop**: disarm the triggers, run the stop list, release the remote client.
//!
//! Each trigger is its own task, so Update, StatusLog and RemotePoll run
//! concurrently with each other. Inside one firing, behaviors run strictly
//! one after another. The first failure (error or panic) ends that firing;
//! the next firing starts from the top of the list again.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use blade_broker::MessageBroker;
use blade_config::schema::ScheduleConfig;
use blade_core::{BladeError, Result};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::behavior::{BehaviorContext, Capability};
use crate::registry::BehaviorRegistry;

/// Lifecycle of a scheduler. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// What happened during one firing of a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub phase: Capability,
    /// Behaviors that were called, in order, including the one that failed.
    pub invoked: Vec<String>,
    /// The behavior that ended the pass early.
    pub failed: Option<String>,
}

impl PassReport {
    fn new(phase: Capability) -> Self {
        Self {
            phase,
            invoked: Vec::new(),
            failed: None,
        }
    }

    pub fn completed(&self) -> bool {
        self.failed.is_none()
    }
}

pub struct PhaseScheduler {
    registry: Arc<BehaviorRegistry>,
    broker: Arc<MessageBroker>,
    ctx: BehaviorContext,
    schedule: ScheduleConfig,
    state: Mutex<SchedulerState>,
    triggers: Mutex<Vec<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
    started_at: Mutex<Option<DateTime<Utc>>>,
    status_checks: AtomicU64,
}

impl PhaseScheduler {
    pub fn new(
        registry: Arc<BehaviorRegistry>,
        broker: Arc<MessageBroker>,
        schedule: ScheduleConfig,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            ctx: BehaviorContext::new(broker.clone()),
            registry,
            broker,
            schedule,
            state: Mutex::new(SchedulerState::Idle),
            triggers: Mutex::new(Vec::new()),
            shutdown_tx,
            started_at: Mutex::new(None),
            status_checks: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    pub fn context(&self) -> &BehaviorContext {
        &self.ctx
    }

    /// Run the start list, arm the three triggers and announce this blade.
    ///
    /// A failing start behavior ends the start pass but not the startup:
    /// the triggers are armed either way. If [`stop`](Self::stop) ran while
    /// the start pass was in flight, nothing is armed or announced. Returns
    /// without waiting for the announce to complete.
    pub async fn start(self: &Arc<Self>) -> Result<PassReport> {
        {
            let mut state = self.state.lock();
            if *state != SchedulerState::Idle {
                return Err(BladeError::InvalidState(format!(
                    "cannot start a scheduler that is {:?}",
                    *state
                )));
            }
            *state = SchedulerState::Running;
        }

        info!(blade = %self.broker.identity(), "started");
        let report = self.run_pass(Capability::Start).await;

        // Held while arming so a concurrent stop either sees the triggers or
        // makes us skip them.
        let state = self.state.lock();
        if *state != SchedulerState::Running || *self.shutdown_tx.borrow() {
            info!(
                blade = %self.broker.identity(),
                "stopped during start, triggers not armed"
            );
            return Ok(report);
        }

        *self.started_at.lock() = Some(Utc::now());
        self.arm();

        let broker = self.broker.clone();
        tokio::spawn(async move {
            if !broker.announce().await {
                warn!(blade = %broker.identity(), "announce was not accepted");
            }
        });
        drop(state);

        Ok(report)
    }

    fn arm(self: &Arc<Self>) {
        let mut triggers = self.triggers.lock();
        triggers.push(tokio::spawn(
            self.clone().update_loop(self.shutdown_tx.subscribe()),
        ));
        triggers.push(tokio::spawn(
            self.clone().status_loop(self.shutdown_tx.subscribe()),
        ));
        triggers.push(tokio::spawn(
            self.clone().poll_loop(self.shutdown_tx.subscribe()),
        ));
        debug!(
            update_ms = self.schedule.update_ms,
            status_log_ms = self.schedule.status_log_ms,
            remote_poll_ms = self.schedule.remote_poll_ms,
            "triggers armed"
        );
    }

    async fn update_loop(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let period = Duration::from_millis(self.schedule.update_ms);
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => return,
                _ = ticker.tick() => {
                    self.update().await;
                }
            }
        }
    }

    async fn status_loop(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let period = Duration::from_millis(self.schedule.status_log_ms);
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => return,
                _ = ticker.tick() => {
                    self.log_status();
                }
            }
        }
    }

    async fn poll_loop(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let period = Duration::from_millis(self.schedule.remote_poll_ms);

        loop {
            // The delay restarts only once the previous poll has finished.
            tokio::select! {
                _ = shutdown.changed() => return,
                _ = tokio::time::sleep(period) => {}
            }
            self.web_update().await;
        }
    }

    /// Emit the periodic status line. Returns the behavior total it reported.
    pub fn log_status(&self) -> usize {
        let started_at = *self.started_at.lock();
        let uptime_secs = started_at
            .map(|t| (Utc::now() - t).num_seconds())
            .unwrap_or(0);
        let behaviors = self.registry.total();
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        info!(behaviors, uptime_secs, "status check");
        behaviors
    }

    /// How many status lines have been emitted.
    pub fn status_checks(&self) -> u64 {
        self.status_checks.load(Ordering::SeqCst)
    }

    /// Run the update list once.
    pub async fn update(&self) -> PassReport {
        self.run_pass(Capability::Update).await
    }

    /// Refresh the broker, then run the web-update list if the refresh worked.
    /// Returns `None` when the refresh failed and no behavior ran.
    pub async fn web_update(&self) -> Option<PassReport> {
        match self.broker.refresh().await {
            Ok(_) => Some(self.run_pass(Capability::WebUpdate).await),
            Err(e) => {
                warn!(blade = %self.broker.identity(), error = %e, "web update failed");
                None
            }
        }
    }

    /// Disarm the triggers, run the stop list and release the remote client.
    ///
    /// Calling it again runs the stop list again; it does not check the state.
    pub async fn stop(&self) -> PassReport {
        {
            let mut state = self.state.lock();
            self.shutdown_tx.send_replace(true);
            for trigger in self.triggers.lock().drain(..) {
                trigger.abort();
            }
            *state = SchedulerState::Stopped;
        }

        let report = self.run_pass(Capability::Stop).await;
        self.broker.close();

        info!(blade = %self.broker.identity(), "stopped");
        report
    }

    /// Resolves once [`stop`](Self::stop) has been called.
    pub async fn wait_stopped(&self) {
        let mut rx = self.shutdown_tx.subscribe();
        // The sender lives as long as `self`, so this only ends on `true`.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }

    /// Invoke every enabled entry of `phase`'s list, in priority order,
    /// stopping at the first failure.
    pub async fn run_pass(&self, phase: Capability) -> PassReport {
        let mut report = PassReport::new(phase);

        for entry in self.registry.lists().list(phase) {
            if !entry.is_enabled() {
                continue;
            }
            report.invoked.push(entry.name().to_string());

            let outcome = AssertUnwindSafe(entry.invoke(phase, &self.ctx))
                .catch_unwind()
                .await;
            let err = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(_) => BladeError::BehaviorPanic {
                    behavior: entry.name().to_string(),
                    phase: phase.to_string(),
                },
            };

            error!(
                phase = %phase,
                behavior = %entry.name(),
                priority = entry.priority(),
                error = %err,
                "behavior failed, skipping the rest of this pass"
            );
            report.failed = Some(entry.name().to_string());
            break;
        }

        report
    }
}
