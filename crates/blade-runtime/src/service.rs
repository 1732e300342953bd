use std::sync::Arc;

use blade_broker::{HttpRemote, MessageBroker, RemoteStore};
use blade_config::BladeConfig;
use blade_core::Result;
use tracing::{info, warn};

use crate::registry::{BehaviorFactory, BehaviorRegistry};
use crate::scheduler::{PassReport, PhaseScheduler, SchedulerState};
use crate::shutdown::wait_for_shutdown_signal;

/// One running blade: its identity, its behaviors, its scheduler and its
/// connection to the coordination service.
///
/// Everything a behavior needs is reached through the context the scheduler
/// hands it; there is no process-wide instance.
pub struct BladeService {
    config: BladeConfig,
    registry: Arc<BehaviorRegistry>,
    broker: Arc<MessageBroker>,
    scheduler: Arc<PhaseScheduler>,
}

impl BladeService {
    /// Build a service talking HTTP to the configured remote.
    pub fn new(config: BladeConfig, factories: &[BehaviorFactory]) -> Result<Self> {
        let remote = Arc::new(HttpRemote::from_config(&config.remote)?);
        Ok(Self::with_remote(config, factories, remote))
    }

    /// Build a service on top of any [`RemoteStore`].
    pub fn with_remote(
        config: BladeConfig,
        factories: &[BehaviorFactory],
        remote: Arc<dyn RemoteStore>,
    ) -> Self {
        let registry = BehaviorRegistry::discover(factories, &config.behaviors.disabled);
        Self::from_parts(config, registry, remote)
    }

    /// Build a service from an already-populated registry.
    pub fn from_parts(
        config: BladeConfig,
        registry: BehaviorRegistry,
        remote: Arc<dyn RemoteStore>,
    ) -> Self {
        let registry = Arc::new(registry);
        let broker = Arc::new(MessageBroker::new(config.blade.name.clone(), remote));
        let scheduler = Arc::new(PhaseScheduler::new(
            registry.clone(),
            broker.clone(),
            config.schedule,
        ));

        Self {
            config,
            registry,
            broker,
            scheduler,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.blade.name
    }

    pub fn config(&self) -> &BladeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<BehaviorRegistry> {
        &self.registry
    }

    pub fn broker(&self) -> &Arc<MessageBroker> {
        &self.broker
    }

    pub fn scheduler(&self) -> &Arc<PhaseScheduler> {
        &self.scheduler
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Start the blade and keep the caller here until [`stop`](Self::stop)
    /// is called from elsewhere.
    pub async fn start(&self) -> Result<()> {
        self.scheduler.start().await?;
        self.scheduler.wait_stopped().await;
        Ok(())
    }

    /// Run until the process is asked to terminate, then stop.
    ///
    /// With `auto_start = false` nothing is scheduled: the phases are left to
    /// whoever holds the service, and this only waits for the signal.
    pub async fn run(&self) -> Result<()> {
        let lifecycle = async {
            if self.config.blade.auto_start {
                self.start().await
            } else {
                info!(blade = %self.name(), "auto_start is off, waiting for manual calls");
                self.scheduler.wait_stopped().await;
                Ok(())
            }
        };
        tokio::pin!(lifecycle);

        tokio::select! {
            result = &mut lifecycle => result,
            signal = wait_for_shutdown_signal() => match signal {
                Ok(()) => {
                    info!(blade = %self.name(), "shutdown signal received");
                    self.stop().await;
                    Ok(())
                }
                Err(e) => {
                    warn!(error = %e, "could not listen for shutdown signals");
                    lifecycle.await
                }
            },
        }
    }

    /// Run the update list once.
    pub async fn update(&self) -> PassReport {
        self.scheduler.update().await
    }

    /// Poll the remote once and run the web-update list on success.
    pub async fn web_update(&self) -> Option<PassReport> {
        self.scheduler.web_update().await
    }

    pub async fn stop(&self) -> PassReport {
        self.scheduler.stop().await
    }
}
