//! Process-wide wiring: storage, orchestrator, daily task and router.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api;
use crate::config::Config;
use crate::forecast::ForecastOrchestrator;
use crate::ml::{ArtifactLoader, ModelLoader};
use crate::repo::{Repositories, StorageProbe};
use crate::scheduler::ForecastScheduler;

/// Shared state handed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ForecastOrchestrator>,
    pub probe: Arc<dyn StorageProbe>,
    pub scheduler: Option<Arc<ForecastScheduler>>,
}

impl AppState {
    pub fn new(repos: Repositories, loader: Arc<dyn ModelLoader>, tz: Tz) -> Self {
        let orchestrator = ForecastOrchestrator::new(repos.measurements, loader, repos.forecasts, tz);
        Self {
            orchestrator: Arc::new(orchestrator),
            probe: repos.probe,
            scheduler: None,
        }
    }
}

pub struct App {
    state: AppState,
    cancel: CancellationToken,
    scheduler_task: Option<JoinHandle<()>>,
}

impl App {
    /// Build everything from configuration and start the daily task.
    pub async fn start(cfg: &Config) -> Result<Self> {
        let repos = Repositories::new(cfg).await?;
        let loader = Arc::new(ArtifactLoader::new(&cfg.model.artifact_path));
        if !cfg.model.artifact_path.exists() {
            warn!(
                path = %cfg.model.artifact_path.display(),
                "model artifact not found, forecasts will fail until it is provided"
            );
        }
        Self::with_parts(cfg, repos, loader)
    }

    /// Same as [`App::start`] with storage and model supplied by the caller.
    pub fn with_parts(cfg: &Config, repos: Repositories, loader: Arc<dyn ModelLoader>) -> Result<Self> {
        let tz = cfg.site.tz()?;
        let mut state = AppState::new(repos, loader, tz);
        let cancel = CancellationToken::new();

        let scheduler_task = if cfg.schedule.enabled {
            let trigger = cfg.schedule.trigger(tz)?;
            let scheduler = Arc::new(ForecastScheduler::new(trigger, state.orchestrator.clone()));
            state.scheduler = Some(scheduler.clone());
            Some(scheduler.spawn(cancel.clone()))
        } else {
            info!("daily forecast task disabled");
            None
        };

        Ok(Self {
            state,
            cancel,
            scheduler_task,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        api::router(self.state.clone())
    }

    /// Stop the daily task and wait for it to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Some(task) = self.scheduler_task {
            if let Err(e) = task.await {
                warn!(error = %e, "daily forecast task ended abnormally");
            }
        }
        info!("application stopped");
    }
}
