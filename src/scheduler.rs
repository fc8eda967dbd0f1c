//! Daily forecast trigger.
//!
//! Fires the orchestrator once a day at a fixed wall-clock time in the site
//! timezone. A failed run is recorded and logged; the loop keeps going until
//! it is cancelled.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::ForecastResult;
use crate::forecast::{ForecastError, ForecastOrchestrator};

/// Longest DST gap we step over when the fire time does not exist locally.
const MAX_GAP_MINUTES: i64 = 180;
/// Used when no future fire time can be resolved at all.
const RETRY_DELAY: Duration = Duration::from_secs(60);

/// "Every day at `at` in `tz`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    at: NaiveTime,
    tz: Tz,
}

impl DailyTrigger {
    pub fn new(at: NaiveTime, tz: Tz) -> Self {
        Self { at, tz }
    }

    pub fn at(&self) -> NaiveTime {
        self.at
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// First fire instant strictly after `now`.
    ///
    /// A fire time that falls into a DST gap moves to the first valid local
    /// minute after it; an ambiguous one fires on its earlier occurrence.
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Tz>> {
        let today = now.with_timezone(&self.tz).date_naive();

        (0..=3)
            .filter_map(|offset| today.checked_add_signed(ChronoDuration::days(offset)))
            .filter_map(|date| self.resolve(date.and_time(self.at)))
            .find(|candidate| *candidate > now)
    }

    fn resolve(&self, local: chrono::NaiveDateTime) -> Option<DateTime<Tz>> {
        (0..=MAX_GAP_MINUTES).find_map(|shift| {
            match self.tz.from_local_datetime(&(local + ChronoDuration::minutes(shift))) {
                LocalResult::Single(t) => Some(t),
                LocalResult::Ambiguous(earliest, _) => Some(earliest),
                LocalResult::None => None,
            }
        })
    }
}

/// Task status tracking
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskStatus {
    pub last_run: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub next_run: Option<DateTime<Utc>>,
    pub run_count: u64,
    pub success_count: u64,
    pub error_count: u64,
}

pub struct ForecastScheduler {
    trigger: DailyTrigger,
    orchestrator: Arc<ForecastOrchestrator>,
    status: Arc<RwLock<TaskStatus>>,
}

impl ForecastScheduler {
    pub fn new(trigger: DailyTrigger, orchestrator: Arc<ForecastOrchestrator>) -> Self {
        Self {
            trigger,
            orchestrator,
            status: Arc::new(RwLock::new(TaskStatus::default())),
        }
    }

    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        info!(
            at = %self.trigger.at().format("%H:%M"),
            tz = %self.trigger.tz(),
            "daily forecast task started"
        );
        tokio::spawn(async move { self.run(cancel).await })
    }

    pub async fn run(&self, cancel: CancellationToken) {
        // Never fire twice for the same slot, even if the wall clock lags.
        let mut last_slot: Option<DateTime<Utc>> = None;

        loop {
            let now = Utc::now();
            let reference = last_slot.map_or(now, |slot| slot.max(now));

            let (delay, due) = match self.trigger.next_after(reference) {
                Some(next) => {
                    let next = next.with_timezone(&Utc);
                    self.status.write().await.next_run = Some(next);
                    last_slot = Some(next);
                    info!(
                        next_run = %next.with_timezone(&self.trigger.tz()).format("%Y-%m-%d %H:%M %Z"),
                        "next forecast run scheduled"
                    );
                    ((next - now).to_std().unwrap_or(Duration::ZERO), true)
                }
                None => {
                    warn!("could not resolve the next fire time, retrying shortly");
                    (RETRY_DELAY, false)
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("daily forecast task stopped");
                    return;
                }
                _ = sleep(delay) => {}
            }

            if due {
                if let Err(e) = self.fire().await {
                    debug!(error = %e, "scheduled run recorded as failed");
                }
            }
        }
    }

    /// Run one forecast and record the outcome.
    pub async fn fire(&self) -> Result<ForecastResult, ForecastError> {
        let now = Utc::now();
        {
            let mut status = self.status.write().await;
            status.last_run = Some(now);
            status.run_count += 1;
        }

        let result = self.orchestrator.run_forecast().await;

        let mut status = self.status.write().await;
        match &result {
            Ok(_) => {
                status.last_success = Some(now);
                status.success_count += 1;
                status.last_error = None;
            }
            Err(e) => {
                status.error_count += 1;
                status.last_error = Some(e.to_string());
            }
        }
        result
    }

    pub async fn status(&self) -> TaskStatus {
        self.status.read().await.clone()
    }
}
