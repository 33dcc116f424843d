//! Cron-driven rebuild schedule

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use croner::Cron;
use tokio::task::JoinHandle;

use super::errors::{MaterializeError, MaterializeResult};
use super::paths::SectionPathMaterializer;
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::store::CorpusStore;

/// Default rebuild pattern: every six hours on the hour
pub const DEFAULT_SCHEDULE: &str = "0 */6 * * *";

/// A parsed rebuild schedule
pub struct MaterializeSchedule {
    pattern: String,
    cron: Cron,
}

impl MaterializeSchedule {
    pub fn parse(pattern: &str) -> MaterializeResult<Self> {
        let cron = Cron::new(pattern)
            .parse()
            .map_err(|e| MaterializeError::invalid_schedule(pattern, e))?;
        Ok(Self {
            pattern: pattern.to_string(),
            cron,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// First tick strictly after `from`
    pub fn next_after(&self, from: &DateTime<Utc>) -> MaterializeResult<DateTime<Utc>> {
        self.cron
            .find_next_occurrence(from, false)
            .map_err(|e| MaterializeError::invalid_schedule(&self.pattern, e))
    }

    /// Runs the schedule until the task is aborted.
    ///
    /// Each tick rebuilds only when the store reports stale paths. A failed
    /// rebuild is logged and retried at the next tick.
    pub fn spawn<S>(self, store: Arc<S>, metrics: Arc<MetricsRegistry>) -> JoinHandle<()>
    where
        S: CorpusStore + 'static,
    {
        tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let next = match self.next_after(&now) {
                    Ok(next) => next,
                    Err(err) => {
                        let reason = err.to_string();
                        log_event(Event::ConfigInvalid, &[("reason", reason.as_str())]);
                        return;
                    }
                };
                let next_str = next.to_rfc3339();
                log_event(
                    Event::MaterializeScheduled,
                    &[("next", next_str.as_str()), ("pattern", self.pattern.as_str())],
                );

                let wait = (next - now).to_std().unwrap_or_default();
                tokio::time::sleep(wait).await;

                match SectionPathMaterializer::rebuild_if_stale(store.as_ref(), &metrics).await {
                    Ok(Some(_)) => {}
                    Ok(None) => log_event(Event::MaterializeSkipped, &[]),
                    // already logged by the rebuild scope
                    Err(_) => {}
                }
            }
        })
    }
}

impl fmt::Debug for MaterializeSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterializeSchedule")
            .field("pattern", &self.pattern)
            .finish()
    }
}
