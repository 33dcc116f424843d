//! Observability subsystem
//!
//! - Structured JSON logging with deterministic key order
//! - Typed lifecycle events
//! - Counter-only metrics
//! - Begin/complete scopes and timers
//!
//! Observability is read-only: nothing here changes how a search, a rebuild
//! or an ingest pass behaves, and logging failures are swallowed.
//!
//! ```ignore
//! use unitsearch::observability::{log_event, Event, ObservationScope};
//!
//! log_event(Event::CorpusLoaded, &[("units", "1204")]);
//!
//! let scope = ObservationScope::new("SECTION_PATHS_REBUILD");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

/// Logs a lifecycle event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
