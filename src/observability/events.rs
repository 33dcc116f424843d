//! Lifecycle events
//!
//! Every log point names one of these. Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & lifecycle
    BootStart,
    BootComplete,
    /// HTTP listener bound
    Serving,
    ShutdownStart,
    ShutdownComplete,

    // Configuration
    ConfigLoaded,
    ConfigInvalid,

    // Corpus
    CorpusLoaded,
    CorpusSaved,
    CorpusLoadFailed,

    // Search
    SearchComplete,
    SearchEmpty,
    SearchFailed,
    /// A term was dropped during parsing or compilation
    TermDropped,

    // Section paths
    MaterializeScheduled,
    MaterializeSkipped,

    // Ingestion
    IngestItemRejected,
    /// Links still missing an endpoint after the final pass
    LinksUnresolved,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "UNITSEARCH_STARTUP_BEGIN",
            Event::BootComplete => "UNITSEARCH_STARTUP_COMPLETE",
            Event::Serving => "UNITSEARCH_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigInvalid => "CONFIG_INVALID",

            Event::CorpusLoaded => "CORPUS_LOADED",
            Event::CorpusSaved => "CORPUS_SAVED",
            Event::CorpusLoadFailed => "CORPUS_LOAD_FAILED",

            Event::SearchComplete => "SEARCH_COMPLETE",
            Event::SearchEmpty => "SEARCH_EMPTY",
            Event::SearchFailed => "SEARCH_FAILED",
            Event::TermDropped => "SEARCH_TERM_DROPPED",

            Event::MaterializeScheduled => "SECTION_PATHS_SCHEDULED",
            Event::MaterializeSkipped => "SECTION_PATHS_FRESH",

            Event::IngestItemRejected => "INGEST_ITEM_REJECTED",
            Event::LinksUnresolved => "INGEST_LINKS_UNRESOLVED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::CorpusLoadFailed => Severity::Fatal,
            Event::SearchFailed | Event::ConfigInvalid => Severity::Error,
            Event::LinksUnresolved | Event::IngestItemRejected => Severity::Warn,
            Event::TermDropped | Event::MaterializeSkipped => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_upper_snake() {
        let events = [
            Event::BootStart,
            Event::BootComplete,
            Event::Serving,
            Event::ShutdownStart,
            Event::ShutdownComplete,
            Event::ConfigLoaded,
            Event::ConfigInvalid,
            Event::CorpusLoaded,
            Event::CorpusSaved,
            Event::CorpusLoadFailed,
            Event::SearchComplete,
            Event::SearchEmpty,
            Event::SearchFailed,
            Event::TermDropped,
            Event::MaterializeScheduled,
            Event::MaterializeSkipped,
            Event::IngestItemRejected,
            Event::LinksUnresolved,
        ];
        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_severities() {
        assert_eq!(Event::CorpusLoadFailed.severity(), Severity::Fatal);
        assert_eq!(Event::LinksUnresolved.severity(), Severity::Warn);
        assert_eq!(Event::SearchComplete.severity(), Severity::Info);
        assert_eq!(Event::SearchFailed.severity(), Severity::Error);
    }

    #[test]
    fn test_display() {
        assert_eq!(Event::SearchComplete.to_string(), "SEARCH_COMPLETE");
    }
}
