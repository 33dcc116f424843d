//! Shared handler state

use std::sync::Arc;

use crate::executor::ResultAssembler;
use crate::observability::MetricsRegistry;
use crate::store::CorpusStore;

/// State shared by the search and admin handlers
pub struct AppState<S> {
    pub store: Arc<S>,
    pub metrics: Arc<MetricsRegistry>,
    pub assembler: ResultAssembler<S>,
    /// Page size when the request names none
    pub default_limit: usize,
}

impl<S: CorpusStore> AppState<S> {
    pub fn new(store: Arc<S>, metrics: Arc<MetricsRegistry>, default_limit: usize, max_limit: usize) -> Self {
        let assembler = ResultAssembler::new(store.clone(), metrics.clone()).with_max_limit(max_limit);
        Self {
            store,
            metrics,
            assembler,
            default_limit,
        }
    }

    pub fn max_limit(&self) -> usize {
        self.assembler.max_limit()
    }
}
