//! Result assembly
//!
//! One search is two store reads: the distinct-number count, and the page
//! of numbers followed by the rows for that page. The two run concurrently
//! and are joined before grouping. Pagination is over distinct course
//! numbers, never over rows.

use std::sync::Arc;

use super::errors::{SearchError, SearchResult};
use super::result::{GroupedResults, SearchResults};
use crate::compiler::{compile, CompiledQuery, Predicate};
use crate::observability::{log_event, Event, MetricsRegistry, Timer};
use crate::query::{parse_with_diagnostics, BooleanExpression, QueryKey};
use crate::store::{CorpusStore, ScanPlan, SortSpec, StoreError};

/// Hard ceiling on the page size
pub const MAX_LIMIT: usize = 100;

/// Outcome of a free-text search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Blank query, nothing was parsed or read
    Empty,
    Found(SearchResults),
}

/// Page and order arguments of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
    pub order: SortSpec,
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            order: SortSpec::default(),
        }
    }

    pub fn ordered_by(mut self, order_by: QueryKey, descending: bool) -> Self {
        self.order = SortSpec {
            order_by,
            descending,
        };
        self
    }
}

/// Runs searches against a corpus store
pub struct ResultAssembler<S> {
    store: Arc<S>,
    metrics: Arc<MetricsRegistry>,
    max_limit: usize,
}

impl<S: CorpusStore> ResultAssembler<S> {
    pub fn new(store: Arc<S>, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            store,
            metrics,
            max_limit: MAX_LIMIT,
        }
    }

    /// Lowers the page size ceiling. Values above [`MAX_LIMIT`] are ignored.
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit.clamp(1, MAX_LIMIT);
        self
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Parses and runs a query string. A blank query short-circuits.
    pub async fn search_text(&self, query: &str, page: PageRequest) -> SearchResult<SearchOutcome> {
        if query.trim().is_empty() {
            self.metrics.increment_searches_empty();
            log_event(Event::SearchEmpty, &[]);
            return Ok(SearchOutcome::Empty);
        }

        let parsed = parse_with_diagnostics(query);
        for key in &parsed.unresolved_keys {
            log_event(Event::TermDropped, &[("key", key.as_str()), ("reason", "unknown key")]);
        }
        self.metrics.add_terms_dropped(parsed.unresolved_keys.len() as u64);

        self.search(&parsed.expr, page).await.map(SearchOutcome::Found)
    }

    /// Runs a parsed expression and assembles one page of grouped results
    pub async fn search(&self, expr: &BooleanExpression, page: PageRequest) -> SearchResult<SearchResults> {
        let timer = Timer::new();
        if page.limit == 0 {
            self.metrics.increment_searches_failed();
            return Err(SearchError::invalid_limit(page.limit));
        }
        let limit = page.limit.min(self.max_limit);

        let compiled = compile(expr);
        for term in &compiled.dropped {
            let shown = term.to_string();
            log_event(Event::TermDropped, &[("term", shown.as_str()), ("reason", "unusable value")]);
        }
        self.metrics.add_terms_dropped(compiled.dropped.len() as u64);

        let parsed_query = compiled.parsed_query();
        let plan = Self::plan(compiled, page.order);

        let store = &self.store;
        let outcome = tokio::try_join!(store.count_distinct_numbers(&plan), async {
            let numbers = store.page_numbers(&plan, page.offset, limit).await?;
            let rows = store.fetch_rows(&plan, &numbers).await?;
            Ok::<_, StoreError>((numbers, rows))
        });

        let (total, (numbers, rows)) = match outcome {
            Ok(reads) => reads,
            Err(err) => {
                self.metrics.increment_searches_failed();
                let reason = err.to_string();
                log_event(Event::SearchFailed, &[("reason", reason.as_str())]);
                return Err(SearchError::store_failed(err));
            }
        };

        let results = SearchResults {
            total,
            results: GroupedResults::from_rows(&numbers, rows),
            parsed_query,
            exec_time_ms: timer.elapsed_ms(),
        };

        self.metrics.increment_searches_executed();
        let total_str = results.total.to_string();
        let groups_str = results.results.len().to_string();
        let elapsed = results.exec_time_ms.to_string();
        log_event(
            Event::SearchComplete,
            &[
                ("duration_ms", elapsed.as_str()),
                ("groups", groups_str.as_str()),
                ("parsed_query", results.parsed_query.as_str()),
                ("total", total_str.as_str()),
            ],
        );
        Ok(results)
    }

    /// Scan plan for a compiled query: only rows with a course number take
    /// part, and the sort key's joins are added.
    pub fn plan(compiled: CompiledQuery, order: SortSpec) -> ScanPlan {
        let predicate = match compiled.predicate {
            Predicate::Always => Predicate::NumberPresent,
            other => Predicate::And(vec![Predicate::NumberPresent, other]),
        };
        ScanPlan {
            predicate,
            joins: compiled.joins.with_order(order.order_by),
            order,
        }
    }
}
