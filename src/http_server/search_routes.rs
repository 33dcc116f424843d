//! Search HTTP Routes
//!
//! `GET /search?q=&offset=&limit=&order_by=&order=`
//!
//! A blank `q` is answered with `{"status": "empty"}` before paging and
//! ordering are validated.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{RestError, RestResult};
use super::state::AppState;
use crate::executor::{PageRequest, SearchOutcome, SearchResults};
use crate::observability::Logger;
use crate::query::QueryKey;
use crate::store::CorpusStore;

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Canonical key name, default `year`
    #[serde(default)]
    pub order_by: Option<String>,
    /// `asc…` for ascending, anything else descending
    #[serde(default)]
    pub order: Option<String>,
}

impl SearchParams {
    /// Validates paging and ordering against the server's limits
    pub fn page_request(&self, default_limit: usize, max_limit: usize) -> RestResult<PageRequest> {
        let limit = self.limit.unwrap_or(default_limit);
        if limit == 0 || limit > max_limit {
            return Err(RestError::InvalidLimit(limit, max_limit));
        }

        let order_by = match self.order_by.as_deref() {
            None | Some("") => QueryKey::Year,
            Some(name) => QueryKey::from_canonical(name)
                .ok_or_else(|| RestError::UnknownOrderKey(name.to_string()))?,
        };
        let descending = !self
            .order
            .as_deref()
            .is_some_and(|o| o.to_ascii_lowercase().starts_with("asc"));

        Ok(PageRequest::new(self.offset.unwrap_or(0), limit).ordered_by(order_by, descending))
    }
}

/// Search response body
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SearchReply {
    Ok(SearchResults),
    Empty,
}

impl From<SearchOutcome> for SearchReply {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Found(results) => SearchReply::Ok(results),
            SearchOutcome::Empty => SearchReply::Empty,
        }
    }
}

// ==================
// Routes
// ==================

pub fn search_routes<S: CorpusStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/search", get(search_handler::<S>))
        .with_state(state)
}

async fn search_handler<S: CorpusStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<SearchParams>,
) -> RestResult<impl IntoResponse> {
    let request_id = Uuid::new_v4().to_string();
    let query = params.q.clone().unwrap_or_default();
    Logger::trace(
        "SEARCH_REQUEST",
        &[("q", query.as_str()), ("request_id", request_id.as_str())],
    );

    // a blank query answers "empty" whatever the paging says
    if query.trim().is_empty() {
        return Ok(([("x-request-id", request_id)], Json(SearchReply::Empty)));
    }

    let page = params.page_request(state.default_limit, state.max_limit())?;
    let outcome = state.assembler.search_text(&query, page).await?;

    Ok(([("x-request-id", request_id)], Json(SearchReply::from(outcome))))
}
