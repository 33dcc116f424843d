//! Admin HTTP Routes
//!
//! `POST /admin/materialize` rebuilds the section path table on demand.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};

use super::errors::RestResult;
use super::state::AppState;
use crate::materialize::SectionPathMaterializer;
use crate::store::CorpusStore;

pub fn admin_routes<S: CorpusStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/materialize", post(materialize_handler::<S>))
        .with_state(state)
}

async fn materialize_handler<S: CorpusStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> RestResult<Json<Value>> {
    let report = SectionPathMaterializer::rebuild(state.store.as_ref(), &state.metrics).await?;
    Ok(Json(json!({ "status": "ok", "data": report })))
}
