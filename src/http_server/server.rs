//! # HTTP Server
//!
//! Combines the search, admin and observability routers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use super::admin_routes::admin_routes;
use super::config::HttpServerConfig;
use super::observability_routes::{health_routes, metrics_routes};
use super::search_routes::search_routes;
use super::state::AppState;
use crate::observability::{log_event, Event};
use crate::store::CorpusStore;

/// HTTP server for the search API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new<S: CorpusStore + 'static>(config: HttpServerConfig, state: Arc<AppState<S>>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    fn build_router<S: CorpusStore + 'static>(config: &HttpServerConfig, state: Arc<AppState<S>>) -> Router {
        Router::new()
            .merge(health_routes(state.clone()))
            .merge(metrics_routes(state.metrics.clone()))
            .merge(search_routes(state.clone()))
            .nest("/admin", admin_routes(state))
            .layer(config.cors_layer())
    }

    /// The router, for driving requests in tests
    pub fn router(self) -> Router {
        self.router
    }

    /// Serves until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        let bound = addr.to_string();
        log_event(Event::Serving, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete, &[]);
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        log_event(Event::ShutdownStart, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LearningUnit, Section};
    use crate::observability::MetricsRegistry;
    use crate::store::{CorpusTables, MemoryCorpus};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> Router {
        let mut tables = CorpusTables::new();
        for (id, semkez) in [(1, "2024S"), (2, "2024W")] {
            let mut unit = LearningUnit::new(id, semkez, Some("263-0007-00L"));
            unit.title_english = Some("Algorithms".into());
            tables.upsert_unit(unit);
        }
        tables.upsert_section(Section::new(1, None, "Informatik", "Computer Science"));
        let state = Arc::new(AppState::new(
            Arc::new(MemoryCorpus::new(tables)),
            Arc::new(MetricsRegistry::new()),
            20,
            100,
        ));
        HttpServer::new(HttpServerConfig::default(), state).router()
    }

    async fn call(router: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/search")
                    .header("origin", "https://search.example.org")
                    .header("access-control-request-method", "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let (status, body) = call(router(), "GET", "/search?q=t:Algorithms").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["total"], 1);
        assert_eq!(body["parsedQuery"], "title=Algorithms");
        assert_eq!(
            body["results"]["263-0007-00L"].as_array().unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_blank_query_is_empty() {
        let (status, body) = call(router(), "GET", "/search?q=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"status": "empty"}));
    }

    #[tokio::test]
    async fn test_blank_query_skips_paging_checks() {
        for uri in ["/search?q=&limit=0", "/search?q=%20&order_by=colour", "/search?limit=500"] {
            let (status, body) = call(router(), "GET", uri).await;
            assert_eq!(status, StatusCode::OK, "uri {}", uri);
            assert_eq!(body, serde_json::json!({"status": "empty"}), "uri {}", uri);
        }
    }

    #[tokio::test]
    async fn test_bad_paging_is_400() {
        let (status, body) = call(router(), "GET", "/search?q=x&limit=500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);

        let (status, _) = call(router(), "GET", "/search?q=x&order_by=colour").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let (status, body) = call(router(), "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["section_paths_stale"], true);

        let (status, body) = call(router(), "GET", "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["searches_executed"], 0);
    }

    #[tokio::test]
    async fn test_admin_materialize() {
        let (status, body) = call(router(), "POST", "/admin/materialize").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["paths_written"], 1);
    }
}
