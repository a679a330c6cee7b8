//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Own the frequency counter and inject it into handlers
//! - Serve on a listener until told to shut down

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    extract::{ConnectInfo, DefaultBodyLimit},
    http::Request,
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::handle_middleware_error;
use crate::stats::FrequencyCounter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub counter: Arc<FrequencyCounter>,
    pub max_limit: i64,
}

/// HTTP server for the FizzBuzz API.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    counter: Arc<FrequencyCounter>,
}

impl HttpServer {
    /// Create a new HTTP server with a fresh counter.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_counter(config, Arc::new(FrequencyCounter::new()))
    }

    /// Create a new HTTP server sharing an existing counter.
    pub fn with_counter(config: ServerConfig, counter: Arc<FrequencyCounter>) -> Self {
        let state = AppState {
            counter: counter.clone(),
            max_limit: config.limits.max_limit,
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            counter,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let trace = TraceLayer::new_for_http()
            .make_span_with(request_span)
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO));

        Router::new()
            .route("/fizzbuzz", any(handlers::fizzbuzz))
            .route("/mostfreqreq", any(handlers::most_frequent))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(trace)
                    .layer(propagate_request_id_layer())
                    .layer(HandleErrorLayer::new(handle_middleware_error))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The counter shared by every handler.
    pub fn counter(&self) -> Arc<FrequencyCounter> {
        self.counter.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server until a message arrives on `shutdown`, then drain
    /// in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn request_span(request: &Request<Body>) -> Span {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info_span!(
        "request",
        request_id = %request.request_id(),
        remote = %remote,
        method = %request.method(),
        uri = %request.uri(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fizzbuzz::ParameterRecord;
    use crate::http::response::ErrorBody;
    use crate::stats::MostFrequent;
    use axum::http::{header, Method, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        HttpServer::new(ServerConfig::default())
    }

    async fn send(router: Router, method: Method, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        router.oneshot(request).await.unwrap()
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const FIZZ: &str = r#"{"int1":3,"int2":5,"limit":16,"str1":"fizz","str2":"buzz"}"#;

    #[tokio::test]
    async fn test_fizzbuzz_ok() {
        let server = server();
        let response = send(server.router(), Method::GET, "/fizzbuzz", FIZZ).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert!(response.headers().contains_key("x-request-id"));

        let body: Vec<String> = json(response).await;
        assert_eq!(body.len(), 16);
        assert_eq!(body[14], "fizzbuzz");
        assert_eq!(
            server.counter().get(&ParameterRecord::new(3, 5, 16, "fizz", "buzz")),
            1
        );
    }

    #[tokio::test]
    async fn test_fizzbuzz_query_string() {
        let server = server();
        let response = send(
            server.router(),
            Method::GET,
            "/fizzbuzz?int1=3&int2=5&limit=5&str1=fizz&str2=buzz",
            "",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Vec<String> = json(response).await;
        assert_eq!(body, vec!["1", "2", "fizz", "4", "buzz"]);
    }

    #[tokio::test]
    async fn test_fizzbuzz_zero_divisor() {
        let server = server();
        let response = send(
            server.router(),
            Method::GET,
            "/fizzbuzz",
            r#"{"int1":0,"int2":5,"limit":16,"str1":"fizz","str2":"buzz"}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json::<ErrorBody>(response).await,
            ErrorBody { code: 400, desc: "int1 missing (can't be zero)".into() }
        );
        assert!(server.counter().is_empty());
    }

    #[tokio::test]
    async fn test_fizzbuzz_malformed_body() {
        let response = send(server().router(), Method::GET, "/fizzbuzz", "{oops").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json::<ErrorBody>(response).await,
            ErrorBody { code: 400, desc: "invalid params".into() }
        );
    }

    #[tokio::test]
    async fn test_limit_above_configured_maximum() {
        let mut config = ServerConfig::default();
        config.limits.max_limit = 10;
        let server = HttpServer::new(config);
        let response = send(server.router(), Method::GET, "/fizzbuzz", FIZZ).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json::<ErrorBody>(response).await.desc,
            "limit can't be superior to 10"
        );
        assert!(server.counter().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let mut config = ServerConfig::default();
        config.limits.max_body_bytes = 1024;
        let server = HttpServer::new(config);

        let padded = format!(
            r#"{{"int1":3,"int2":5,"limit":16,"str1":"fizz","str2":"buzz","pad":"{}"}}"#,
            "x".repeat(4096)
        );
        let response = send(server.router(), Method::GET, "/fizzbuzz", &padded).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            json::<ErrorBody>(response).await,
            ErrorBody { code: 413, desc: "payload too large".into() }
        );
        assert!(server.counter().is_empty());
    }

    #[tokio::test]
    async fn test_array_body_rejected() {
        let server = server();
        let response = send(
            server.router(),
            Method::GET,
            "/fizzbuzz",
            r#"[3,5,4,"fizz","buzz"]"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json::<ErrorBody>(response).await,
            ErrorBody { code: 400, desc: "invalid params".into() }
        );
        assert!(server.counter().is_empty());
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let server = server();
        for uri in ["/fizzbuzz", "/mostfreqreq"] {
            let response = send(server.router(), Method::POST, uri, FIZZ).await;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(response.headers()[header::ALLOW], "GET");
            assert_eq!(
                json::<ErrorBody>(response).await,
                ErrorBody { code: 405, desc: "method not allowed".into() }
            );
        }
        assert!(server.counter().is_empty());
    }

    #[tokio::test]
    async fn test_most_frequent_flow() {
        let server = server();

        let response = send(server.router(), Method::GET, "/mostfreqreq", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json::<MostFrequent>(response).await, MostFrequent::default());

        let fazz = r#"{"int1":2,"int2":7,"limit":16,"str1":"fazz","str2":"bozz"}"#;
        for body in [FIZZ, FIZZ, fazz] {
            let response = send(server.router(), Method::GET, "/fizzbuzz", body).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = send(server.router(), Method::GET, "/mostfreqreq", "").await;
        let body: serde_json::Value = json(response).await;
        assert_eq!(
            body,
            serde_json::json!({
                "count": 2,
                "params": [{"int1": 3, "int2": 5, "limit": 16, "str1": "fizz", "str2": "buzz"}]
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = send(server().router(), Method::GET, "/nope", "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json::<ErrorBody>(response).await,
            ErrorBody { code: 404, desc: "not found".into() }
        );
    }

    #[tokio::test]
    async fn test_client_request_id_is_echoed() {
        let request = Request::builder()
            .uri("/mostfreqreq")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();
        let response = server().router().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_independent_servers_do_not_share_counts() {
        let first = server();
        let second = server();
        send(first.router(), Method::GET, "/fizzbuzz", FIZZ).await;
        assert_eq!(first.counter().len(), 1);
        assert!(second.counter().is_empty());
    }
}
