//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the report and health handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Hand each report request to the pipeline
//! - Stop accepting on shutdown and drain in-flight requests

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::CollectorConfig;
use crate::http::request::{envelope_from_parts, with_body_bytes, X_REQUEST_ID};
use crate::report::{PipelineError, ReportPipeline};
use crate::sink::LogSink;

/// Extra time the outer timeout layer allows beyond the body deadline.
const BACKSTOP_GRACE_SECS: u64 = 5;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: ReportPipeline,
    pub max_body_size: usize,
    pub trust_forwarded_for: bool,
    /// Deadline for receiving the full report body.
    pub body_timeout: Duration,
}

/// HTTP server for the report collector.
pub struct HttpServer {
    router: Router,
    config: CollectorConfig,
}

impl HttpServer {
    /// Create a new HTTP server writing records to `sink`.
    pub fn new(config: CollectorConfig, sink: Arc<dyn LogSink>) -> Self {
        let state = AppState {
            pipeline: ReportPipeline::new(sink),
            max_body_size: config.security.max_body_size,
            trust_forwarded_for: config.security.trust_forwarded_for,
            body_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &CollectorConfig, state: AppState) -> Router {
        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        });

        Router::new()
            .route(&config.endpoint.report_path, post(report_handler))
            .route(&config.endpoint.health_path, get(health_handler))
            .with_state(state)
            // Backstop only: the handler's body deadline fires first so a
            // stalled upload still produces a record.
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs.saturating_add(BACKSTOP_GRACE_SECS),
            )))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(trace)
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            report_path = %self.config.endpoint.report_path,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }
}

/// Report handler. Always answers; the pipeline decides the status.
async fn report_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();
    let envelope = envelope_from_parts(&parts, peer, state.trust_forwarded_for);

    let read = axum::body::to_bytes(body, state.max_body_size);
    let response = match tokio::time::timeout(state.body_timeout, read).await {
        Ok(Ok(bytes)) => state.pipeline.handle(&with_body_bytes(envelope, bytes)),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, limit = state.max_body_size, "Failed to read report body");
            state
                .pipeline
                .reject(&envelope, PipelineError::BodyRead(e.to_string()))
        }
        Err(_) => {
            let secs = state.body_timeout.as_secs();
            tracing::warn!(timeout_secs = secs, "Timed out reading report body");
            state.pipeline.reject(
                &envelope,
                PipelineError::BodyRead(format!("timed out after {}s", secs)),
            )
        }
    };

    tracing::debug!(
        status = response.status_code,
        outcome = response.outcome.as_str(),
        "Report acknowledged"
    );
    response.into_response()
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
