//! Application startup and lifecycle management.

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use service_core::payments::{InMemoryPaymentStore, PaymentStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::BankTransferConfig;
use crate::handlers::{self, admin, screenshots, transfers};
use crate::models::BankTransferDetails;
use crate::services::{EvidenceStorage, LocalStorage};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: BankTransferConfig,
    pub store: Arc<dyn PaymentStore<BankTransferDetails>>,
    pub storage: Arc<dyn EvidenceStorage>,
}

impl AppState {
    /// State backed by the in-memory store and the configured upload directory.
    pub async fn new(config: BankTransferConfig) -> Result<Self, AppError> {
        let storage = LocalStorage::new(&config.uploads.dir).await.map_err(|e| {
            tracing::error!(
                "Failed to initialize upload directory {}: {}",
                config.uploads.dir,
                e
            );
            e
        })?;

        Ok(Self {
            config,
            store: Arc::new(InMemoryPaymentStore::new()),
            storage: Arc::new(storage),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.uploads.dir);
    let body_limit = state.config.uploads.max_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route(
            "/create-bank-transfer",
            post(transfers::create_bank_transfer),
        )
        .route(
            "/upload-screenshot/:paymentId",
            post(screenshots::upload_screenshot),
        )
        .route("/status/:paymentId", get(transfers::get_status))
        .route("/admin/mark-received", post(admin::mark_received))
        .nest_service("/uploads", uploads)
        .route_layer(from_fn(metrics_middleware))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    pub async fn build(config: BankTransferConfig) -> Result<Self, AppError> {
        let state = AppState::new(config.clone()).await?;

        // port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("Bank transfer demo server on port {}", self.port);
        axum::serve(self.listener, build_router(self.state)).await
    }
}
