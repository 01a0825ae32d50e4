//! Application startup and lifecycle management.

use axum::{
    body::Body,
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
use tower_http::trace::TraceLayer;

use crate::config::MockPspConfig;
use crate::handlers::{self, checkout, payments, webhook};
use crate::models::PspPaymentDetails;
use crate::services::WebhookVerifier;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: MockPspConfig,
    pub store: Arc<dyn PaymentStore<PspPaymentDetails>>,
    pub verifier: Arc<WebhookVerifier>,
}

impl AppState {
    pub fn new(config: MockPspConfig) -> Self {
        let verifier = WebhookVerifier::new(&config.webhook);
        Self {
            config,
            store: Arc::new(InMemoryPaymentStore::new()),
            verifier: Arc::new(verifier),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route("/create-payment", post(payments::create_payment))
        .route("/mock-checkout/:paymentId", get(checkout::checkout_page))
        .route("/mock-pay/:paymentId", post(checkout::mock_pay))
        .route("/mock-fail/:paymentId", post(checkout::mock_fail))
        .route("/webhook", post(webhook::receive_webhook))
        .route("/status/:paymentId", get(payments::get_status))
        .route_layer(from_fn(metrics_middleware))
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
    pub async fn build(config: MockPspConfig) -> Result<Self, AppError> {
        let state = AppState::new(config.clone());

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
        tracing::info!(
            public_url = %self.state.config.public_url,
            "Mock PSP demo server on port {}",
            self.port
        );
        axum::serve(self.listener, build_router(self.state)).await
    }
}
