//! Authentication of inbound provider callbacks.
//!
//! The provider sends `X-Webhook-Timestamp` (unix seconds) and
//! `X-Webhook-Signature`, the hex HMAC-SHA256 of `"<timestamp>.<raw body>"`.

use axum::http::HeaderMap;
use secrecy::{ExposeSecret, Secret};
use service_core::utils::signature::{timestamp_within_tolerance, verify_webhook};

use crate::config::WebhookConfig;

pub const TIMESTAMP_HEADER: &str = "x-webhook-timestamp";
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookRejection {
    MissingSignature,
    InvalidTimestamp,
    StaleTimestamp,
    InvalidSignature,
}

impl WebhookRejection {
    /// Metric label for the rejection.
    pub fn reason(&self) -> &'static str {
        match self {
            WebhookRejection::MissingSignature => "missing_signature",
            WebhookRejection::InvalidTimestamp => "invalid_timestamp",
            WebhookRejection::StaleTimestamp => "stale_timestamp",
            WebhookRejection::InvalidSignature => "invalid_signature",
        }
    }
}

impl std::fmt::Display for WebhookRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            WebhookRejection::MissingSignature => "Missing webhook signature",
            WebhookRejection::InvalidTimestamp => "Invalid webhook timestamp",
            WebhookRejection::StaleTimestamp => "Webhook timestamp outside tolerance",
            WebhookRejection::InvalidSignature => "Invalid webhook signature",
        };
        f.write_str(message)
    }
}

pub struct WebhookVerifier {
    secret: Secret<String>,
    enabled: bool,
    tolerance_secs: i64,
}

impl WebhookVerifier {
    pub fn new(config: &WebhookConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            enabled: config.signature_enabled,
            tolerance_secs: config.tolerance_secs,
        }
    }

    /// Check the signature headers against the raw request body.
    pub fn verify(&self, headers: &HeaderMap, body: &[u8], now: i64) -> Result<(), WebhookRejection> {
        if !self.enabled {
            return Ok(());
        }

        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        let (Some(timestamp), Some(signature)) =
            (header(TIMESTAMP_HEADER), header(SIGNATURE_HEADER))
        else {
            return Err(WebhookRejection::MissingSignature);
        };

        let timestamp: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| WebhookRejection::InvalidTimestamp)?;

        if !timestamp_within_tolerance(timestamp, now, self.tolerance_secs) {
            return Err(WebhookRejection::StaleTimestamp);
        }

        match verify_webhook(self.secret.expose_secret(), timestamp, body, signature) {
            Ok(true) => Ok(()),
            Ok(false) => Err(WebhookRejection::InvalidSignature),
            Err(e) => {
                tracing::error!(error = %e, "Webhook signature verification error");
                Err(WebhookRejection::InvalidSignature)
            }
        }
    }
}
