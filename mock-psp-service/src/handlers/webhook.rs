use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use chrono::Utc;
use metrics::counter;
use service_core::error::AppError;
use service_core::payments::{parse_payment_id, Outcome, PaymentError, PaymentStatus};

use super::{checkout::record_status_change, not_found};
use crate::{
    dtos::{WebhookAck, WebhookRequest},
    models::PspPayment,
    startup::AppState,
};

/// Provider status callback.
///
/// The signature is checked against the raw body before anything is parsed.
/// Only terminal statuses are accepted, and a settled payment never changes.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    if let Err(rejection) = state
        .verifier
        .verify(&headers, &body, Utc::now().timestamp())
    {
        tracing::warn!(reason = rejection.reason(), "Webhook rejected");
        rejected(rejection.reason());
        return Err(AppError::Unauthorized(anyhow::anyhow!("{}", rejection)));
    }

    let payload: WebhookRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to parse webhook payload");
        rejected("invalid_payload");
        AppError::BadRequest(anyhow::anyhow!("Invalid webhook payload"))
    })?;

    let Some(id) = payload.payment_id.as_deref().and_then(parse_payment_id) else {
        rejected("unknown_payment");
        return Err(not_found());
    };

    let status = match payload.status.as_deref().map(str::parse::<PaymentStatus>) {
        Some(Ok(status)) if status.is_terminal() => status,
        _ => {
            if state.store.get(id).await?.is_none() {
                rejected("unknown_payment");
                return Err(not_found());
            }
            rejected("invalid_status");
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "status must be one of: paid, failed"
            )));
        }
    };

    let provider_txn = payload.provider_txn.filter(|txn| !txn.is_empty());

    let (_, outcome) = state
        .store
        .update(
            id,
            Box::new(move |payment: &mut PspPayment| {
                let outcome = payment.transition_to(status)?;
                if outcome == Outcome::Applied && provider_txn.is_some() {
                    payment.details.provider_txn = provider_txn;
                }
                Ok(outcome)
            }),
        )
        .await
        .map_err(|e| {
            tracing::warn!(payment_id = %id, error = %e, "Webhook update rejected");
            rejected(match &e {
                PaymentError::NotFound(_) => "unknown_payment",
                _ => "illegal_transition",
            });
            AppError::from(e)
        })?;

    if outcome == Outcome::Applied {
        record_status_change(status);
    }
    tracing::info!(
        payment_id = %id,
        status = %status,
        outcome = ?outcome,
        "Webhook processed"
    );

    Ok(Json(WebhookAck { ok: true }))
}

fn rejected(reason: &'static str) {
    counter!("webhooks_rejected_total", "reason" => reason).increment(1);
}
