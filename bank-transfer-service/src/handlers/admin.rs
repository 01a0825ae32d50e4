use axum::{extract::State, Json};
use chrono::Utc;
use metrics::counter;
use service_core::error::AppError;
use service_core::payments::{parse_payment_id, Outcome, PaymentStatus};

use super::not_found;
use crate::{
    dtos::{MarkReceivedRequest, PaymentEnvelope},
    middleware::AdminGuard,
    models::BankTransfer,
    services::references::bank_txn_id,
    startup::AppState,
};

/// Manual reconciliation: the operator saw the money arrive.
///
/// Marking an already paid transfer again returns it unchanged; a failed
/// transfer cannot be marked received.
pub async fn mark_received(
    State(state): State<AppState>,
    _admin: AdminGuard,
    Json(payload): Json<MarkReceivedRequest>,
) -> Result<Json<PaymentEnvelope>, AppError> {
    let id = payload
        .payment_id
        .as_deref()
        .and_then(parse_payment_id)
        .ok_or_else(not_found)?;

    let now = Utc::now();
    let provider_txn_id = payload
        .provider_txn_id
        .filter(|txn| !txn.is_empty())
        .unwrap_or_else(|| bank_txn_id(now));

    let (payment, outcome) = state
        .store
        .update(
            id,
            Box::new(move |payment: &mut BankTransfer| {
                let outcome = payment.transition_to(PaymentStatus::Paid)?;
                if outcome == Outcome::Applied {
                    payment.details.provider_txn_id = Some(provider_txn_id);
                    payment.details.paid_at = Some(now);
                }
                Ok(outcome)
            }),
        )
        .await
        .map_err(|e| {
            tracing::warn!(payment_id = %id, error = %e, "Mark received rejected");
            AppError::from(e)
        })?;

    match outcome {
        Outcome::Applied => {
            counter!(
                "payment_status_changes_total",
                "variant" => "bank_transfer",
                "status" => PaymentStatus::Paid.as_str()
            )
            .increment(1);
            tracing::info!(
                payment_id = %id,
                provider_txn_id = ?payment.details.provider_txn_id,
                "Bank transfer marked received"
            );
        }
        Outcome::Unchanged => {
            tracing::info!(payment_id = %id, "Bank transfer was already marked received");
        }
    }

    Ok(Json(PaymentEnvelope::from(payment)))
}
