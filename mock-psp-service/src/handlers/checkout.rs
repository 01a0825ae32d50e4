//! Hosted checkout simulation: the page a payer would see and the two
//! buttons on it.

use axum::{
    extract::{Path, State},
    response::Html,
};
use metrics::counter;
use service_core::error::AppError;
use service_core::payments::{Outcome, PaymentStatus};
use std::time::Duration;

use super::{not_found, payment_id};
use crate::{
    models::PspPayment,
    services::{
        references::mock_txn_id,
        templates::{render, CheckoutTemplate, ConfirmationTemplate},
    },
    startup::AppState,
};

const SIMULATED_WEBHOOK_DELAY: Duration = Duration::from_millis(500);

pub async fn checkout_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = payment_id(&raw_id)?;
    let payment = state.store.get(id).await?.ok_or_else(not_found)?;
    let payment_id = payment.id.to_string();

    let html = render(&CheckoutTemplate {
        payment_id: &payment_id,
        amount: payment.amount,
        currency: &payment.currency,
        description: &payment.details.description,
    })?;

    Ok(Html(html))
}

/// "Simulate SUCCESS": settle the payment with a fresh provider transaction id.
pub async fn mock_pay(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = payment_id(&raw_id)?;
    let provider_txn = mock_txn_id();

    let (payment, outcome) = state
        .store
        .update(
            id,
            Box::new(move |payment: &mut PspPayment| {
                let outcome = payment.transition_to(PaymentStatus::Paid)?;
                if outcome == Outcome::Applied {
                    payment.details.provider_txn = Some(provider_txn);
                }
                Ok(outcome)
            }),
        )
        .await
        .map_err(|e| {
            tracing::warn!(payment_id = %id, error = %e, "Mock pay rejected");
            AppError::from(e)
        })?;

    if outcome == Outcome::Applied {
        record_status_change(PaymentStatus::Paid);
        tracing::info!(
            payment_id = %id,
            provider_txn = ?payment.details.provider_txn,
            "Payment marked paid"
        );

        // A real provider would now call /webhook.
        tokio::spawn(async move {
            tokio::time::sleep(SIMULATED_WEBHOOK_DELAY).await;
            tracing::info!(payment_id = %id, "Simulated webhook: payment paid");
        });
    }

    confirmation(&payment, "SUCCESS")
}

/// "Simulate FAIL".
pub async fn mock_fail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = payment_id(&raw_id)?;

    let (payment, outcome) = state
        .store
        .update(
            id,
            Box::new(|payment: &mut PspPayment| payment.transition_to(PaymentStatus::Failed)),
        )
        .await
        .map_err(|e| {
            tracing::warn!(payment_id = %id, error = %e, "Mock fail rejected");
            AppError::from(e)
        })?;

    if outcome == Outcome::Applied {
        record_status_change(PaymentStatus::Failed);
        tracing::info!(payment_id = %id, "Payment marked failed");
    }

    confirmation(&payment, "FAILED")
}

fn confirmation(payment: &PspPayment, outcome: &str) -> Result<Html<String>, AppError> {
    let payment_id = payment.id.to_string();
    let html = render(&ConfirmationTemplate {
        payment_id: &payment_id,
        outcome,
    })?;
    Ok(Html(html))
}

pub(crate) fn record_status_change(status: PaymentStatus) {
    counter!(
        "payment_status_changes_total",
        "variant" => "mock_psp",
        "status" => status.as_str()
    )
    .increment(1);
}
