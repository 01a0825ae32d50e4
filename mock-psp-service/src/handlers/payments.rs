use axum::{
    extract::{Path, State},
    Json,
};
use metrics::counter;
use service_core::error::AppError;
use service_core::payments::required_amount;

use super::{not_found, payment_id};
use crate::{
    dtos::{CreatePaymentRequest, CreatePaymentResponse},
    models::{PspPayment, PspPaymentDetails, DEFAULT_METHOD},
    startup::AppState,
};

const DEFAULT_CURRENCY: &str = "BDT";

/// Open a checkout session and hand back the hosted checkout URL.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<Json<CreatePaymentResponse>, AppError> {
    let amount = required_amount(payload.amount)
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("amount required")))?;
    let currency = payload
        .currency
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    let method = payload
        .method
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_METHOD.to_string());

    let payment = PspPayment::created(
        amount,
        currency.clone(),
        method.clone(),
        PspPaymentDetails {
            description: payload.description.unwrap_or_default(),
            provider_txn: None,
        },
    );

    let payment_id = state.store.create(payment).await?;
    counter!("payments_created_total", "variant" => "mock_psp").increment(1);

    tracing::info!(
        payment_id = %payment_id,
        amount,
        currency = %currency,
        method = %method,
        "Checkout session created"
    );

    Ok(Json(CreatePaymentResponse {
        payment_id,
        checkout_url: state.config.checkout_url(&payment_id),
    }))
}

pub async fn get_status(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<PspPayment>, AppError> {
    let id = payment_id(&raw_id)?;
    let payment = state.store.get(id).await?.ok_or_else(not_found)?;

    Ok(Json(payment))
}
