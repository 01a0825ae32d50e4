use axum::{
    extract::{Path, State},
    Json,
};
use metrics::counter;
use service_core::error::AppError;
use service_core::payments::required_amount;

use super::{not_found, payment_id};
use crate::{
    dtos::{CreateBankTransferRequest, CreateBankTransferResponse},
    models::{BankAccount, BankTransfer, BankTransferDetails, BANK_TRANSFER_METHOD},
    services::references::generate_pay_ref,
    startup::AppState,
};

const DEFAULT_CURRENCY: &str = "BDT";

/// Open a bank transfer session.
///
/// The payment starts `pending` and only leaves that state through
/// `/admin/mark-received`.
pub async fn create_bank_transfer(
    State(state): State<AppState>,
    Json(payload): Json<CreateBankTransferRequest>,
) -> Result<Json<CreateBankTransferResponse>, AppError> {
    let amount = required_amount(payload.amount)
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("amount required")))?;
    let currency = payload
        .currency
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let account = BankAccount::from(&state.config.bank);
    let pay_ref = generate_pay_ref();

    let payment = BankTransfer::pending(
        amount,
        currency.clone(),
        BANK_TRANSFER_METHOD.to_string(),
        BankTransferDetails {
            pay_ref: pay_ref.clone(),
            sonali: account.clone(),
            customer_name: payload.customer_name,
            customer_phone: payload.customer_phone,
            uploaded_screenshots: Vec::new(),
            provider_txn_id: None,
            paid_at: None,
        },
    );

    let payment_id = state.store.create(payment).await?;
    counter!("payments_created_total", "variant" => "bank_transfer").increment(1);

    tracing::info!(
        payment_id = %payment_id,
        amount,
        currency = %currency,
        pay_ref = %pay_ref,
        "Bank transfer session created"
    );

    let instructions = format!(
        "Please transfer {} {} to the above Sonali Bank account (Branch: {}) and put reference: {}. After transfer upload screenshot to confirm.",
        amount, currency, account.branch, pay_ref
    );

    Ok(Json(CreateBankTransferResponse {
        payment_id,
        amount,
        currency,
        pay_ref,
        sonali_account: account,
        mobile_wallet: state.config.mobile_wallet.clone(),
        instructions,
    }))
}

pub async fn get_status(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<BankTransfer>, AppError> {
    let id = payment_id(&raw_id)?;
    let payment = state.store.get(id).await?.ok_or_else(not_found)?;

    Ok(Json(payment))
}
