use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{BankAccount, BankTransfer};

#[derive(Debug, Deserialize)]
pub struct CreateBankTransferRequest {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateBankTransferResponse {
    pub payment_id: Uuid,
    pub amount: f64,
    pub currency: String,
    #[serde(rename = "payRef")]
    pub pay_ref: String,
    pub sonali_account: BankAccount,
    pub mobile_wallet: String,
    pub instructions: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkReceivedRequest {
    pub payment_id: Option<String>,
    pub provider_txn_id: Option<String>,
}

/// `{ok, payment}` envelope returned by mutating endpoints.
#[derive(Debug, Serialize)]
pub struct PaymentEnvelope {
    pub ok: bool,
    pub payment: BankTransfer,
}

impl From<BankTransfer> for PaymentEnvelope {
    fn from(payment: BankTransfer) -> Self {
        Self { ok: true, payment }
    }
}
