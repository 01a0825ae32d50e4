use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_core::payments::PaymentRecord;

use crate::config::BankAccountConfig;

pub const BANK_TRANSFER_METHOD: &str = "bank_transfer";

/// A bank transfer payment as stored and returned by `/status`.
pub type BankTransfer = PaymentRecord<BankTransferDetails>;

/// Fields specific to bank transfers, flattened into the payment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransferDetails {
    /// Reference the payer writes on the transfer slip.
    #[serde(rename = "payRef")]
    pub pay_ref: String,
    pub sonali: BankAccount,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub uploaded_screenshots: Vec<ScreenshotEvidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_txn_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub bank: String,
    pub branch: String,
    pub account_number: String,
    pub account_name: String,
}

impl From<&BankAccountConfig> for BankAccount {
    fn from(config: &BankAccountConfig) -> Self {
        Self {
            bank: config.bank.clone(),
            branch: config.branch.clone(),
            account_number: config.account_number.clone(),
            account_name: config.account_name.clone(),
        }
    }
}

/// One uploaded proof-of-transfer file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotEvidence {
    pub filename: String,
    /// Public URL path under `/uploads`.
    pub path: String,
    pub uploaded_at: DateTime<Utc>,
}
