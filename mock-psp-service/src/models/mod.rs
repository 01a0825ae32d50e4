use serde::{Deserialize, Serialize};
use service_core::payments::PaymentRecord;

pub const DEFAULT_METHOD: &str = "card";

/// A PSP payment as stored and returned by `/status`.
pub type PspPayment = PaymentRecord<PspPaymentDetails>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PspPaymentDetails {
    pub description: String,
    /// Provider transaction id, set once the payment settles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_txn: Option<String>,
}
