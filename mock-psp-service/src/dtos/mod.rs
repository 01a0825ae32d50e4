use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub method: Option<String>,
    pub description: Option<String>,
    /// Accepted for compatibility with checkout clients; not stored.
    pub user_phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentResponse {
    pub payment_id: Uuid,
    pub checkout_url: String,
}

/// Status callback sent by the provider.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    #[serde(rename = "paymentId")]
    pub payment_id: Option<String>,
    pub status: Option<String>,
    pub provider_txn: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub ok: bool,
}
