use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Outcome, PaymentError, PaymentStatus};

/// A payment and its lifecycle state.
///
/// `details` holds the fields only one service cares about and is flattened
/// into the same JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord<E> {
    pub id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub method: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: E,
}

impl<E> PaymentRecord<E> {
    /// New record in the `created` state (hosted checkout flow).
    pub fn created(amount: f64, currency: String, method: String, details: E) -> Self {
        Self::open(PaymentStatus::Created, amount, currency, method, details)
    }

    /// New record in the `pending` state (awaiting manual reconciliation).
    pub fn pending(amount: f64, currency: String, method: String, details: E) -> Self {
        Self::open(PaymentStatus::Pending, amount, currency, method, details)
    }

    fn open(
        status: PaymentStatus,
        amount: f64,
        currency: String,
        method: String,
        details: E,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            currency,
            method,
            status,
            created_at: Utc::now(),
            details,
        }
    }

    /// Move to `next` if the lifecycle allows it.
    pub fn transition_to(&mut self, next: PaymentStatus) -> Result<Outcome, PaymentError> {
        let outcome = self.status.check_transition(next)?;
        self.status = next;
        Ok(outcome)
    }
}

/// The amount a caller supplied, if it counts as present.
///
/// Missing, `null` and zero amounts are all treated as absent.
pub fn required_amount(amount: Option<f64>) -> Option<f64> {
    amount.filter(|a| *a != 0.0)
}

/// Parse a payment id taken from a path or body.
///
/// Anything that is not a UUID can never name a stored payment.
pub fn parse_payment_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
