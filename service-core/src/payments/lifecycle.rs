//! Payment status state machine.
//!
//! ```text
//! created ──► paid
//!    └──────► failed
//! pending ──► paid
//!    └──────► failed
//! ```
//!
//! `paid` and `failed` are terminal. Re-applying the current status is a
//! no-op rather than an error so repeated webhooks stay harmless.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::PaymentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Checkout session opened, waiting for the payer.
    Created,
    /// Bank transfer announced, waiting for reconciliation.
    Pending,
    Paid,
    Failed,
}

/// Result of applying a change to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Unchanged,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Created => "created",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::Failed)
    }

    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (
                PaymentStatus::Created | PaymentStatus::Pending,
                PaymentStatus::Paid | PaymentStatus::Failed
            )
        )
    }

    /// Validate a move to `next`.
    pub fn check_transition(&self, next: PaymentStatus) -> Result<Outcome, PaymentError> {
        if *self == next {
            return Ok(Outcome::Unchanged);
        }

        if self.can_transition_to(next) {
            Ok(Outcome::Applied)
        } else {
            Err(PaymentError::IllegalTransition {
                from: *self,
                to: next,
            })
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(PaymentStatus::Created),
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}
