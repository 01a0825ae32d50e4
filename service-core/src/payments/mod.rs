//! Payment records, their lifecycle and the store that owns them.
//!
//! Both demo services share this model; each one plugs its own
//! variant-specific fields into [`PaymentRecord`] through the `details`
//! type parameter.

pub mod lifecycle;
pub mod record;
pub mod store;

pub use lifecycle::{Outcome, PaymentStatus};
pub use record::{PaymentRecord, parse_payment_id, required_amount};
pub use store::{InMemoryPaymentStore, Mutation, PaymentStore};

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment {0} not found")]
    NotFound(Uuid),

    #[error("payment {0} already exists")]
    DuplicateId(Uuid),

    #[error("cannot move payment from {from} to {to}")]
    IllegalTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
}
