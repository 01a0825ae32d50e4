pub mod references;
pub mod templates;
pub mod webhook;

pub use webhook::{WebhookRejection, WebhookVerifier};
