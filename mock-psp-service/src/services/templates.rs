//! HTML pages of the simulated hosted checkout.
//!
//! Values are HTML-escaped by the template engine.

use askama::Template;
use service_core::error::AppError;

#[derive(Template)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate<'a> {
    pub payment_id: &'a str,
    pub amount: f64,
    pub currency: &'a str,
    pub description: &'a str,
}

#[derive(Template)]
#[template(path = "confirmation.html")]
pub struct ConfirmationTemplate<'a> {
    pub payment_id: &'a str,
    pub outcome: &'a str,
}

pub fn render<T: Template>(template: &T) -> Result<String, AppError> {
    template.render().map_err(|e| {
        tracing::error!(error = %e, "Failed to render template");
        AppError::InternalError(anyhow::anyhow!("Template rendering failed: {}", e))
    })
}
