use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production, parse_env};
use service_core::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct MockPspConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    /// Base URL checkout links are built from.
    pub public_url: String,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Shared HMAC secret between the provider and this service.
    pub secret: Secret<String>,
    pub signature_enabled: bool,
    /// Maximum allowed clock skew for `X-Webhook-Timestamp`, in seconds.
    pub tolerance_secs: i64,
}

impl MockPspConfig {
    pub fn load() -> Result<Self, AppError> {
        let mut common = core_config::Config::load()?;
        common.port = parse_env("MOCK_PSP_PORT", 3000)?;

        let is_prod = is_production();

        let public_url = std::env::var("MOCK_PSP_PUBLIC_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", common.port));

        let signature_enabled = parse_env("WEBHOOK_SIGNATURE_ENABLED", true)?;
        if is_prod && !signature_enabled {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "WEBHOOK_SIGNATURE_ENABLED cannot be disabled in production"
            )));
        }

        Ok(Self {
            common,
            public_url: public_url.trim_end_matches('/').to_string(),
            webhook: WebhookConfig {
                secret: Secret::new(get_env(
                    "WEBHOOK_SECRET",
                    Some("dev-webhook-secret"),
                    is_prod,
                )?),
                signature_enabled,
                tolerance_secs: parse_env("WEBHOOK_TOLERANCE_SECONDS", 300)?,
            },
        })
    }

    pub fn checkout_url(&self, payment_id: &uuid::Uuid) -> String {
        format!("{}/mock-checkout/{}", self.public_url, payment_id)
    }
}
