use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production, parse_env};
use service_core::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct BankTransferConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub uploads: UploadConfig,
    pub bank: BankAccountConfig,
    pub mobile_wallet: String,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub dir: String,
    pub max_bytes: usize,
}

/// Account the payer transfers to, shown verbatim in every session.
#[derive(Debug, Clone, Deserialize)]
pub struct BankAccountConfig {
    pub bank: String,
    pub branch: String,
    pub account_number: String,
    pub account_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Bearer token for `/admin/*`. Unset means the admin routes are open.
    pub token: Option<Secret<String>>,
}

impl BankTransferConfig {
    pub fn load() -> Result<Self, AppError> {
        let mut common = core_config::Config::load()?;
        common.port = parse_env("PORT", 4000)?;

        let is_prod = is_production();

        let admin_token = std::env::var("ADMIN_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .map(Secret::new);
        if is_prod && admin_token.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "ADMIN_TOKEN is required in production but not set"
            )));
        }

        Ok(Self {
            common,
            uploads: UploadConfig {
                dir: get_env("UPLOAD_DIR", Some("uploads"), false)?,
                max_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            },
            bank: BankAccountConfig {
                bank: get_env("BANK_NAME", Some("Sonali Bank"), false)?,
                branch: get_env("BANK_BRANCH", Some("AKKALPUR"), false)?,
                account_number: get_env("BANK_ACCOUNT_NUMBER", Some("0701301000064"), false)?,
                account_name: get_env("BANK_ACCOUNT_NAME", Some("MD RASEL"), false)?,
            },
            mobile_wallet: get_env("MOBILE_WALLET_NUMBER", Some("01882278234"), false)?,
            admin: AdminConfig { token: admin_token },
        })
    }
}
