use bank_transfer_service::{config::BankTransferConfig, Application};
use service_core::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = BankTransferConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_tracing(
        "bank-transfer-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;
    init_metrics()?;

    if config.admin.token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set - /admin routes are unauthenticated");
    }

    let application = Application::build(config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?;
    application.run_until_stopped().await?;

    Ok(())
}
