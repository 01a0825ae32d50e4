use mock_psp_service::{config::MockPspConfig, Application};
use service_core::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = MockPspConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_tracing(
        "mock-psp-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;
    init_metrics()?;

    if !config.webhook.signature_enabled {
        tracing::warn!("Webhook signature verification disabled - /webhook accepts any caller");
    }

    let application = Application::build(config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?;
    application.run_until_stopped().await?;

    Ok(())
}
