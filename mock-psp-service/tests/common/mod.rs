#![allow(dead_code)]

use mock_psp_service::config::{MockPspConfig, WebhookConfig};
use mock_psp_service::{AppState, Application};
use reqwest::{Client, Response};
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use service_core::utils::signature::sign_webhook;

pub const TEST_WEBHOOK_SECRET: &str = "test-webhook-secret";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub state: AppState,
    pub client: Client,
}

pub fn test_config(signature_enabled: bool) -> MockPspConfig {
    MockPspConfig {
        common: CoreConfig {
            port: 0, // Random port
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
        public_url: "http://checkout.test".to_string(),
        webhook: WebhookConfig {
            secret: Secret::new(TEST_WEBHOOK_SECRET.to_string()),
            signature_enabled,
            tolerance_secs: 300,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(test_config(true)).await
    }

    pub async fn spawn_with_config(config: MockPspConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let state = app.state();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            state,
            client,
        }
    }

    pub async fn create(&self, body: Value) -> Response {
        self.client
            .post(format!("{}/create-payment", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a payment and return its id.
    pub async fn create_payment(&self, amount: f64) -> String {
        let response = self.create(json!({ "amount": amount })).await;
        assert!(response.status().is_success());
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["paymentId"]
            .as_str()
            .expect("paymentId missing")
            .to_string()
    }

    pub async fn status(&self, payment_id: &str) -> Response {
        self.client
            .get(format!("{}/status/{}", self.address, payment_id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn status_json(&self, payment_id: &str) -> Value {
        self.status(payment_id)
            .await
            .json()
            .await
            .expect("Failed to parse JSON")
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post(&self, path: &str) -> Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Send a webhook signed with the test secret at the current time.
    pub async fn signed_webhook(&self, body: Value) -> Response {
        let timestamp = chrono::Utc::now().timestamp();
        let raw = serde_json::to_vec(&body).unwrap();
        let signature = sign_webhook(TEST_WEBHOOK_SECRET, timestamp, &raw).unwrap();
        self.raw_webhook(raw, Some((timestamp, signature))).await
    }

    pub async fn raw_webhook(&self, body: Vec<u8>, signature: Option<(i64, String)>) -> Response {
        let mut request = self
            .client
            .post(format!("{}/webhook", self.address))
            .header("content-type", "application/json")
            .body(body);
        if let Some((timestamp, signature)) = signature {
            request = request
                .header("X-Webhook-Timestamp", timestamp.to_string())
                .header("X-Webhook-Signature", signature);
        }
        request.send().await.expect("Failed to execute request")
    }
}
