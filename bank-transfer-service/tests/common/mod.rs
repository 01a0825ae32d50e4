#![allow(dead_code)]

use bank_transfer_service::config::{
    AdminConfig, BankAccountConfig, BankTransferConfig, UploadConfig,
};
use bank_transfer_service::{AppState, Application};
use reqwest::{multipart, Client, Response};
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use uuid::Uuid;

pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub upload_dir: String,
    pub state: AppState,
    pub client: Client,
}

pub fn test_config(upload_dir: &str, admin_token: Option<&str>) -> BankTransferConfig {
    BankTransferConfig {
        common: CoreConfig {
            port: 0, // Random port
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
        uploads: UploadConfig {
            dir: upload_dir.to_string(),
            max_bytes: 1024 * 1024,
        },
        bank: BankAccountConfig {
            bank: "Sonali Bank".to_string(),
            branch: "TEST BRANCH".to_string(),
            account_number: "0000000000000".to_string(),
            account_name: "TEST MERCHANT".to_string(),
        },
        mobile_wallet: "01700000000".to_string(),
        admin: AdminConfig {
            token: admin_token.map(|t| Secret::new(t.to_string())),
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_admin_token(None).await
    }

    pub async fn spawn_with_admin_token(admin_token: Option<&str>) -> Self {
        let upload_dir = format!("target/test-uploads-{}", Uuid::new_v4());
        let config = test_config(&upload_dir, admin_token);

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
            upload_dir,
            state,
            client,
        }
    }

    pub async fn create_transfer(&self, body: Value) -> Response {
        self.client
            .post(format!("{}/create-bank-transfer", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a transfer and return its payment id.
    pub async fn create_payment(&self, amount: f64) -> String {
        let response = self.create_transfer(json!({ "amount": amount })).await;
        assert!(response.status().is_success());
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["payment_id"]
            .as_str()
            .expect("payment_id missing")
            .to_string()
    }

    pub async fn status(&self, payment_id: &str) -> Response {
        self.client
            .get(format!("{}/status/{}", self.address, payment_id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn upload_screenshot(&self, payment_id: &str, name: &str, data: Vec<u8>) -> Response {
        let form = multipart::Form::new().part(
            "screenshot",
            multipart::Part::bytes(data)
                .file_name(name.to_string())
                .mime_str("image/png")
                .unwrap(),
        );
        self.upload_form(payment_id, form).await
    }

    pub async fn upload_form(&self, payment_id: &str, form: multipart::Form) -> Response {
        self.client
            .post(format!("{}/upload-screenshot/{}", self.address, payment_id))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn mark_received(&self, body: Value, token: Option<&str>) -> Response {
        let mut request = self
            .client
            .post(format!("{}/admin/mark-received", self.address))
            .json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub fn stored_files(&self) -> Vec<String> {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remove the upload directory created for this test.
    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.upload_dir).await;
    }
}
