//! Endpoint checks
//!
//! Checks 1-4: Server Accessibility, Root Endpoint, GET Status, POST Status

use chrono::Local;
use serde_json::json;
use tracing::{debug, info};

use super::{conclude, expect_status, CheckFailure, Verdict, ROOT_PATH, STATUS_PATH};
use crate::http::HttpClient;
use crate::models::{status_list, CheckCase, CheckResult, RootMessage, StatusRecord};
use crate::utils::Timer;

/// Unique client name for a created record, e.g. `test_client_20240101_120000_a3f9`
pub fn generate_client_name() -> String {
    format!(
        "test_client_{}_{:04x}",
        Local::now().format("%Y%m%d_%H%M%S"),
        rand::random::<u16>()
    )
}

/// Check 1: the base URL answers at all
#[derive(Clone, Debug, Default)]
pub struct ServerAccessibilityCheck;

impl ServerAccessibilityCheck {
    /// 404 still proves the server is up; the base path need not be routed
    pub const ACCEPTED: [u16; 2] = [200, 404];

    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self, client: &HttpClient) -> CheckResult {
        info!("Running Server Accessibility check");
        let timer = Timer::start("server accessibility");
        conclude(
            CheckCase::ServerAccessibility,
            timer,
            self.verify(client).await,
        )
    }

    async fn verify(&self, client: &HttpClient) -> Result<Verdict, CheckFailure> {
        debug!("Base URL: {}", client.build_url(""));
        let resp = client.get("").await?;
        expect_status(&resp, &Self::ACCEPTED, "200 or 404")?;
        Ok(Verdict::new(format!(
            "server is accessible (status {})",
            resp.status_code
        )))
    }
}

/// Check 2: `GET /api/` greets
#[derive(Clone, Debug, Default)]
pub struct RootEndpointCheck;

impl RootEndpointCheck {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self, client: &HttpClient) -> CheckResult {
        info!("Running Root Endpoint check");
        let timer = Timer::start("root endpoint");
        conclude(CheckCase::RootEndpoint, timer, self.verify(client).await)
    }

    async fn verify(&self, client: &HttpClient) -> Result<Verdict, CheckFailure> {
        let resp = client.get(ROOT_PATH).await?;
        expect_status(&resp, &[200], "200")?;

        let root = RootMessage::from_json(&resp.json()?)?;
        if !root.is_expected() {
            return Err(CheckFailure::UnexpectedValue {
                field: "message",
                expected: RootMessage::EXPECTED.to_string(),
                actual: root.message,
            });
        }

        Ok(Verdict::new("root endpoint returned the expected greeting"))
    }
}

/// Check 3: `GET /api/status` lists records
#[derive(Clone, Debug, Default)]
pub struct ListStatusCheck;

impl ListStatusCheck {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self, client: &HttpClient) -> CheckResult {
        info!("Running GET Status check");
        let timer = Timer::start("list status");
        conclude(CheckCase::ListStatus, timer, self.verify(client).await)
    }

    async fn verify(&self, client: &HttpClient) -> Result<Verdict, CheckFailure> {
        let resp = client.get(STATUS_PATH).await?;
        expect_status(&resp, &[200], "200")?;

        let body = resp.json()?;
        let records = status_list(&body)?;

        Ok(Verdict::new(format!(
            "returned {} status checks",
            records.len()
        )))
    }
}

/// Check 4: `POST /api/status` creates and echoes a record
#[derive(Clone, Debug, Default)]
pub struct CreateStatusCheck {
    client_name: Option<String>,
}

impl CreateStatusCheck {
    pub fn new() -> Self {
        Self { client_name: None }
    }

    /// Submit a fixed name instead of a generated one
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    pub async fn run(&self, client: &HttpClient) -> CheckResult {
        info!("Running POST Status check");
        let timer = Timer::start("create status");
        let outcome = self.create(client).await.map(|record| {
            Verdict::new(format!("created record {}", record.id))
                .with_details(serde_json::to_value(&record).ok())
        });
        conclude(CheckCase::CreateStatus, timer, outcome)
    }

    /// Create a record and validate the echoed body
    pub async fn create(&self, client: &HttpClient) -> Result<StatusRecord, CheckFailure> {
        let name = self
            .client_name
            .clone()
            .unwrap_or_else(generate_client_name);
        let request_body = json!({ "client_name": name });
        debug!("Request data: {}", request_body);

        let resp = client.post_json(STATUS_PATH, request_body).await?;
        expect_status(&resp, &[200], "200")?;

        let record = StatusRecord::from_json(&resp.json()?)?;
        if record.client_name != name {
            return Err(CheckFailure::UnexpectedValue {
                field: "client_name",
                expected: name,
                actual: record.client_name,
            });
        }

        Ok(record)
    }
}
