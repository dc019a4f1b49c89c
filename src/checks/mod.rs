//! Backend check implementations
//!
//! This module contains the six checks run against the status-check API.
//!
//! ## Checks
//!
//! 1. Server Accessibility - `GET <base>` answers 200 or 404
//! 2. Root Endpoint - `GET /api/` answers `{"message": "Hello World"}`
//! 3. GET Status Endpoint - `GET /api/status` answers an array
//! 4. POST Status Endpoint - `POST /api/status` echoes a new record
//! 5. CORS Configuration - preflight `OPTIONS /api/` carries allow-origin
//! 6. Database Persistence - a created record shows up in the listing
//!
//! Every failure inside a check (transport, status, JSON, schema) becomes a
//! failed [`CheckResult`]; nothing here aborts the suite.

mod api;
mod cors;
mod persistence;

pub use api::{
    generate_client_name, CreateStatusCheck, ListStatusCheck, RootEndpointCheck,
    ServerAccessibilityCheck,
};
pub use cors::CorsCheck;
pub use persistence::PersistenceCheck;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::http::{HttpClient, HttpError, HttpResponse};
use crate::models::{CheckCase, CheckResult, SchemaError};
use crate::utils::Timer;

pub const ROOT_PATH: &str = "/api/";
pub const STATUS_PATH: &str = "/api/status";

/// Why a check did not pass
#[derive(Error, Debug)]
pub enum CheckFailure {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("unexpected status {actual} (expected {expected})")]
    UnexpectedStatus { expected: &'static str, actual: u16 },

    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("schema violation: {0}")]
    Schema(#[from] SchemaError),

    #[error("{field} was {actual:?}, expected {expected:?}")]
    UnexpectedValue {
        field: &'static str,
        expected: String,
        actual: String,
    },

    #[error("response is missing header '{0}'")]
    MissingHeader(&'static str),

    #[error("record {id} not found among {listed} listed records")]
    NotPersisted { id: String, listed: usize },

    #[error("could not create record: {0}")]
    CreateFailed(Box<CheckFailure>),
}

/// Settings shared by the checks
#[derive(Clone, Debug)]
pub struct CheckOptions {
    /// `Origin` sent with the CORS preflight
    pub cors_origin: String,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            cors_origin: cors::DEFAULT_ORIGIN.to_string(),
        }
    }
}

/// Successful check outcome
#[derive(Clone, Debug)]
pub(crate) struct Verdict {
    message: String,
    details: Option<Value>,
}

impl Verdict {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    pub(crate) fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }
}

/// Fail unless the status code is one of `accepted`
pub(crate) fn expect_status(
    response: &HttpResponse,
    accepted: &[u16],
    expected: &'static str,
) -> Result<(), CheckFailure> {
    if accepted.contains(&response.status_code) {
        Ok(())
    } else {
        Err(CheckFailure::UnexpectedStatus {
            expected,
            actual: response.status_code,
        })
    }
}

/// Turn a check outcome into a result, logging the verdict
pub(crate) fn conclude(
    case: CheckCase,
    timer: Timer,
    outcome: Result<Verdict, CheckFailure>,
) -> CheckResult {
    let duration_ms = timer.elapsed_ms();
    match outcome {
        Ok(verdict) => {
            info!("✓ {}: {}", case.name(), verdict.message);
            let result = CheckResult::pass(case, duration_ms).with_message(verdict.message);
            match verdict.details {
                Some(details) => result.with_details(details),
                None => result,
            }
        }
        Err(e) => {
            warn!("✗ {}: {}", case.name(), e);
            CheckResult::fail(case, duration_ms, e.to_string())
        }
    }
}

/// Run a single check against the client's base URL
pub async fn run_check(case: CheckCase, client: &HttpClient, options: &CheckOptions) -> CheckResult {
    match case {
        CheckCase::ServerAccessibility => ServerAccessibilityCheck::new().run(client).await,
        CheckCase::RootEndpoint => RootEndpointCheck::new().run(client).await,
        CheckCase::ListStatus => ListStatusCheck::new().run(client).await,
        CheckCase::CreateStatus => CreateStatusCheck::new().run(client).await,
        CheckCase::CorsConfiguration => {
            CorsCheck::new()
                .origin(options.cors_origin.clone())
                .run(client)
                .await
        }
        CheckCase::Persistence => PersistenceCheck::new().run(client).await,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    pub const RECORD_ID: &str = "8d7c5a1e-3b2f-4c6d-9e0a-1f2b3c4d5e6f";
    pub const TIMESTAMP: &str = "2024-01-01T12:00:00.000000";

    /// Answers `POST /api/status` with a record echoing the submitted name
    pub struct EchoStatus {
        pub id: &'static str,
    }

    impl Respond for EchoStatus {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
            ResponseTemplate::new(200).set_body_json(json!({
                "id": self.id,
                "client_name": body["client_name"],
                "timestamp": TIMESTAMP,
            }))
        }
    }

    pub fn listed_record() -> Value {
        json!({
            "id": RECORD_ID,
            "client_name": "test_client_20240101_120000",
            "timestamp": TIMESTAMP,
        })
    }

    /// Mount every route of a well-behaved backend
    pub async fn mount_conformant_api(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "Hello World" })),
            )
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([listed_record()])))
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/status"))
            .respond_with(EchoStatus { id: RECORD_ID })
            .mount(server)
            .await;

        Mock::given(method("OPTIONS"))
            .and(path("/api/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("access-control-allow-origin", "*")
                    .insert_header("access-control-allow-methods", "GET, POST, OPTIONS"),
            )
            .mount(server)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::mount_conformant_api;
    use super::*;
    use crate::models::CheckStatus;
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_every_check_passes_against_conformant_api() {
        let server = MockServer::start().await;
        mount_conformant_api(&server).await;

        let client = HttpClient::new().unwrap().base_url(server.uri());
        let options = CheckOptions::default();

        for case in CheckCase::all() {
            let result = run_check(case, &client, &options).await;
            assert_eq!(result.status, CheckStatus::Pass, "{result}");
        }
    }

    #[test]
    fn test_expect_status() {
        let resp = HttpResponse {
            status_code: 500,
            headers: Default::default(),
            body: String::new(),
            duration_ms: 1,
        };
        let err = expect_status(&resp, &[200], "200").unwrap_err();
        assert_eq!(err.to_string(), "unexpected status 500 (expected 200)");
    }

    #[test]
    fn test_conclude_failure_keeps_diagnostic() {
        let result = conclude(
            CheckCase::CorsConfiguration,
            Timer::start("cors"),
            Err(CheckFailure::MissingHeader("access-control-allow-origin")),
        );
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(
            result.message.as_deref(),
            Some("response is missing header 'access-control-allow-origin'")
        );
    }
}
