//! CORS preflight check
//!
//! Check 5: CORS Configuration

use tracing::{debug, info};

use super::{conclude, CheckFailure, Verdict, ROOT_PATH};
use crate::http::{HttpClient, HttpRequest};
use crate::models::{CheckCase, CheckResult};
use crate::utils::Timer;

pub const DEFAULT_ORIGIN: &str = "https://example.com";

const ALLOW_ORIGIN: &str = "access-control-allow-origin";

/// Check 5: a preflight to `/api/` is answered with an allow-origin header
#[derive(Clone, Debug)]
pub struct CorsCheck {
    pub origin: String,
    pub request_method: String,
    pub request_headers: String,
}

impl CorsCheck {
    pub fn new() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            request_method: "GET".to_string(),
            request_headers: "Content-Type".to_string(),
        }
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub async fn run(&self, client: &HttpClient) -> CheckResult {
        info!("Running CORS Configuration check");
        let timer = Timer::start("cors");
        conclude(
            CheckCase::CorsConfiguration,
            timer,
            self.verify(client).await,
        )
    }

    async fn verify(&self, client: &HttpClient) -> Result<Verdict, CheckFailure> {
        let request = HttpRequest::options(ROOT_PATH)
            .header("Origin", self.origin.as_str())
            .header("Access-Control-Request-Method", self.request_method.as_str())
            .header(
                "Access-Control-Request-Headers",
                self.request_headers.as_str(),
            );

        // Any status is fine as long as the header is there
        let resp = client.send(request).await?;
        debug!("Preflight status: {}", resp.status_code);
        debug!("CORS headers: {:?}", resp.headers);

        let allowed = resp
            .get_header(ALLOW_ORIGIN)
            .ok_or(CheckFailure::MissingHeader(ALLOW_ORIGIN))?;

        Ok(Verdict::new(format!("CORS is configured (allow-origin: {allowed})")))
    }
}

impl Default for CorsCheck {
    fn default() -> Self {
        Self::new()
    }
}
