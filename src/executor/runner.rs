//! Check execution runner
//!
//! Runs the selected checks one after another against a single backend.

use anyhow::{Context, Result};
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{error, info};

use crate::checks::{self, CheckOptions};
use crate::http::HttpClient;
use crate::models::{CheckCase, CheckResult, SuiteSummary};
use crate::utils::Timer;

/// Sequential runner for the backend checks
pub struct SuiteRunner {
    client: HttpClient,
    base_url: String,
    options: CheckOptions,
    checks: Vec<CheckCase>,
}

impl SuiteRunner {
    /// Create a runner for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let base_url = base_url.into();
        let client = HttpClient::with_timeout(timeout_secs)
            .context("Failed to create HTTP client")?
            .base_url(base_url.clone());

        Ok(Self {
            client,
            base_url,
            options: CheckOptions::default(),
            checks: CheckCase::all(),
        })
    }

    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    /// Restrict the run to `selected`; canonical order is kept
    pub fn with_checks(mut self, selected: &[CheckCase]) -> Self {
        self.checks = CheckCase::all()
            .into_iter()
            .filter(|case| selected.contains(case))
            .collect();
        self
    }

    pub fn checks(&self) -> &[CheckCase] {
        &self.checks
    }

    /// Run a single check; a panic inside it becomes an error result
    pub async fn run_check(&self, case: CheckCase) -> CheckResult {
        guarded(
            case,
            checks::run_check(case, &self.client, &self.options),
        )
        .await
    }

    /// Run all selected checks sequentially
    pub async fn run_all(&self) -> SuiteSummary {
        info!(
            "Starting {} checks against {}",
            self.checks.len(),
            self.base_url
        );

        let started_at = Utc::now();
        let timer = Timer::start("suite");
        let mut results = Vec::with_capacity(self.checks.len());

        for &case in &self.checks {
            let result = self.run_check(case).await;
            info!("  {}", result);
            results.push(result);
        }

        let summary = SuiteSummary::new(self.base_url.clone(), started_at, results);

        info!(
            "Suite completed in {}ms - Pass: {}/{} ({:.1}%)",
            timer.elapsed_ms(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        summary
    }
}

/// Await a check, turning a panic into an [`CheckStatus::Error`] result
///
/// [`CheckStatus::Error`]: crate::models::CheckStatus::Error
pub async fn guarded<F>(case: CheckCase, check: F) -> CheckResult
where
    F: Future<Output = CheckResult>,
{
    let timer = Timer::start(case.slug());
    match AssertUnwindSafe(check).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            error!("{} broke: {}", case, reason);
            CheckResult::error(case, timer.elapsed_ms(), format!("check panicked: {reason}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
