//! Check result models for the backend smoke suite
//!
//! Defines check cases, results, and status types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six backend checks, in canonical run order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCase {
    ServerAccessibility,
    RootEndpoint,
    ListStatus,
    CreateStatus,
    CorsConfiguration,
    Persistence,
}

impl CheckCase {
    /// Get check number (1-6)
    pub fn number(&self) -> u8 {
        match self {
            CheckCase::ServerAccessibility => 1,
            CheckCase::RootEndpoint => 2,
            CheckCase::ListStatus => 3,
            CheckCase::CreateStatus => 4,
            CheckCase::CorsConfiguration => 5,
            CheckCase::Persistence => 6,
        }
    }

    /// Get check name
    pub fn name(&self) -> &'static str {
        match self {
            CheckCase::ServerAccessibility => "Server Accessibility",
            CheckCase::RootEndpoint => "Root Endpoint",
            CheckCase::ListStatus => "GET Status Endpoint",
            CheckCase::CreateStatus => "POST Status Endpoint",
            CheckCase::CorsConfiguration => "CORS Configuration",
            CheckCase::Persistence => "Database Persistence",
        }
    }

    /// Command-line identifier
    pub fn slug(&self) -> &'static str {
        match self {
            CheckCase::ServerAccessibility => "accessibility",
            CheckCase::RootEndpoint => "root",
            CheckCase::ListStatus => "list-status",
            CheckCase::CreateStatus => "create-status",
            CheckCase::CorsConfiguration => "cors",
            CheckCase::Persistence => "persistence",
        }
    }

    /// Request(s) issued by the check, for listings
    pub fn request(&self) -> &'static str {
        match self {
            CheckCase::ServerAccessibility => "GET <base>",
            CheckCase::RootEndpoint => "GET /api/",
            CheckCase::ListStatus => "GET /api/status",
            CheckCase::CreateStatus => "POST /api/status",
            CheckCase::CorsConfiguration => "OPTIONS /api/",
            CheckCase::Persistence => "POST /api/status, GET /api/status",
        }
    }

    /// Get all checks
    pub fn all() -> Vec<CheckCase> {
        vec![
            CheckCase::ServerAccessibility,
            CheckCase::RootEndpoint,
            CheckCase::ListStatus,
            CheckCase::CreateStatus,
            CheckCase::CorsConfiguration,
            CheckCase::Persistence,
        ]
    }

    /// Parse from the command-line identifier
    pub fn from_slug(s: &str) -> Option<CheckCase> {
        let s = s.to_lowercase();
        CheckCase::all().into_iter().find(|c| c.slug() == s)
    }
}

impl fmt::Display for CheckCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Check {}: {}", self.number(), self.name())
    }
}

/// Check execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Error,
}

impl CheckStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "✓",
            CheckStatus::Fail => "✗",
            CheckStatus::Error => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CheckStatus::Pass)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "PASS"),
            CheckStatus::Fail => write!(f, "FAIL"),
            CheckStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single check execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckResult {
    pub case: CheckCase,
    pub status: CheckStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl CheckResult {
    pub fn pass(case: CheckCase, duration_ms: u64) -> Self {
        Self {
            case,
            status: CheckStatus::Pass,
            duration_ms,
            message: None,
            details: None,
        }
    }

    pub fn fail(case: CheckCase, duration_ms: u64, message: impl Into<String>) -> Self {
        Self {
            case,
            status: CheckStatus::Fail,
            duration_ms,
            message: Some(message.into()),
            details: None,
        }
    }

    pub fn error(case: CheckCase, duration_ms: u64, error: impl Into<String>) -> Self {
        Self {
            case,
            status: CheckStatus::Error,
            duration_ms,
            message: Some(error.into()),
            details: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn passed(&self) -> bool {
        self.status.is_success()
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.case,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Aggregated outcome of one suite run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub total_duration_ms: u64,
    pub results: Vec<CheckResult>,
}

impl SuiteSummary {
    pub fn new(
        target: impl Into<String>,
        started_at: DateTime<Utc>,
        results: Vec<CheckResult>,
    ) -> Self {
        let total = results.len();
        let passed = results
            .iter()
            .filter(|r| r.status == CheckStatus::Pass)
            .count();
        let failed = results
            .iter()
            .filter(|r| r.status == CheckStatus::Fail)
            .count();
        let errors = results
            .iter()
            .filter(|r| r.status == CheckStatus::Error)
            .count();
        let total_duration_ms = results.iter().map(|r| r.duration_ms).sum();

        Self {
            target: target.into(),
            started_at,
            total,
            passed,
            failed,
            errors,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.passed == self.total
    }
}

impl fmt::Display for SuiteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Backend checks - {}", self.target)?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(
            f,
            "Overall: {}/{} checks passed",
            self.passed, self.total
        )
    }
}
