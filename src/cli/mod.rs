//! CLI argument parsing
//!
//! Defines command-line interface using clap. Every flag is optional; a bare
//! invocation runs the whole suite.

use clap::Parser;
use std::path::PathBuf;

use crate::config::PartialSettings;
use crate::models::CheckCase;

/// Smoke-test the status-check backend API
#[derive(Parser, Debug, Default)]
#[command(name = "backend-smoke")]
#[command(version)]
#[command(about = "Run the backend API smoke checks and report pass/fail")]
#[command(long_about = None)]
pub struct Args {
    /// Settings file (YAML or JSON)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Env file holding the backend URL
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Key of the backend URL inside the env file
    #[arg(long, value_name = "KEY")]
    pub url_key: Option<String>,

    /// Backend URL; skips the env file
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format (table, summary, json, json-pretty, csv)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Also write the report to this file (.csv or .json)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Run only these checks (repeatable): accessibility, root, list-status,
    /// create-status, cors, persistence
    #[arg(short, long = "check", value_name = "CHECK")]
    pub checks: Vec<String>,

    /// List available checks and exit
    #[arg(short, long)]
    pub list: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Settings layer from the flags that were given
    pub fn to_layer(&self) -> PartialSettings {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("warn".to_string())
        } else {
            None
        };

        PartialSettings {
            env_file: self.env_file.clone(),
            url_key: self.url_key.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
            format: self.format.clone(),
            cors_origin: None,
            log_level,
        }
    }

    /// Parse `--check` values; unknown names are reported together
    pub fn selected_checks(&self) -> Result<Vec<CheckCase>, Vec<String>> {
        if self.checks.is_empty() {
            return Ok(CheckCase::all());
        }

        let mut selected = Vec::new();
        let mut unknown = Vec::new();
        for name in &self.checks {
            match CheckCase::from_slug(name) {
                Some(case) => selected.push(case),
                None => unknown.push(name.clone()),
            }
        }

        if unknown.is_empty() {
            Ok(selected)
        } else {
            Err(unknown)
        }
    }
}
