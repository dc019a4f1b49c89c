//! backend-smoke - smoke tests for the status-check backend API
//!
//! Resolves the backend URL from the frontend's env file, runs six checks
//! against it one after another and exits 0 only when all of them pass.
//!
//! ## Checks
//!
//! 1. Server Accessibility (`GET <base>`, 200 or 404)
//! 2. Root Endpoint (`GET /api/`)
//! 3. GET Status Endpoint (`GET /api/status`)
//! 4. POST Status Endpoint (`POST /api/status`)
//! 5. CORS Configuration (preflight `OPTIONS /api/`)
//! 6. Database Persistence (create, then find it in the listing)
//!
//! ## Usage
//!
//! ```bash
//! # Run every check against REACT_APP_BACKEND_URL from /app/frontend/.env
//! backend-smoke
//!
//! # Point at another env file, or skip it entirely
//! backend-smoke --env-file ./frontend/.env
//! backend-smoke --base-url http://localhost:8001
//!
//! # Run a subset and keep a machine-readable report
//! backend-smoke --check root --check persistence --output report.json
//!
//! # List available checks
//! backend-smoke --list
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

mod checks;
mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod utils;

use checks::CheckOptions;
use cli::Args;
use config::{EnvConfig, Settings};
use executor::SuiteRunner;
use output::{OutputFormat, ResultFormatter};
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.list {
        print!("{}", output::format_check_list());
        return ExitCode::SUCCESS;
    }

    let env = EnvConfig::load();
    let resolved = resolve_settings(&args, &env);

    let level = resolved
        .as_ref()
        .ok()
        .and_then(|(settings, _)| LogLevel::from_str(&settings.log_level))
        .unwrap_or(LogLevel::Info);
    init_logger(level);

    let outcome = match resolved {
        Ok((settings, settings_file)) => {
            if let Some(path) = &settings_file {
                debug!("Loaded settings from {}", path.display());
            }
            if env.has_any() {
                debug!("Applied BACKEND_SMOKE_* environment overrides");
            }
            run_suite(&args, settings).await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Layer defaults, settings file, environment and flags
fn resolve_settings(args: &Args, env: &EnvConfig) -> Result<(Settings, Option<PathBuf>)> {
    let settings_file = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(PathBuf::from))
        .or_else(config::find_settings_file);

    let mut settings = Settings::default();
    if let Some(path) = &settings_file {
        settings = settings.apply(config::load_settings_file(path)?);
    }

    let settings = settings.apply(env.to_layer()?).apply(args.to_layer());
    settings.validate()?;

    Ok((settings, settings_file))
}

async fn run_suite(args: &Args, settings: Settings) -> Result<bool> {
    let selected = args.selected_checks().map_err(|unknown| {
        anyhow::anyhow!(
            "Unknown check(s): {} (see --list)",
            unknown.join(", ")
        )
    })?;

    let base_url = settings
        .base_url()
        .context("Could not get backend URL")?;

    info!("Starting backend API smoke checks");
    info!("Backend URL: {}", base_url);

    let format = OutputFormat::from_str(&settings.format).unwrap_or(OutputFormat::Table);
    let mut formatter = ResultFormatter::new(format);
    if args.no_color || !std::io::stdout().is_terminal() {
        formatter = formatter.no_color();
    }

    let runner = SuiteRunner::new(base_url, settings.timeout_secs)?
        .with_options(CheckOptions {
            cors_origin: settings.cors_origin.clone(),
        })
        .with_checks(&selected);

    let summary = runner.run_all().await;
    println!("{}", formatter.format_summary(&summary)?);

    // A failed export is reported but does not change the verdict
    if let Some(path) = &args.output {
        if let Err(e) = output::export_summary(&summary, path) {
            error!("{e:#}");
        }
    }

    Ok(summary.is_all_passed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use wiremock::MockServer;

    fn no_env() -> EnvConfig {
        EnvConfig::from_lookup(|_| None)
    }

    #[test]
    fn test_settings_precedence() {
        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("backend-smoke.yaml");
        fs::write(&settings_path, "timeout_secs: 30\nformat: csv\nurl_key: API_URL\n").unwrap();

        let env = EnvConfig::from_lookup(|name| {
            (name == "BACKEND_SMOKE_TIMEOUT").then(|| "20".to_string())
        });
        let args = Args::parse_from([
            "backend-smoke",
            "--config",
            settings_path.to_str().unwrap(),
            "--format",
            "json",
        ]);

        let (settings, file) = resolve_settings(&args, &env).unwrap();
        assert_eq!(file, Some(settings_path));
        assert_eq!(settings.timeout_secs, 20);
        assert_eq!(settings.format, "json");
        assert_eq!(settings.url_key, "API_URL");
    }

    #[test]
    fn test_explicit_settings_file_must_exist() {
        let args = Args::parse_from(["backend-smoke", "--config", "/no/such/backend-smoke.yaml"]);
        assert!(resolve_settings(&args, &no_env()).is_err());
    }

    #[tokio::test]
    async fn test_missing_env_file_is_fatal() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            env_file: dir.path().join(".env"),
            ..Default::default()
        };

        let err = run_suite(&Args::default(), settings).await.unwrap_err();

        assert!(format!("{err:#}").starts_with("Could not get backend URL: Could not read env file"));
    }

    #[tokio::test]
    async fn test_unknown_check_is_fatal() {
        let args = Args::parse_from(["backend-smoke", "--check", "mongodb"]);
        let settings = Settings {
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        };
        let err = run_suite(&args, settings).await.unwrap_err();
        assert!(err.to_string().contains("mongodb"));
    }

    #[tokio::test]
    async fn test_env_file_to_passing_suite() {
        let server = MockServer::start().await;
        checks::test_support::mount_conformant_api(&server).await;

        let dir = tempdir().unwrap();
        let env_path = dir.path().join(".env");
        fs::write(
            &env_path,
            format!("WDS_SOCKET_PORT=443\nREACT_APP_BACKEND_URL={}\n", server.uri()),
        )
        .unwrap();
        let report = dir.path().join("report.json");

        let args = Args::parse_from([
            "backend-smoke",
            "--output",
            report.to_str().unwrap(),
        ]);
        let settings = Settings {
            env_file: env_path,
            ..Default::default()
        };

        assert!(run_suite(&args, settings).await.unwrap());

        let exported: models::SuiteSummary =
            serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(exported.passed, 6);
    }
}
