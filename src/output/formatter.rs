//! Output formatters for check results
//!
//! Provides table, summary, JSON and CSV output formats.

use anyhow::{Context, Result};

use crate::models::{CheckCase, CheckResult, CheckStatus, SuiteSummary};

const RULE: &str = "══════════════════════════════════════════════════════════════";

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn status_label(&self, status: CheckStatus) -> &'static str {
        if self.colorize {
            match status {
                CheckStatus::Pass => "\x1b[32m✓ PASS\x1b[0m",
                CheckStatus::Fail => "\x1b[31m✗ FAIL\x1b[0m",
                CheckStatus::Error => "\x1b[31m! ERROR\x1b[0m",
            }
        } else {
            match status {
                CheckStatus::Pass => "✓ PASS",
                CheckStatus::Fail => "✗ FAIL",
                CheckStatus::Error => "! ERROR",
            }
        }
    }

    fn format_result_table(&self, result: &CheckResult) -> String {
        let mut line = format!(
            "{:2}. {:22} {} [{:>6}ms]",
            result.case.number(),
            result.case.name(),
            self.status_label(result.status),
            result.duration_ms
        );
        if !result.passed() {
            if let Some(message) = &result.message {
                line.push_str(&format!("\n      └─ {message}"));
            }
        }
        line
    }

    fn format_result_summary(&self, result: &CheckResult) -> String {
        format!("{}: {}", result.case.name(), self.status_label(result.status))
    }

    /// Format a suite summary
    pub fn format_summary(&self, summary: &SuiteSummary) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_summary_table(summary)),
            OutputFormat::Summary => Ok(self.format_summary_brief(summary)),
            OutputFormat::Json => {
                serde_json::to_string(summary).context("Failed to serialize summary")
            }
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(summary).context("Failed to serialize summary")
            }
            OutputFormat::Csv => {
                let bytes = summary_csv(summary)?;
                String::from_utf8(bytes).context("CSV output is not UTF-8")
            }
        }
    }

    fn format_summary_table(&self, summary: &SuiteSummary) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{RULE}\n"));
        output.push_str(&format!("  Backend checks - {}\n", summary.target));
        output.push_str(&format!("{RULE}\n"));

        for result in &summary.results {
            output.push_str(&format!("  {}\n", self.format_result_table(result)));
        }

        output.push_str(&format!("{RULE}\n"));
        output.push_str(&format!(
            "  Pass: {} | Fail: {} | Error: {} | Duration: {}ms\n",
            summary.passed, summary.failed, summary.errors, summary.total_duration_ms
        ));
        output.push_str(&format!("{}\n", self.overall_line(summary)));

        output
    }

    fn format_summary_brief(&self, summary: &SuiteSummary) -> String {
        let mut output = String::new();
        for result in &summary.results {
            output.push_str(&self.format_result_summary(result));
            output.push('\n');
        }
        output.push_str(&self.overall_line(summary));
        output
    }

    fn overall_line(&self, summary: &SuiteSummary) -> String {
        let verdict = if summary.is_all_passed() {
            "All backend checks passed"
        } else {
            "Some backend checks failed"
        };
        format!(
            "Overall: {}/{} checks passed - {}",
            summary.passed, summary.total, verdict
        )
    }
}

/// Render the per-check rows as CSV
pub fn summary_csv(summary: &SuiteSummary) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_csv_rows(&mut writer, summary)?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {e}"))
}

pub(crate) fn write_csv_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    summary: &SuiteSummary,
) -> Result<()> {
    writer.write_record(["number", "name", "status", "duration_ms", "message"])?;
    for result in &summary.results {
        writer.write_record([
            result.case.number().to_string(),
            result.case.name().to_string(),
            result.status.to_string(),
            result.duration_ms.to_string(),
            result.message.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Listing printed by `--list`
pub fn format_check_list() -> String {
    let mut output = String::from("\nBackend checks (run in this order)\n\n");
    for case in CheckCase::all() {
        output.push_str(&format!(
            "  {}. {:22} {:15} {}\n",
            case.number(),
            case.name(),
            case.slug(),
            case.request()
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> SuiteSummary {
        SuiteSummary::new(
            "https://backend.test",
            Utc::now(),
            vec![
                CheckResult::pass(CheckCase::ServerAccessibility, 12),
                CheckResult::fail(CheckCase::RootEndpoint, 8, "unexpected status 502 (expected 200)"),
            ],
        )
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("json-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::from_str("xml"), None);
    }

    #[test]
    fn test_table_lists_every_check_and_overall() {
        let out = ResultFormatter::new(OutputFormat::Table)
            .no_color()
            .format_summary(&sample())
            .unwrap();

        assert!(out.contains(" 1. Server Accessibility"));
        assert!(out.contains("✓ PASS"));
        assert!(out.contains("✗ FAIL"));
        assert!(out.contains("└─ unexpected status 502 (expected 200)"));
        assert!(out.contains("Overall: 1/2 checks passed - Some backend checks failed"));
    }

    #[test]
    fn test_summary_lines() {
        let out = ResultFormatter::new(OutputFormat::Summary)
            .no_color()
            .format_summary(&sample())
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Server Accessibility: ✓ PASS");
        assert_eq!(lines[1], "Root Endpoint: ✗ FAIL");
        assert_eq!(lines[2], "Overall: 1/2 checks passed - Some backend checks failed");
    }

    #[test]
    fn test_json_round_trips_summary() {
        let out = ResultFormatter::new(OutputFormat::Json)
            .format_summary(&sample())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["passed"], 1);
        assert_eq!(value["results"][1]["case"], "root_endpoint");
        assert_eq!(value["results"][1]["status"], "fail");
    }

    #[test]
    fn test_csv_rows() {
        let out = ResultFormatter::new(OutputFormat::Csv)
            .format_summary(&sample())
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "number,name,status,duration_ms,message");
        assert_eq!(lines[1], "1,Server Accessibility,PASS,12,");
        assert_eq!(
            lines[2],
            "2,Root Endpoint,FAIL,8,unexpected status 502 (expected 200)"
        );
    }

    #[test]
    fn test_check_list_mentions_slugs() {
        let out = format_check_list();
        assert!(out.contains("persistence"));
        assert!(out.contains("OPTIONS /api/"));
    }
}
