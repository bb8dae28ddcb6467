//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use triage_agent::{EvaluationReport, ExecutionResponse, TriageOutcome};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a triage run.
    pub fn format_execution(&self, response: &ExecutionResponse, show_steps: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
            OutputFormat::Text => Ok(self.format_execution_text(response, show_steps)),
        }
    }

    fn format_execution_text(&self, response: &ExecutionResponse, show_steps: bool) -> String {
        let mut output = String::new();

        match (&response.response, &response.error) {
            (Some(text), _) => output.push_str(text),
            (None, Some(error)) => {
                output.push_str(&self.error(error));
                output.push('\n');
            }
            (None, None) => {}
        }

        if let Some(outcome) = &response.outcome {
            output.push_str(&self.format_outcome(outcome));
        }

        if show_steps {
            output.push_str(&format!(
                "\nSteps: {}\n",
                response.step_modules().join(" -> ")
            ));
        }

        output
    }

    fn format_outcome(&self, outcome: &TriageOutcome) -> String {
        let mut lines = Vec::new();

        if !outcome.evidence.evidence_summary.is_empty() {
            lines.push(format!("Evidence: {}", outcome.evidence.evidence_summary));
        }
        lines.push(format!("Source: {}", outcome.source.as_str()));

        let verdict = &outcome.verdict;
        if verdict.needs_review {
            let mut detail = format!(
                "Needs human review (confidence {} vs threshold {}",
                verdict.confidence, verdict.threshold
            );
            if !verdict.critical_missing.is_empty() {
                let missing: Vec<&str> = verdict.critical_missing.iter().map(|f| f.as_str()).collect();
                detail.push_str(&format!("; missing: {}", missing.join(", ")));
            }
            detail.push(')');
            lines.push(self.warning(&detail));
        } else {
            lines.push(self.success("Ready to dispatch"));
        }

        let mut output = lines.join("\n");
        output.push('\n');
        output
    }

    /// Format a routing evaluation report.
    pub fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Text => Ok(self.format_report_text(report)),
        }
    }

    fn format_report_text(&self, report: &EvaluationReport) -> String {
        if report.evaluated == 0 {
            return self.colorize("No samples evaluated.", "yellow");
        }

        let mut output = format!(
            "Evaluated: {}\nMatched: {}\nSkipped: {}\nFailed: {}\n",
            report.evaluated, report.matched, report.skipped, report.failed
        );
        let rate = format!("Match rate: {:.1}%", report.match_rate * 100.0);
        let color = if report.match_rate >= 0.8 { "green" } else { "yellow" };
        output.push_str(&self.colorize(&rate, color));
        output.push('\n');

        if !report.mismatches.is_empty() {
            output.push_str(&format!("\nMismatches ({}):\n", report.mismatches.len()));
            for mismatch in &report.mismatches {
                let actual = mismatch.actual.as_deref().unwrap_or("<failed>");
                output.push_str(&format!(
                    "  {} expected {}, got {}\n",
                    self.colorize("-", "red"),
                    mismatch.expected,
                    actual
                ));
                output.push_str(&format!("    {}\n", truncate(&mismatch.complaint_text, 80)));
            }
        }

        output
    }

    /// Format success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if colors are enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Shorten text to `max` characters, marking the cut with "...".
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_agent::{RoutingMismatch, Step};
    use serde_json::json;

    fn plain(format: OutputFormat) -> Formatter {
        Formatter::new(format, false)
    }

    fn failed_run() -> ExecutionResponse {
        ExecutionResponse::error(
            "RAG retrieval failed: connection refused",
            vec![Step {
                module: "preprocessing".to_string(),
                prompt: json!({}),
                response: json!({}),
            }],
        )
    }

    #[test]
    fn test_error_envelope_text() {
        let output = plain(OutputFormat::Text).format_execution(&failed_run(), true).unwrap();
        assert!(output.contains("✗ RAG retrieval failed: connection refused"));
        assert!(output.contains("Steps: preprocessing"));
    }

    #[test]
    fn test_error_envelope_json() {
        let output = plain(OutputFormat::Json).format_execution(&failed_run(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["response"], serde_json::Value::Null);
        assert_eq!(value["steps"][0]["module"], "preprocessing");
    }

    #[test]
    fn test_report_text() {
        let report = EvaluationReport {
            evaluated: 4,
            matched: 3,
            skipped: 1,
            failed: 0,
            match_rate: 0.75,
            mismatches: vec![RoutingMismatch {
                complaint_text: "rats in the basement".to_string(),
                expected: "DOHMH".to_string(),
                actual: Some("DSNY".to_string()),
            }],
        };
        let output = plain(OutputFormat::Text).format_report(&report).unwrap();
        assert!(output.contains("Evaluated: 4"));
        assert!(output.contains("Match rate: 75.0%"));
        assert!(output.contains("expected DOHMH, got DSNY"));
        assert!(output.contains("rats in the basement"));
    }

    #[test]
    fn test_empty_report_text() {
        let output = plain(OutputFormat::Text)
            .format_report(&EvaluationReport::default())
            .unwrap();
        assert_eq!(output, "No samples evaluated.");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = plain(OutputFormat::Text);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
