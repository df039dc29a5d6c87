//! Rendered run summaries.

use crate::classify::FailureCategory;
use crate::error::ReportResult;
use crate::summary::StatusCounts;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;
use uuid::Uuid;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const PASS_COLOR: &str = "#2e7d32";
const FAIL_COLOR: &str = "#c62828";
const SKIP_COLOR: &str = "#ef6c00";
const OTHER_COLOR: &str = "#9e9e9e";

/// Counts for one feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Feature key.
    pub feature: String,
    /// Counts and pass rate.
    #[serde(flatten)]
    pub counts: StatusCounts,
}

/// Count for one failure category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRow {
    /// Category.
    pub category: FailureCategory,
    /// Occurrences in the run.
    pub count: usize,
}

/// Snapshot of a run, ready to render.
///
/// Features are sorted by name, failures by count descending then label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Run id.
    pub run_id: Uuid,
    /// Project display name.
    pub project_name: String,
    /// Run-wide counts.
    pub totals: StatusCounts,
    /// Unrecognized status labels and their counts.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other_statuses: BTreeMap<String, usize>,
    /// One row per feature.
    pub features: Vec<FeatureRow>,
    /// Failure breakdown.
    pub failures: Vec<FailureRow>,
    /// Session start.
    pub start_time: Option<DateTime<Local>>,
    /// Session end.
    pub end_time: Option<DateTime<Local>>,
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn format_time(time: Option<&DateTime<Local>>) -> String {
    time.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "not recorded".to_string())
}

impl SummaryReport {
    /// Failure counts keyed by category.
    pub fn failure_counts(&self) -> BTreeMap<FailureCategory, usize> {
        self.failures.iter().map(|r| (r.category, r.count)).collect()
    }

    /// Look up one feature row.
    pub fn feature(&self, name: &str) -> Option<&StatusCounts> {
        self.features
            .iter()
            .find(|r| r.feature == name)
            .map(|r| &r.counts)
    }

    /// CSS background for the proportion chart.
    fn chart_background(&self) -> String {
        if self.totals.total == 0 {
            return format!("background: {};", OTHER_COLOR);
        }
        let (pass, fail, skip) = self.totals.proportions();
        let fail_end = pass + fail;
        let skip_end = fail_end + skip;
        format!(
            "background: conic-gradient({PASS_COLOR} 0% {pass:.2}%, \
             {FAIL_COLOR} {pass:.2}% {fail_end:.2}%, \
             {SKIP_COLOR} {fail_end:.2}% {skip_end:.2}%, \
             {OTHER_COLOR} {skip_end:.2}% 100%);"
        )
    }

    /// Render the HTML email body.
    pub fn to_html(&self) -> String {
        let totals = &self.totals;
        let (pass_pct, fail_pct, skip_pct) = totals.proportions();

        let mut feature_rows = String::new();
        for row in &self.features {
            let c = &row.counts;
            let _ = write!(
                feature_rows,
                "<tr><td class=\"left-col\">{}</td><td>{}</td><td>{}</td><td>{}</td>\
                 <td>{}</td><td>{:.2}%</td></tr>\n",
                escape_html(&row.feature),
                c.passed,
                c.failed,
                c.skipped,
                c.total,
                c.pass_rate
            );
        }
        if feature_rows.is_empty() {
            feature_rows.push_str("<tr><td colspan=\"6\">No tests executed</td></tr>\n");
        }

        let mut failure_rows = String::new();
        for row in &self.failures {
            let _ = write!(
                failure_rows,
                "<tr><td>{}</td><td><b>{}</b></td></tr>\n",
                row.category, row.count
            );
        }
        if failure_rows.is_empty() {
            failure_rows.push_str("<tr><td colspan=\"2\">No failures</td></tr>\n");
        }

        let mut other_rows = String::new();
        if !self.other_statuses.is_empty() {
            other_rows.push_str(
                "<h3>Other Statuses</h3>\n<table class=\"small-table\">\n\
                 <tr><th>Status</th><th>Count</th></tr>\n",
            );
            for (label, count) in &self.other_statuses {
                let _ = write!(
                    other_rows,
                    "<tr><td>{}</td><td>{}</td></tr>\n",
                    escape_html(label),
                    count
                );
            }
            other_rows.push_str("</table>\n");
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>{project} - Test Execution Summary</title>
<style>
    body {{ font-family: Arial, Helvetica, sans-serif; padding: 18px; }}
    h2, h3 {{ text-align: center; }}
    .pie {{ width: 120px; height: 120px; border-radius: 50%; margin: 10px auto 6px; {chart} }}
    .legend {{ text-align: center; font-size: 12px; margin-bottom: 16px; }}
    table {{ width: 95%; margin: 10px auto; border-collapse: collapse; font-size: 13px; }}
    th, td {{ border: 1px solid #ddd; padding: 8px; text-align: center; }}
    th {{ background-color: #222; color: #fff; font-weight: 600; }}
    tr:nth-child(even) {{ background: #fafafa; }}
    .small-table {{ width: 50%; }}
    .left-col {{ text-align: left; padding-left: 12px; }}
</style>
</head>
<body>
<h2>Test Execution Summary</h2>
<div class="pie"></div>
<div class="legend">Passed {pass_pct:.2}% &middot; Failed {fail_pct:.2}% &middot; Skipped {skip_pct:.2}%</div>

<table>
<tr><th>Project Name</th><th>Total Tests</th><th>Passed</th><th>Failed</th><th>Skipped</th><th>Pass Rate (%)</th></tr>
<tr><td>{project}</td><td>{total}</td><td>{passed}</td><td>{failed}</td><td>{skipped}</td><td>{pass_rate:.2}%</td></tr>
</table>
{other_rows}
<h3>Feature Summary (Class :: Test Method)</h3>
<table>
<tr><th class="left-col">Feature</th><th>Pass</th><th>Fail</th><th>Skip</th><th>Total</th><th>Pass Rate</th></tr>
{feature_rows}</table>

<h3>Failure Breakdown</h3>
<table class="small-table">
<tr><th>Failure Type</th><th>Count</th></tr>
{failure_rows}</table>

<h3>Execution Time</h3>
<table class="small-table">
<tr><td>Start Time</td><td>{start}</td></tr>
<tr><td>End Time</td><td>{end}</td></tr>
<tr><td>Run Id</td><td>{run_id}</td></tr>
</table>
</body>
</html>
"#,
            project = escape_html(&self.project_name),
            chart = self.chart_background(),
            total = totals.total,
            passed = totals.passed,
            failed = totals.failed,
            skipped = totals.skipped,
            pass_rate = totals.pass_rate,
            start = format_time(self.start_time.as_ref()),
            end = format_time(self.end_time.as_ref()),
            run_id = self.run_id,
        )
    }

    /// Render as plain text.
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        let totals = &self.totals;

        output.push_str("\n\u{1F4CA} Test Execution Summary\n");
        output.push_str("════════════════════════\n\n");
        let _ = writeln!(output, "Project: {}", self.project_name);
        let _ = writeln!(output, "Run: {}", self.run_id);
        let _ = writeln!(output, "Start: {}", format_time(self.start_time.as_ref()));
        let _ = writeln!(output, "End: {}\n", format_time(self.end_time.as_ref()));

        let _ = writeln!(output, "Total Tests: {}", totals.total);
        let _ = writeln!(
            output,
            "✅ Passed: {} ({:.2}%)",
            totals.passed, totals.pass_rate
        );
        let _ = writeln!(output, "❌ Failed: {}", totals.failed);
        let _ = writeln!(output, "⏭️ Skipped: {}", totals.skipped);
        for (label, count) in &self.other_statuses {
            let _ = writeln!(output, "❔ {}: {}", label, count);
        }

        if !self.features.is_empty() {
            output.push_str("\nFeatures:\n");
            for row in &self.features {
                let c = &row.counts;
                let _ = writeln!(
                    output,
                    "  {}: {}/{} ({:.2}%), {} failed, {} skipped",
                    row.feature, c.passed, c.total, c.pass_rate, c.failed, c.skipped
                );
            }
        }

        if !self.failures.is_empty() {
            output.push_str("\nFailure Breakdown:\n");
            for row in &self.failures {
                let _ = writeln!(output, "  {}: {}", row.category, row.count);
            }
        }

        output
    }

    /// Render as JSON.
    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use pretty_assertions::assert_eq;

    fn report(statuses: &[Status], failures: Vec<FailureRow>) -> SummaryReport {
        SummaryReport {
            run_id: Uuid::nil(),
            project_name: "Demo <Project>".to_string(),
            totals: StatusCounts::from_statuses(statuses),
            other_statuses: BTreeMap::new(),
            features: vec![FeatureRow {
                feature: "TestA::test_b".to_string(),
                counts: StatusCounts::from_statuses(statuses),
            }],
            failures,
            start_time: None,
            end_time: None,
        }
    }

    #[test]
    fn test_html_contains_sections() {
        let report = report(
            &[Status::Passed, Status::Failed],
            vec![FailureRow {
                category: FailureCategory::TimeoutError,
                count: 1,
            }],
        );
        let html = report.to_html();

        assert!(html.contains("Demo &lt;Project&gt;"));
        assert!(html.contains("TestA::test_b"));
        assert!(html.contains("TimeoutError"));
        assert!(html.contains("50.00%"));
        assert!(html.contains("conic-gradient"));
        assert!(html.contains("not recorded"));
        assert!(!html.contains("No failures"));
    }

    #[test]
    fn test_html_empty_run() {
        let mut report = report(&[], Vec::new());
        report.features.clear();
        let html = report.to_html();

        assert!(html.contains("No tests executed"));
        assert!(html.contains("No failures"));
        assert!(html.contains("0.00%"));
        assert!(!html.contains("conic-gradient"));
    }

    #[test]
    fn test_chart_matches_totals() {
        let report = report(
            &[Status::Passed, Status::Passed, Status::Failed, Status::Skipped],
            Vec::new(),
        );
        assert_eq!(
            report.chart_background(),
            "background: conic-gradient(#2e7d32 0% 50.00%, #c62828 50.00% 75.00%, \
             #ef6c00 75.00% 100.00%, #9e9e9e 100.00% 100%);"
        );
    }

    #[test]
    fn test_json_preserves_fields() {
        let report = report(
            &[Status::Failed],
            vec![FailureRow {
                category: FailureCategory::AssertionError,
                count: 1,
            }],
        );
        let json = report.to_json().unwrap();

        assert!(json.contains("\"pass_rate\""));
        assert!(json.contains("\"AssertionError\""));
        let back: SummaryReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.failure_counts()[&FailureCategory::AssertionError], 1);
    }

    #[test]
    fn test_text_render() {
        let report = report(&[Status::Passed], Vec::new());
        let text = report.to_string();
        assert!(text.contains("Total Tests: 1"));
        assert!(text.contains("TestA::test_b: 1/1 (100.00%)"));
    }
}
