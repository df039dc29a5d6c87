//! MIME message assembly.

use crate::config::MailSettings;
use crate::error::{MailError, MailResult};
use evalreport_core::{RunLog, SummaryReport};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::Message;
use std::path::Path;

/// Subject line for a summary.
pub fn subject(report: &SummaryReport) -> String {
    format!("Test Execution Summary - {}", report.project_name)
}

/// Read the attachment. Missing or unreadable files are skipped with a warning.
fn read_attachment(path: &Path, log: &dyn RunLog) -> Option<SinglePart> {
    if !path.exists() {
        log.warn(&format!(
            "Detailed report {} not found, sending summary without attachment",
            path.display()
        ));
        return None;
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report.html".to_string());

    match std::fs::read(path) {
        Ok(bytes) => {
            let content_type = ContentType::parse("application/octet-stream").ok()?;
            Some(Attachment::new(name).body(bytes, content_type))
        }
        Err(e) => {
            log.warn(&format!(
                "Could not attach detailed report {}: {}",
                path.display(),
                e
            ));
            None
        }
    }
}

/// Build the summary email: HTML body plus the optional detailed report.
pub fn build_message(
    settings: &MailSettings,
    report: &SummaryReport,
    log: &dyn RunLog,
) -> MailResult<Message> {
    let mut builder = Message::builder()
        .from(settings.sender.clone())
        .subject(subject(report));
    for recipient in &settings.recipients {
        builder = builder.to(recipient.clone());
    }

    let mut body = MultiPart::mixed().singlepart(SinglePart::html(report.to_html()));
    if let Some(attachment) = read_attachment(&settings.attachment_path, log) {
        body = body.singlepart(attachment);
    }

    builder
        .multipart(body)
        .map_err(|e| MailError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailConfig;
    use evalreport_core::{CapturedLog, LogLevel, Reporter, ReporterOptions};

    fn report() -> SummaryReport {
        let mut reporter = Reporter::new(
            ReporterOptions::new().project_name("Loyalty"),
            CapturedLog::new(),
        );
        reporter.record_outcome("f.py::T::m", "passed", None);
        reporter.render_summary().unwrap()
    }

    fn settings(attachment: &Path) -> MailSettings {
        MailConfig::new()
            .host("localhost")
            .sender("ci@example.com")
            .recipient("qa@example.com")
            .recipient("dev@example.com")
            .attachment_path(attachment)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_message_without_attachment() {
        let log = CapturedLog::new();
        let settings = settings(Path::new("does/not/exist.html"));
        let message = build_message(&settings, &report(), &log).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();

        assert!(raw.contains("Test Execution Summary - Loyalty"));
        assert!(raw.contains("qa@example.com"));
        assert!(raw.contains("dev@example.com"));
        assert!(raw.contains("text/html"));
        assert!(!raw.contains("attachment"));
        assert!(log.contains(LogLevel::Warn, "does/not/exist.html"));
        assert!(log.contains(LogLevel::Warn, "without attachment"));
    }

    #[test]
    fn test_message_with_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        std::fs::write(&path, b"<html>details</html>").unwrap();

        let log = CapturedLog::new();
        let message = build_message(&settings(&path), &report(), &log).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();

        assert!(raw.contains("attachment"));
        assert!(raw.contains("report.html"));
        assert!(raw.contains("application/octet-stream"));
    }

    #[test]
    fn test_unreadable_attachment_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        // A directory exists but cannot be read as a file.
        let log = CapturedLog::new();
        let message = build_message(&settings(dir.path()), &report(), &log).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();

        assert!(!raw.contains("application/octet-stream"));
        assert!(log.contains(LogLevel::Warn, "Could not attach"));
    }
}
