//! Best-effort email dispatch of run summaries.

use crate::config::MailConfig;
use crate::message::build_message;
use crate::transport::{Delivery, MailTransport, Security, SmtpMailTransport};
use evalreport_core::{Dispatcher, RunLog, SummaryReport, TracingLog};

/// Where the dispatcher gets its settings.
#[derive(Debug, Clone)]
enum ConfigSource {
    /// Read the environment on every dispatch.
    Env,
    /// Use fixed settings.
    Fixed(MailConfig),
}

/// Emails a summary over SMTP.
///
/// Every failure is logged and swallowed. A failed STARTTLS negotiation is
/// retried once over a plain connection; nothing else is retried.
pub struct EmailDispatcher<T = SmtpMailTransport, L = TracingLog> {
    source: ConfigSource,
    transport: T,
    log: L,
}

impl<L: RunLog> EmailDispatcher<SmtpMailTransport, L> {
    /// Dispatcher that resolves settings from the environment at send time.
    pub fn from_env(log: L) -> Self {
        Self {
            source: ConfigSource::Env,
            transport: SmtpMailTransport::new(),
            log,
        }
    }

    /// Dispatcher with fixed settings.
    pub fn new(config: MailConfig, log: L) -> Self {
        Self {
            source: ConfigSource::Fixed(config),
            transport: SmtpMailTransport::new(),
            log,
        }
    }
}

impl<T: MailTransport, L: RunLog> EmailDispatcher<T, L> {
    /// Replace the transport.
    pub fn with_transport<U: MailTransport>(self, transport: U) -> EmailDispatcher<U, L> {
        EmailDispatcher {
            source: self.source,
            transport,
            log: self.log,
        }
    }

    fn config(&self) -> MailConfig {
        match &self.source {
            ConfigSource::Env => MailConfig::from_env(&self.log),
            ConfigSource::Fixed(config) => config.clone(),
        }
    }

    /// Send the report. Never panics, never returns an error.
    pub fn send_report(&self, report: &SummaryReport) {
        let settings = match self.config().validate() {
            Ok(settings) => settings,
            Err(e) => {
                self.log.error(&format!("Email report not sent: {}", e));
                return;
            }
        };

        for rejected in &settings.rejected {
            self.log.warn(&format!("Skipping recipient: {}", rejected));
        }

        let message = match build_message(&settings, report, &self.log) {
            Ok(message) => message,
            Err(e) => {
                self.log.error(&format!("Email report not sent: {}", e));
                return;
            }
        };

        let result = match self
            .transport
            .send(&settings, &message, Security::Opportunistic)
        {
            Ok(Delivery::Unencrypted) => {
                self.log.warn(&format!(
                    "TLS not supported by SMTP server {}:{}, report sent unencrypted",
                    settings.host, settings.port
                ));
                Ok(())
            }
            Ok(Delivery::Encrypted) => Ok(()),
            Err(e) if e.is_tls() => {
                self.log.warn(&format!(
                    "TLS not available on {}:{} ({}), sending unencrypted",
                    settings.host, settings.port, e
                ));
                self.transport
                    .send(&settings, &message, Security::Plain)
                    .map(|_| ())
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => self.log.info(&format!(
                "Email report sent to {} recipient(s)",
                settings.recipients.len()
            )),
            Err(e) => self.log.error(&format!("Failed to send email report: {}", e)),
        }
    }
}

impl<T: MailTransport, L: RunLog> Dispatcher for EmailDispatcher<T, L> {
    fn dispatch(&self, report: &SummaryReport) {
        self.send_report(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailSettings;
    use crate::error::TransportError;
    use evalreport_core::{CapturedLog, LogLevel, Reporter, ReporterOptions};
    use lettre::Message;
    use crate::transport::fake_server::{spawn, StartTls};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Replays scripted results and records every attempt.
    #[derive(Default)]
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<Delivery, TransportError>>>,
        attempts: Mutex<Vec<(Security, String)>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<Delivery, TransportError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn securities(&self) -> Vec<Security> {
            self.attempts.lock().iter().map(|(s, _)| *s).collect()
        }
    }

    impl MailTransport for &ScriptedTransport {
        fn send(
            &self,
            _settings: &MailSettings,
            message: &Message,
            security: Security,
        ) -> Result<Delivery, TransportError> {
            let raw = String::from_utf8_lossy(&message.formatted()).into_owned();
            self.attempts.lock().push((security, raw));
            self.script.lock().pop_front().unwrap_or(Ok(Delivery::Encrypted))
        }
    }

    fn config() -> MailConfig {
        MailConfig::new()
            .host("localhost")
            .port(2525)
            .sender("ci@example.com")
            .recipient("qa@example.com")
            .attachment_path("missing/report.html")
    }

    fn report() -> SummaryReport {
        let mut reporter = Reporter::new(ReporterOptions::new(), CapturedLog::new());
        reporter.record_outcome("f.py::T::m", "failed", Some("assert score > 0.7"));
        reporter.render_summary().unwrap()
    }

    #[test]
    fn test_sends_once_with_tls() {
        let transport = ScriptedTransport::new(vec![Ok(Delivery::Encrypted)]);
        let log = CapturedLog::new();
        EmailDispatcher::new(config(), log.clone())
            .with_transport(&transport)
            .dispatch(&report());

        assert_eq!(transport.securities(), vec![Security::Opportunistic]);
        assert!(log.contains(LogLevel::Info, "sent to 1 recipient"));
        let attempts = transport.attempts.lock();
        assert!(attempts[0].1.contains("Test Execution Summary - Pytest-OpenAI-Ragas"));
    }

    #[test]
    fn test_tls_failure_falls_back_to_plain() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError::Tls("no STARTTLS".into())),
            Ok(Delivery::Unencrypted),
        ]);
        let log = CapturedLog::new();
        EmailDispatcher::new(config(), log.clone())
            .with_transport(&transport)
            .dispatch(&report());

        assert_eq!(
            transport.securities(),
            vec![Security::Opportunistic, Security::Plain]
        );
        assert!(log.contains(LogLevel::Warn, "sending unencrypted"));
        assert!(log.contains(LogLevel::Info, "sent"));
    }

    #[test]
    fn test_send_failure_is_logged_not_retried() {
        let transport =
            ScriptedTransport::new(vec![Err(TransportError::Send("connection refused".into()))]);
        let log = CapturedLog::new();
        EmailDispatcher::new(config(), log.clone())
            .with_transport(&transport)
            .dispatch(&report());

        assert_eq!(transport.securities().len(), 1);
        assert!(log.contains(LogLevel::Error, "connection refused"));
    }

    #[test]
    fn test_missing_config_skips_dispatch() {
        let transport = ScriptedTransport::default();
        let log = CapturedLog::new();
        EmailDispatcher::new(MailConfig::new().host("localhost"), log.clone())
            .with_transport(&transport)
            .dispatch(&report());

        assert!(transport.securities().is_empty());
        assert!(log.contains(LogLevel::Error, "EMAIL_SENDER"));
    }

    #[test]
    fn test_rejected_recipient_warns() {
        let transport = ScriptedTransport::new(vec![Ok(Delivery::Encrypted)]);
        let log = CapturedLog::new();
        EmailDispatcher::new(config().recipient("bogus"), log.clone())
            .with_transport(&transport)
            .dispatch(&report());

        assert_eq!(transport.securities().len(), 1);
        assert!(log.contains(LogLevel::Warn, "bogus"));
    }

    #[test]
    fn test_unencrypted_delivery_warns() {
        let transport = ScriptedTransport::new(vec![Ok(Delivery::Unencrypted)]);
        let log = CapturedLog::new();
        EmailDispatcher::new(config(), log.clone())
            .with_transport(&transport)
            .dispatch(&report());

        assert_eq!(transport.securities(), vec![Security::Opportunistic]);
        assert!(log.contains(LogLevel::Warn, "TLS not supported"));
        assert!(log.contains(LogLevel::Info, "sent to 1 recipient"));
    }

    fn loopback(port: u16) -> MailConfig {
        config()
            .host("127.0.0.1")
            .port(port)
            .timeout(Duration::from_secs(5))
    }

    fn sent_mail(commands: &[String]) -> bool {
        commands.iter().any(|c| c.starts_with("MAIL FROM"))
    }

    #[test]
    fn test_smtp_refused_starttls_resends_plain() {
        let (port, sessions) = spawn(StartTls::Refused, 2);
        let log = CapturedLog::new();
        EmailDispatcher::new(loopback(port), log.clone()).dispatch(&report());

        let sessions = sessions.lock();
        assert_eq!(sessions.len(), 2);
        assert!(sessions[0].iter().any(|c| c == "STARTTLS"));
        assert!(!sent_mail(&sessions[0]));
        assert!(!sessions[1].iter().any(|c| c == "STARTTLS"));
        assert!(sent_mail(&sessions[1]));
        assert!(log.contains(LogLevel::Warn, "sending unencrypted"));
        assert!(log.contains(LogLevel::Info, "sent to 1 recipient"));
        assert!(log.at(LogLevel::Error).is_empty());
    }

    #[test]
    fn test_smtp_broken_handshake_resends_plain() {
        let (port, sessions) = spawn(StartTls::BrokenHandshake, 2);
        let log = CapturedLog::new();
        EmailDispatcher::new(loopback(port), log.clone()).dispatch(&report());

        let sessions = sessions.lock();
        assert_eq!(sessions.len(), 2);
        assert!(sent_mail(&sessions[1]));
        assert!(log.contains(LogLevel::Warn, "sending unencrypted"));
        assert!(log.contains(LogLevel::Info, "sent to 1 recipient"));
    }

    #[test]
    fn test_smtp_without_starttls_warns_and_sends() {
        let (port, sessions) = spawn(StartTls::NotOffered, 1);
        let log = CapturedLog::new();
        EmailDispatcher::new(loopback(port), log.clone()).dispatch(&report());

        assert!(sent_mail(&sessions.lock()[0]));
        assert!(log.contains(LogLevel::Warn, "TLS not supported"));
        assert!(log.contains(LogLevel::Info, "sent to 1 recipient"));
    }
}
