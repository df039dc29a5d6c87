//! SMTP transport seam.

use crate::config::MailSettings;
use crate::error::TransportError;
use lettre::transport::smtp::client::{SmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::Message;

/// Channel security for one send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    /// Upgrade with STARTTLS when the server offers it.
    Opportunistic,
    /// Plain connection.
    Plain,
}

/// How an accepted message travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The channel was upgraded with STARTTLS.
    Encrypted,
    /// The message went over a plain channel.
    Unencrypted,
}

/// Something that can deliver a built message.
pub trait MailTransport: Send + Sync {
    /// Send one message.
    ///
    /// A failed STARTTLS negotiation is reported as [`TransportError::Tls`].
    fn send(
        &self,
        settings: &MailSettings,
        message: &Message,
        security: Security,
    ) -> Result<Delivery, TransportError>;
}

/// Blocking SMTP transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailTransport;

impl SmtpMailTransport {
    /// Create a transport.
    pub fn new() -> Self {
        Self
    }
}

fn send_failed(e: lettre::transport::smtp::Error) -> TransportError {
    TransportError::Send(e.to_string())
}

impl MailTransport for SmtpMailTransport {
    fn send(
        &self,
        settings: &MailSettings,
        message: &Message,
        security: Security,
    ) -> Result<Delivery, TransportError> {
        tracing::debug!(
            host = %settings.host,
            port = settings.port,
            security = ?security,
            "Sending summary email"
        );

        let hello = ClientId::default();
        let mut conn = SmtpConnection::connect(
            (settings.host.as_str(), settings.port),
            Some(settings.timeout),
            &hello,
            None,
            None,
        )
        .map_err(send_failed)?;

        let delivery = match security {
            Security::Opportunistic if conn.can_starttls() => {
                let upgraded = TlsParameters::new(settings.host.clone())
                    .and_then(|params| conn.starttls(&params, &hello));
                if let Err(e) = upgraded {
                    conn.abort();
                    return Err(TransportError::Tls(e.to_string()));
                }
                Delivery::Encrypted
            }
            _ => Delivery::Unencrypted,
        };

        match conn.send(message.envelope(), &message.formatted()) {
            Ok(_) => {
                conn.quit().ok();
                Ok(delivery)
            }
            Err(e) => {
                conn.abort();
                Err(send_failed(e))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake_server::{spawn, StartTls};
    use super::*;
    use crate::config::MailConfig;
    use crate::message::build_message;
    use evalreport_core::{CapturedLog, Reporter, ReporterOptions};
    use std::time::Duration;

    fn settings(port: u16) -> MailSettings {
        MailConfig::new()
            .host("127.0.0.1")
            .port(port)
            .sender("ci@example.com")
            .recipient("qa@example.com")
            .attachment_path("missing/report.html")
            .timeout(Duration::from_secs(5))
            .validate()
            .unwrap()
    }

    fn message(settings: &MailSettings) -> Message {
        let mut reporter = Reporter::new(ReporterOptions::new(), CapturedLog::new());
        reporter.record_outcome("f.py::T::m", "passed", None);
        let report = reporter.render_summary().unwrap();
        build_message(settings, &report, &CapturedLog::new()).unwrap()
    }

    #[test]
    fn test_refused_starttls_is_tls_error() {
        let (port, sessions) = spawn(StartTls::Refused, 1);
        let settings = settings(port);
        let err = SmtpMailTransport::new()
            .send(&settings, &message(&settings), Security::Opportunistic)
            .unwrap_err();

        assert!(err.is_tls(), "{err}");
        let sessions = sessions.lock();
        assert!(sessions[0].iter().any(|c| c == "STARTTLS"));
        assert!(!sessions[0].iter().any(|c| c.starts_with("MAIL FROM")));
    }

    #[test]
    fn test_broken_handshake_is_tls_error() {
        let (port, _sessions) = spawn(StartTls::BrokenHandshake, 1);
        let settings = settings(port);
        let err = SmtpMailTransport::new()
            .send(&settings, &message(&settings), Security::Opportunistic)
            .unwrap_err();

        assert!(err.is_tls(), "{err}");
    }

    #[test]
    fn test_no_starttls_offered_sends_unencrypted() {
        let (port, sessions) = spawn(StartTls::NotOffered, 1);
        let settings = settings(port);
        let delivery = SmtpMailTransport::new()
            .send(&settings, &message(&settings), Security::Opportunistic)
            .unwrap();

        assert_eq!(delivery, Delivery::Unencrypted);
        assert!(sessions.lock()[0].iter().any(|c| c.starts_with("MAIL FROM")));
    }

    #[test]
    fn test_plain_never_attempts_starttls() {
        let (port, sessions) = spawn(StartTls::Refused, 1);
        let settings = settings(port);
        let delivery = SmtpMailTransport::new()
            .send(&settings, &message(&settings), Security::Plain)
            .unwrap();

        assert_eq!(delivery, Delivery::Unencrypted);
        assert!(!sessions.lock()[0].iter().any(|c| c == "STARTTLS"));
    }

    #[test]
    fn test_connection_refused_is_send_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let settings = settings(port);
        let err = SmtpMailTransport::new()
            .send(&settings, &message(&settings), Security::Opportunistic)
            .unwrap_err();

        assert!(!err.is_tls());
    }
}
