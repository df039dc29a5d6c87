//! SMTP settings resolved from the environment.

use crate::error::{MailError, MailResult};
use evalreport_core::RunLog;
use lettre::message::Mailbox;
use std::path::PathBuf;
use std::time::Duration;

/// Default SMTP port.
pub const DEFAULT_PORT: u16 = 25;

/// Default location of the detailed report attachment.
pub const DEFAULT_ATTACHMENT_PATH: &str = "testreports/report.html";

/// Default upper bound on the SMTP conversation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Mail settings as configured. Nothing is validated until [`MailConfig::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct MailConfig {
    /// SMTP host.
    pub host: Option<String>,
    /// SMTP port.
    pub port: u16,
    /// Sender address.
    pub sender: Option<String>,
    /// Recipient addresses.
    pub recipients: Vec<String>,
    /// Detailed report to attach if present.
    pub attachment_path: PathBuf,
    /// Connection timeout.
    pub timeout: Duration,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            sender: None,
            recipients: Vec::new(),
            attachment_path: PathBuf::from(DEFAULT_ATTACHMENT_PATH),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Split a comma-separated recipient list, trimming and dropping empties.
pub fn parse_recipients(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl MailConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SMTP host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the SMTP port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the sender.
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Add a recipient.
    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipients.push(recipient.into());
        self
    }

    /// Set the attachment path.
    pub fn attachment_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment_path = path.into();
        self
    }

    /// Set the connection timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read settings from the process environment.
    ///
    /// Keys: `SMTP_HOST`, `SMTP_PORT`, `EMAIL_SENDER`, `EMAIL_RECEIVER_LIST`,
    /// `DETAILED_REPORT_PATH`, `SMTP_TIMEOUT_SECS`.
    pub fn from_env(log: &dyn RunLog) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), log)
    }

    /// Resolve settings through a key lookup. Unparsable numbers fall back to
    /// their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, log: &dyn RunLog) -> Self {
        let mut config = Self::new();
        config.host = non_empty(lookup("SMTP_HOST"));
        config.sender = non_empty(lookup("EMAIL_SENDER"));
        config.recipients = lookup("EMAIL_RECEIVER_LIST")
            .map(|list| parse_recipients(&list))
            .unwrap_or_default();

        if let Some(port) = non_empty(lookup("SMTP_PORT")) {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => log.warn(&format!(
                    "Invalid SMTP_PORT '{}', using {}",
                    port, DEFAULT_PORT
                )),
            }
        }

        if let Some(path) = non_empty(lookup("DETAILED_REPORT_PATH")) {
            config.attachment_path = PathBuf::from(path);
        }

        if let Some(secs) = non_empty(lookup("SMTP_TIMEOUT_SECS")) {
            match secs.parse() {
                Ok(secs) => config.timeout = Duration::from_secs(secs),
                Err(_) => log.warn(&format!(
                    "Invalid SMTP_TIMEOUT_SECS '{}', using {}s",
                    secs,
                    DEFAULT_TIMEOUT.as_secs()
                )),
            }
        }

        config
    }

    /// Check required settings and parse addresses.
    ///
    /// A missing host or sender, an unparsable sender, or no usable recipient
    /// is an error. Unparsable recipients are dropped and listed in
    /// [`MailSettings::rejected`].
    pub fn validate(&self) -> MailResult<MailSettings> {
        let host = self
            .host
            .clone()
            .ok_or(MailError::MissingConfig("SMTP_HOST"))?;
        let sender_raw = self
            .sender
            .as_deref()
            .ok_or(MailError::MissingConfig("EMAIL_SENDER"))?;
        if self.recipients.is_empty() {
            return Err(MailError::MissingConfig("EMAIL_RECEIVER_LIST"));
        }

        let sender: Mailbox = sender_raw
            .parse()
            .map_err(|e| MailError::invalid_address(sender_raw, e))?;

        let mut recipients = Vec::new();
        let mut rejected = Vec::new();
        for raw in &self.recipients {
            match raw.parse::<Mailbox>() {
                Ok(mailbox) => recipients.push(mailbox),
                Err(e) => rejected.push(MailError::invalid_address(raw.as_str(), e)),
            }
        }
        if recipients.is_empty() {
            return Err(MailError::MissingConfig("a valid recipient"));
        }

        Ok(MailSettings {
            host,
            port: self.port,
            sender,
            recipients,
            rejected,
            attachment_path: self.attachment_path.clone(),
            timeout: self.timeout,
        })
    }
}

/// Validated settings for one send.
#[derive(Debug)]
pub struct MailSettings {
    /// SMTP host.
    pub host: String,
    /// SMTP port.
    pub port: u16,
    /// Sender.
    pub sender: Mailbox,
    /// Parsed recipients.
    pub recipients: Vec<Mailbox>,
    /// Recipients that did not parse.
    pub rejected: Vec<MailError>,
    /// Detailed report to attach if present.
    pub attachment_path: PathBuf,
    /// Connection timeout.
    pub timeout: Duration,
}
