//! # evalreport-mail
//!
//! Emails evalreport summaries over SMTP.
//!
//! Settings come from the environment (`SMTP_HOST`, `SMTP_PORT`,
//! `EMAIL_SENDER`, `EMAIL_RECEIVER_LIST`, `DETAILED_REPORT_PATH`,
//! `SMTP_TIMEOUT_SECS`) or from an explicit [`MailConfig`]. Sending is a
//! single best-effort attempt: problems are logged, never raised.
//!
//! ```ignore
//! use evalreport_core::{Dispatcher, TracingLog};
//! use evalreport_mail::EmailDispatcher;
//!
//! let dispatcher = EmailDispatcher::from_env(TracingLog::new("email-reporter"));
//! dispatcher.dispatch(&report);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod transport;

pub use config::{parse_recipients, MailConfig, MailSettings};
pub use dispatcher::EmailDispatcher;
pub use error::{MailError, MailResult, TransportError};
pub use message::build_message;
pub use transport::{Delivery, MailTransport, Security, SmtpMailTransport};
