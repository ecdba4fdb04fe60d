//! `fogowatch-notify` — the notification transport boundary.
//!
//! The pipeline only produces (recipients, subject, message) triples and
//! hands them here. Delivery is best-effort; exactly-once is explicitly
//! not guaranteed.

use std::time::Duration;

const USER_AGENT: &str = concat!("fogowatch/", env!("CARGO_PKG_VERSION"));

/// One outbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: Vec<String>,
    pub subject: String,
    pub message: String,
}

/// Error type for notification sends.
#[derive(Debug)]
pub enum NotifyError {
    /// Network/transport error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::Network(msg) => write!(f, "network error: {msg}"),
            NotifyError::Http(code, msg) => write!(f, "HTTP {code}: {msg}"),
        }
    }
}

impl std::error::Error for NotifyError {}

/// Transport seam. The pipeline depends on this, not on a concrete relay.
pub trait Notifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// POSTs each notification to an HTTP relay endpoint as
/// `{"to": [...], "subject": ..., "message": ..., "attachments": []}`.
pub struct HttpNotifier {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpNotifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

impl Notifier for HttpNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let body = serde_json::json!({
            "to": notification.to,
            "subject": notification.subject,
            "message": notification.message,
            "attachments": [],
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(NotifyError::Http(status.as_u16(), body));
        }
        Ok(())
    }
}

/// Prints notifications instead of delivering them. Used when no relay
/// endpoint is configured.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        println!("--- {} ---", notification.subject);
        println!("{}", notification.message);
        Ok(())
    }
}
