use std::time::Duration;

use fogowatch_model::Snapshot;

use crate::ingest::snapshot_from_payload;

pub const DEFAULT_FEED_URL: &str = "https://api-dev.fogos.pt/new/fires";

const USER_AGENT: &str = concat!("fogowatch/", env!("CARGO_PKG_VERSION"));

/// Error type for feed operations.
#[derive(Debug)]
pub enum FeedError {
    /// Network/transport error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error or missing envelope pieces
    Parse(String),
    /// Feed answered but reported `success: false`
    Unsuccessful,
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Network(msg) => write!(f, "network error: {msg}"),
            FeedError::Http(code, msg) => write!(f, "HTTP {code}: {msg}"),
            FeedError::Parse(msg) => write!(f, "parse error: {msg}"),
            FeedError::Unsuccessful => write!(f, "feed reported success=false"),
        }
    }
}

impl std::error::Error for FeedError {}

/// Fire-feed client (blocking, no Tokio runtime required).
#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::blocking::Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            url: url.into(),
        }
    }

    /// GET the live feed and project it into a canonical snapshot.
    pub fn fetch(&self) -> Result<Snapshot, FeedError> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .map_err(|e| FeedError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(FeedError::Http(status.as_u16(), excerpt(&body)));
        }

        let payload: serde_json::Value =
            resp.json().map_err(|e| FeedError::Parse(e.to_string()))?;
        snapshot_from_payload(&payload)
    }
}

/// First line of an error body, truncated — enough for a log line.
fn excerpt(body: &str) -> String {
    let line = body.lines().next().unwrap_or("");
    line.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn fetch_parses_success_payload() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/new/fires");
            then.status(200).json_body(serde_json::json!({
                "success": true,
                "data": [
                    {
                        "id": "123",
                        "date": "12-08-2026",
                        "hour": "14:05",
                        "status": "Em Curso",
                        "location": "Óbidos",
                        "man": 12,
                        "terrain": 4,
                        "meios_aquaticos": 0,
                        "lat": 39.3604,
                        "lng": -9.1580,
                        "natureza": "Mato"
                    }
                ]
            }));
        });

        let client = FeedClient::new(server.url("/new/fires"));
        let snapshot = client.fetch().unwrap();
        assert_eq!(snapshot.len(), 1);

        let record = &snapshot.records()[0];
        assert_eq!(record.id, 123);
        assert_eq!(record.text("datetime"), Some("2026-08-12 14:05"));
        assert_eq!(record.text("location"), Some("Óbidos"));
        assert_eq!(record.get("man").and_then(|v| v.as_int()), Some(12));
        assert_eq!(record.float("lat"), Some(39.3604));
    }

    #[test]
    fn unsuccessful_flag_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/new/fires");
            then.status(200)
                .json_body(serde_json::json!({ "success": false, "data": [] }));
        });

        let client = FeedClient::new(server.url("/new/fires"));
        assert!(matches!(client.fetch(), Err(FeedError::Unsuccessful)));
    }

    #[test]
    fn http_error_carries_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/new/fires");
            then.status(500).body("upstream exploded");
        });

        let client = FeedClient::new(server.url("/new/fires"));
        match client.fetch() {
            Err(FeedError::Http(500, msg)) => assert_eq!(msg, "upstream exploded"),
            other => panic!("expected Http(500), got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/new/fires");
            then.status(200).body("not json at all");
        });

        let client = FeedClient::new(server.url("/new/fires"));
        assert!(matches!(client.fetch(), Err(FeedError::Parse(_))));
    }

    #[test]
    fn network_error_when_nothing_listens() {
        let client = FeedClient::new("http://127.0.0.1:1/new/fires");
        assert!(matches!(client.fetch(), Err(FeedError::Network(_))));
    }
}
