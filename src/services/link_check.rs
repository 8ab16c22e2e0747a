//! Best-effort link validation.
//!
//! A link must parse as an absolute URL with a host before it is probed
//! with a single GET request. Transport failures and HTTP 404 mean the
//! target is gone; any other response counts as alive. The probe checks
//! reachability, not content.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Syntactic check: an absolute URL with a host.
pub fn is_well_formed(link: &str) -> bool {
    match Url::parse(link) {
        Ok(parsed) => parsed.has_host(),
        Err(_) => false,
    }
}

/// Probes links over HTTP with a bounded timeout.
pub struct LinkChecker {
    http: Client,
}

impl LinkChecker {
    pub fn new(timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { http }
    }

    /// True when the link answers with anything but 404.
    pub async fn is_reachable(&self, link: &str) -> bool {
        match self.http.get(link).send().await {
            Ok(response) => response.status() != StatusCode::NOT_FOUND,
            Err(_) => false,
        }
    }

    /// Full validation: syntax first, then the probe.
    pub async fn validate(&self, link: &str) -> bool {
        is_well_formed(link) && self.is_reachable(link).await
    }
}
