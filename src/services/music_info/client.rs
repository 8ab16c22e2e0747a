//! Music Info API Client
//!
//! HTTP client for the external enrichment service. Only one request shape
//! exists: GET /info with the group and song as query parameters.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error};

use super::types::SongDetails;

/// Music info client
pub struct MusicInfoClient {
    http: Client,
    base_url: String,
}

impl MusicInfoClient {
    /// Create a client for the provider at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch release date, lyrics and link for a song.
    pub async fn get_song_info(
        &self,
        group: &str,
        song: &str,
    ) -> Result<SongDetails, MusicInfoError> {
        let url = format!("{}/info", self.base_url);

        debug!("music info request for '{}' by '{}'", song, group);

        let response = self
            .http
            .get(&url)
            .query(&[("group", group), ("song", song)])
            .send()
            .await
            .map_err(MusicInfoError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::BAD_REQUEST {
                return Err(MusicInfoError::BadRequest);
            }
            return Err(MusicInfoError::Http(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(MusicInfoError::from_transport)?;

        serde_json::from_str(&text).map_err(|e| {
            error!("failed to parse music info response: {}", e);
            debug!(
                "response text: {}",
                text.chars().take(500).collect::<String>()
            );
            MusicInfoError::Parse(e.to_string())
        })
    }
}

/// Music info API error types
#[derive(Debug, thiserror::Error)]
pub enum MusicInfoError {
    /// The provider rejected the request (HTTP 400)
    #[error("bad request")]
    BadRequest,
    /// The provider did not answer within the timeout
    #[error("request timed out")]
    Timeout,
    /// Unexpected HTTP status from the provider
    #[error("unexpected status: {0}")]
    Http(u16),
    /// Network/connection error
    #[error("network error: {0}")]
    Network(String),
    /// Response body did not decode
    #[error("parse error: {0}")]
    Parse(String),
}

impl MusicInfoError {
    /// Classify a reqwest transport error. The deadline can fire while the
    /// response body is still streaming, not only before the headers
    /// arrive; both surface as `Timeout`.
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MusicInfoError::Timeout
        } else {
            MusicInfoError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = MusicInfoClient::new("http://localhost:8081/", Duration::from_secs(5));
        assert_eq!(client.base_url, "http://localhost:8081");
    }

    #[test]
    fn test_client_keeps_base_url() {
        let client = MusicInfoClient::new("http://info.example.com", Duration::from_secs(5));
        assert_eq!(client.base_url, "http://info.example.com");
    }

    /// One-shot listener on a random port answering a single request with
    /// a canned HTTP response.
    async fn serve_once(response: String) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_get_song_info_decodes_success_body() {
        let body =
            r#"{"releaseDate":"16.07.2006","text":"Ooh baby","link":"https://example.com/watch"}"#;
        let base = serve_once(format!(
            "HTTP/1.1 200 OK\r\ncontent-length: {}\r\n\r\n{}",
            body.len(),
            body
        ))
        .await;

        let client = MusicInfoClient::new(&base, Duration::from_secs(2));
        let details = client
            .get_song_info("Muse", "Supermassive Black Hole")
            .await
            .unwrap();

        assert_eq!(details.release_date, "16.07.2006");
        assert_eq!(details.link, "https://example.com/watch");
    }

    #[tokio::test]
    async fn test_get_song_info_maps_status_400_to_bad_request() {
        let base =
            serve_once("HTTP/1.1 400 Bad Request\r\ncontent-length: 0\r\n\r\n".to_string()).await;

        let client = MusicInfoClient::new(&base, Duration::from_secs(2));
        let err = client.get_song_info("Muse", "Hysteria").await.unwrap_err();

        assert!(matches!(err, MusicInfoError::BadRequest));
    }

    #[tokio::test]
    async fn test_get_song_info_maps_other_error_statuses() {
        let base =
            serve_once("HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\n\r\n".to_string())
                .await;

        let client = MusicInfoClient::new(&base, Duration::from_secs(2));
        let err = client.get_song_info("Muse", "Hysteria").await.unwrap_err();

        assert!(matches!(err, MusicInfoError::Http(503)));
    }

    #[tokio::test]
    async fn test_get_song_info_timeout_during_body_read() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Answer with the headers, then stall with most of the promised
        // body missing.
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 64\r\n\r\n{\"releaseDate\"")
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
        });

        let client =
            MusicInfoClient::new(&format!("http://{}", addr), Duration::from_millis(250));
        let err = client.get_song_info("Muse", "Hysteria").await.unwrap_err();

        assert!(matches!(err, MusicInfoError::Timeout));
    }
}
