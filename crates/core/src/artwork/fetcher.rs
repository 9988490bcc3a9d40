use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ArtworkConfig;
use crate::metrics;

/// Downloads a remote image to a local file.
#[async_trait]
pub trait ArtworkFetcher: Send + Sync {
    /// Writes the image at `url` to `destination`. Returns whether it worked.
    async fn fetch(&self, url: &str, destination: &Path) -> bool;
}

/// [`ArtworkFetcher`] over HTTP with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpArtworkFetcher {
    client: Client,
}

impl HttpArtworkFetcher {
    /// Create a fetcher from config.
    pub fn new(config: &ArtworkConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    async fn try_fetch(&self, url: &str, destination: &Path) -> Result<usize, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        tokio::fs::write(destination, &bytes)
            .await
            .map_err(|e| e.to_string())?;
        Ok(bytes.len())
    }
}

#[async_trait]
impl ArtworkFetcher for HttpArtworkFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> bool {
        match self.try_fetch(url, destination).await {
            Ok(size) => {
                debug!("Fetched artwork {} ({} bytes)", url, size);
                metrics::ARTWORK_FETCHES.with_label_values(&["ok"]).inc();
                true
            }
            Err(e) => {
                warn!("Artwork fetch failed for {}: {}", url, e);
                metrics::ARTWORK_FETCHES.with_label_values(&["failed"]).inc();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response on a local port.
    async fn serve_once(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}/cover.jpg", addr)
    }

    fn fetcher(timeout_secs: u64) -> HttpArtworkFetcher {
        HttpArtworkFetcher::new(&ArtworkConfig {
            timeout_secs,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_writes_body() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: 4\r\nConnection: close\r\n\r\nJPEG",
        )
        .await;
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("cover.jpg");

        assert!(fetcher(5).fetch(&url, &dest).await);
        assert_eq!(std::fs::read(&dest).unwrap(), b"JPEG");
    }

    #[tokio::test]
    async fn test_non_success_status_returns_false() {
        let url = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("cover.jpg");

        assert!(!fetcher(5).fetch(&url, &dest).await);
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_unreachable_host_returns_false() {
        // Bind then drop to get a port nothing listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("cover.jpg");

        assert!(
            !fetcher(2)
                .fetch(&format!("http://{}/x.jpg", addr), &dest)
                .await
        );
    }

    #[tokio::test]
    async fn test_invalid_url_returns_false() {
        let dir = TempDir::new().unwrap();
        assert!(!fetcher(1).fetch("not a url", &dir.path().join("x.jpg")).await);
    }
}
