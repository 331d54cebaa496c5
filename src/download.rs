use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use chrono::Local;
use reqwest::Client;

use crate::{
    error::{Result, SeedreamError},
    log_done,
    models::{DownloadFailure, DownloadedFile, ImageEntry},
};

pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
pub const FILE_PREFIX: &str = "seedream";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Generation timestamp shared by every file of one run.
pub fn capture_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// `index` is 1-based. Single-image runs get no index suffix.
pub fn image_file_name(timestamp: &str, index: usize, max_images: u8) -> String {
    if max_images > 1 {
        format!("{}_{}_{}.png", FILE_PREFIX, timestamp, index)
    } else {
        format!("{}_{}.png", FILE_PREFIX, timestamp)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    pub files: Vec<DownloadedFile>,
    pub failures: Vec<DownloadFailure>,
}

impl DownloadReport {
    pub fn attempted(&self) -> usize {
        self.files.len() + self.failures.len()
    }
}

#[derive(Clone)]
pub struct Downloader {
    client: Client,
    timeout: Duration,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: DOWNLOAD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Body of `url`, exactly as served.
    pub async fn fetch(&self, url: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SeedreamError::DownloadError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SeedreamError::DownloadError(format!(
                "server returned {}",
                status
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| SeedreamError::DownloadError(e.to_string()))
    }

    async fn save_entry(
        &self,
        entry: &ImageEntry,
        index: usize,
        output_dir: &Path,
        timestamp: &str,
        max_images: u8,
    ) -> Result<DownloadedFile> {
        let url = match entry.download_url() {
            Some(url) => url,
            None => {
                let reason = match &entry.error {
                    Some(detail) => detail.to_string(),
                    None => "entry has no url".to_string(),
                };
                return Err(SeedreamError::DownloadError(reason));
            }
        };

        let data = self.fetch(url).await?;

        let path: PathBuf = output_dir.join(image_file_name(timestamp, index, max_images));
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &data).await?;

        Ok(DownloadedFile {
            path,
            source_url: url.to_string(),
            index,
        })
    }

    /// Saves every entry in response order. A failed entry is logged and
    /// recorded; it never stops the remaining ones.
    pub async fn save_all(
        &self,
        entries: &[ImageEntry],
        output_dir: &Path,
        timestamp: &str,
        max_images: u8,
        requested_size: &str,
    ) -> DownloadReport {
        let mut report = DownloadReport::default();

        for (i, entry) in entries.iter().enumerate() {
            let index = i + 1;
            match self
                .save_entry(entry, index, output_dir, timestamp, max_images)
                .await
            {
                Ok(file) => {
                    log_done!(
                        "Image {} saved ({}): {}",
                        index,
                        entry.size_or(requested_size),
                        file.path.display()
                    );
                    report.files.push(file);
                }
                Err(e) => {
                    log::error!("Image {} failed: {}", index, e);
                    report.failures.push(DownloadFailure {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, MockServer};

    #[test]
    fn test_file_names() {
        assert_eq!(
            image_file_name("20250908_141500", 1, 1),
            "seedream_20250908_141500.png"
        );
        assert_eq!(
            image_file_name("20250908_141500", 3, 4),
            "seedream_20250908_141500_3.png"
        );
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = capture_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_save_all_isolates_failures() {
        let server = MockServer::start_async().await;
        let ok = server
            .mock_async(|when, then| {
                when.method(GET).path("/ok.png");
                then.status(200).body(b"\x89PNG-bytes".as_slice());
            })
            .await;
        let missing = server
            .mock_async(|when, then| {
                when.method(GET).path("/gone.png");
                then.status(404);
            })
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("nested").join("pic");
        let entries = vec![
            ImageEntry::from_url(server.url("/ok.png")),
            ImageEntry::from_url(server.url("/gone.png")),
            ImageEntry::default(),
        ];

        let report = Downloader::new(Client::new())
            .save_all(&entries, &out, "20250101_000000", 3, "2K")
            .await;

        ok.assert_calls_async(1).await;
        missing.assert_calls_async(1).await;
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.files.len(), 1);
        assert_eq!(
            report.files[0].path,
            out.join("seedream_20250101_000000_1.png")
        );
        assert_eq!(
            std::fs::read(&report.files[0].path).unwrap(),
            b"\x89PNG-bytes"
        );
        let failed: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, vec![2, 3]);
        assert!(report.failures[0].reason.contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_returns_body_verbatim() {
        let server = MockServer::start_async().await;
        let body: &[u8] = b"\x89PNG\r\n\x1a\n\x00\xffraw";
        server
            .mock_async(|when, then| {
                when.method(GET).path("/raw.png");
                then.status(200).body(body);
            })
            .await;

        let data = Downloader::new(Client::new())
            .fetch(&server.url("/raw.png"))
            .await
            .unwrap();
        assert_eq!(&data[..], body);
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow.png");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .body("late");
            })
            .await;

        let err = Downloader::new(Client::new())
            .with_timeout(Duration::from_millis(50))
            .fetch(&server.url("/slow.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedreamError::DownloadError(_)));
    }
}
