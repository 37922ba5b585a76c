//! Image downloader
//!
//! This module handles the per-task download loop:
//! - Building the shared HTTP client
//! - Streaming each link's body to `{keyword}/{source}_{index:04}.{ext}`
//! - Isolating failures so one bad link never aborts the task

mod extension;

pub use extension::{extension_from_link, DEFAULT_EXTENSION};

use crate::config::HttpConfig;
use crate::planner::DownloadTask;
use reqwest::{Client, Response};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Errors for a single link; never propagated past the download loop
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Body stream failed: {0}")]
    Body(reqwest::Error),

    #[error("Write to {path} failed: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DownloadError {
    fn from_request(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

/// Outcome of running one task's link list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Number of files written
    pub saved: usize,

    /// Link indices that failed to fetch or write
    pub failed: Vec<usize>,
}

impl DownloadReport {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// Builds the HTTP client shared by all download workers
///
/// # Arguments
///
/// * `config` - HTTP settings (user agent and timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Path of the file saved for link `index` of a task
pub fn output_path(dir: &Path, source_name: &str, index: usize, ext: &str) -> PathBuf {
    dir.join(format!("{}_{:04}.{}", source_name, index, ext))
}

/// Fetches a task's links and writes them under the download root
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    download_root: PathBuf,
}

impl Downloader {
    pub fn new(client: Client, download_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            download_root: download_root.into(),
        }
    }

    pub fn download_root(&self) -> &Path {
        &self.download_root
    }

    /// Downloads every link of a task in order
    ///
    /// The output directory is created first, even for an empty link list, so
    /// a keyword that was attempted is recognized by later skip-existing runs
    /// (concurrent creation by the other source of the same keyword is fine).
    /// Each link gets the file
    /// index equal to its position in `links`; a failed link leaves a gap.
    ///
    /// # Returns
    ///
    /// * `Ok(DownloadReport)` - Loop finished, possibly with failed links
    /// * `Err(DownloadError)` - The output directory could not be created
    pub async fn run(
        &self,
        task: &DownloadTask,
        links: &[String],
    ) -> Result<DownloadReport, DownloadError> {
        let mut report = DownloadReport::default();

        let dir = task.output_dir(&self.download_root);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| DownloadError::Write {
                path: dir.clone(),
                source,
            })?;

        let total = links.len();
        let source_name = task.source.name();

        for (index, link) in links.iter().enumerate() {
            tracing::info!(
                "Downloading {} from {}: {} / {}",
                task.keyword,
                source_name,
                index + 1,
                total
            );

            let path = output_path(&dir, source_name, index, extension_from_link(link));
            match self.download_link(link, &path).await {
                Ok(bytes) => {
                    tracing::debug!("Saved {} ({} bytes)", path.display(), bytes);
                    report.saved += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        "Download failed - {} from {} #{:04} ({}): {}",
                        task.keyword,
                        source_name,
                        index,
                        link,
                        e
                    );
                    report.failed.push(index);
                }
            }
        }

        Ok(report)
    }

    async fn download_link(&self, link: &str, path: &Path) -> Result<u64, DownloadError> {
        let response = self
            .client
            .get(link)
            .send()
            .await
            .map_err(DownloadError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status.as_u16()));
        }

        match write_body(response, path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                // Nothing half-written survives a failed link
                if let Err(remove_err) = tokio::fs::remove_file(path).await {
                    tracing::debug!("Could not remove {}: {}", path.display(), remove_err);
                }
                Err(e)
            }
        }
    }
}

async fn write_body(mut response: Response, path: &Path) -> Result<u64, DownloadError> {
    let write_err = |source: std::io::Error| DownloadError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(path).await.map_err(write_err)?;
    let mut written: u64 = 0;

    while let Some(chunk) = response.chunk().await.map_err(DownloadError::Body)? {
        file.write_all(&chunk).await.map_err(write_err)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(write_err)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::Keyword;
    use crate::source::SourceVariant;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_downloader(root: &Path) -> Downloader {
        let client = build_http_client(&HttpConfig::default()).unwrap();
        Downloader::new(client, root)
    }

    fn task(keyword: &str, source: SourceVariant) -> DownloadTask {
        DownloadTask::new(Keyword::parse(keyword).unwrap(), source)
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn test_output_path_padding() {
        let path = output_path(Path::new("download/cat"), "naver", 7, "png");
        assert_eq!(path, PathBuf::from("download/cat/naver_0007.png"));

        let path = output_path(Path::new("download/cat"), "google", 12345, "jpg");
        assert_eq!(path, PathBuf::from("download/cat/google_12345.jpg"));
    }

    #[tokio::test]
    async fn test_failed_link_leaves_gap() {
        let server = MockServer::start().await;
        for (name, status) in [
            ("/0.jpg", 200),
            ("/1.png", 200),
            ("/2.jpg", 404),
            ("/3.gif", 200),
            ("/4", 200),
        ] {
            Mock::given(method("GET"))
                .and(path(name))
                .respond_with(ResponseTemplate::new(status).set_body_bytes(name.as_bytes()))
                .mount(&server)
                .await;
        }

        let links: Vec<String> = ["/0.jpg", "/1.png", "/2.jpg", "/3.gif", "/4"]
            .iter()
            .map(|p| format!("{}{}", server.uri(), p))
            .collect();

        let root = TempDir::new().unwrap();
        let downloader = test_downloader(root.path());
        let report = downloader
            .run(&task("cat", SourceVariant::Google), &links)
            .await
            .unwrap();

        assert_eq!(report.saved, 4);
        assert_eq!(report.failed, vec![2]);

        let dir = root.path().join("cat");
        assert!(dir.join("google_0000.jpg").is_file());
        assert!(dir.join("google_0001.png").is_file());
        assert!(!dir.join("google_0002.jpg").exists());
        assert!(dir.join("google_0003.gif").is_file());
        assert!(dir.join("google_0004.jpg").is_file());
        assert_eq!(std::fs::read(dir.join("google_0003.gif")).unwrap(), b"/3.gif");
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 4);
    }

    /// Shared in-memory sink for formatted log lines
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn test_each_failed_link_logged_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let links: Vec<String> = ["/ok.jpg", "/gone.jpg", "/ok.jpg", "/gone.jpg"]
            .iter()
            .map(|p| format!("{}{}", server.uri(), p))
            .collect();

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        // Current-thread test runtime: every log of the run lands on this thread
        let _guard = tracing::subscriber::set_default(subscriber);

        let root = TempDir::new().unwrap();
        let report = test_downloader(root.path())
            .run(&task("cat", SourceVariant::Naver), &links)
            .await
            .unwrap();

        assert_eq!(report.failed, vec![1, 3]);
        let output = logs.contents();
        let failures: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("Download failed"))
            .collect();
        assert_eq!(failures.len(), report.failed_count());
        assert!(failures[0].contains("#0001"));
        assert!(failures[1].contains("#0003"));
        assert!(failures.iter().all(|line| line.contains("WARN")));
    }

    #[tokio::test]
    async fn test_unreachable_link_is_isolated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;

        // Port 9 on localhost is not expected to accept connections
        let links = vec![
            "http://127.0.0.1:9/missing.jpg".to_string(),
            format!("{}/ok.png", server.uri()),
        ];

        let root = TempDir::new().unwrap();
        let report = test_downloader(root.path())
            .run(&task("dog", SourceVariant::NaverFull), &links)
            .await
            .unwrap();

        assert_eq!(report.saved, 1);
        assert_eq!(report.failed, vec![0]);
        assert!(root.path().join("dog/naver_0001.png").is_file());
    }

    #[tokio::test]
    async fn test_overwrites_existing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .mount(&server)
            .await;

        let root = TempDir::new().unwrap();
        let dir = root.path().join("cat");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("google_0000.jpg"), b"old contents").unwrap();

        let links = vec![format!("{}/a.jpg", server.uri())];
        test_downloader(root.path())
            .run(&task("cat", SourceVariant::Google), &links)
            .await
            .unwrap();

        assert_eq!(std::fs::read(dir.join("google_0000.jpg")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_empty_links_creates_directory_only() {
        let root = TempDir::new().unwrap();
        let report = test_downloader(root.path())
            .run(&task("cat", SourceVariant::Google), &[])
            .await
            .unwrap();

        assert_eq!(report, DownloadReport::default());
        let dir = root.path().join("cat");
        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }
}
