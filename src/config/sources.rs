use crate::core::content_store::EMBEDDED_CONTENT;
use crate::core::ContentSource;
use crate::utils::error::{ContentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// 編譯進程式的參考內容
#[derive(Debug, Clone, Default)]
pub struct EmbeddedSource;

#[async_trait]
impl ContentSource for EmbeddedSource {
    fn name(&self) -> &str {
        "embedded"
    }

    async fn fetch(&self) -> Result<String> {
        Ok(EMBEDDED_CONTENT.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    label: String,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let label = format!("file {}", path.display());
        Self { path, label }
    }
}

#[async_trait]
impl ContentSource for FileSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ContentError::unavailable(&self.label, e.to_string()))
    }
}

/// 從 HTTP 端點取得內容文件 (JSON)
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: Client,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            client: Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<String> {
        tracing::debug!("Fetching content from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ContentError::unavailable(&self.url, e.to_string()))?;

        tracing::debug!("Content response status: {}", response.status());

        if !response.status().is_success() {
            return Err(ContentError::unavailable(
                &self.url,
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| ContentError::unavailable(&self.url, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_file_source_reads_document() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{\"team\": []}").unwrap();

        let source = FileSource::new(temp_file.path());
        assert_eq!(source.fetch().await.unwrap(), "{\"team\": []}");
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let source = FileSource::new("/definitely/not/here/content.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, ContentError::ContentUnavailable { .. }));
    }
}
