//! Form/template asset loading.
//!
//! The engine only needs `fetch_bytes`; where the bytes live (a local static
//! directory, an object store behind HTTP) is the host's choice, injected as
//! an [`AssetLoader`] implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {path}")]
    NotFound { path: String },
    #[error("failed to read asset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch asset {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("asset fetch for {url} returned status {status}")]
    Status { url: String, status: u16 },
}

#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, AssetError>;
}

/// Serves assets from a local directory, e.g. the bundled official form
/// PDFs under `./static`.
pub struct StaticDirAssetLoader {
    root: PathBuf,
}

impl StaticDirAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory from `FORM_ASSETS_DIR`, defaulting to `./static`.
    pub fn from_env() -> Self {
        let root = std::env::var("FORM_ASSETS_DIR").unwrap_or_else(|_| "./static".to_string());
        Self::new(root)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        // Asset paths are rooted in strategy data ("/forms/..."); strip the
        // leading slash so they join under the configured root.
        let relative = Path::new(path.trim_start_matches('/'));
        self.root.join(relative)
    }
}

#[async_trait]
impl AssetLoader for StaticDirAssetLoader {
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full = self.resolve(path);
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound {
                    path: path.to_string(),
                })
            }
            Err(source) => Err(AssetError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }
}

/// Fetches assets from an HTTP base URL (CDN or object storage front).
pub struct HttpAssetLoader {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAssetLoader {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl AssetLoader for HttpAssetLoader {
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let url = self.url_for(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| AssetError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AssetError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(AssetError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| AssetError::Network {
                url: url.clone(),
                source,
            })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_loader_strips_leading_slash() {
        let loader = StaticDirAssetLoader::new("/srv/forms");
        let resolved = loader.resolve("/forms/fl/HSMV-82050.pdf");
        assert_eq!(
            resolved,
            PathBuf::from("/srv/forms/forms/fl/HSMV-82050.pdf")
        );
    }

    #[test]
    fn test_http_loader_joins_urls() {
        let loader = HttpAssetLoader::new("https://cdn.example.com/", reqwest::Client::new());
        assert_eq!(
            loader.url_for("/forms/fl/HSMV-82050.pdf"),
            "https://cdn.example.com/forms/fl/HSMV-82050.pdf"
        );
    }

    #[tokio::test]
    async fn test_static_loader_missing_file_is_not_found() {
        let loader = StaticDirAssetLoader::new("./does-not-exist");
        let err = loader.fetch_bytes("/nope.pdf").await.unwrap_err();
        assert!(matches!(err, AssetError::NotFound { .. }));
    }
}
