//! Static file serving module
//!
//! Serves the documentation tree verbatim. Containment is checked here even
//! though the router already normalized the path.

use super::HttpResponse;
use crate::http::{self, mime};
use crate::logger;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Reasons an asset cannot be served
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("path escapes documentation root: {0}")]
    OutsideRoot(String),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Read-only documentation store rooted at a directory
#[derive(Debug, Clone)]
pub struct StaticAssets {
    root: PathBuf,
}

impl StaticAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `sub_path` below the root and return the canonical file path
    async fn resolve(&self, sub_path: &str) -> Result<PathBuf, AssetError> {
        let relative = Path::new(sub_path);
        if sub_path.is_empty() {
            return Err(AssetError::NotFound(sub_path.to_string()));
        }
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(AssetError::OutsideRoot(sub_path.to_string()));
        }

        let root = fs::canonicalize(&self.root)
            .await
            .map_err(|source| io_error(&self.root, source))?;

        let file = match fs::canonicalize(root.join(relative)).await {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AssetError::NotFound(sub_path.to_string()));
            }
            Err(e) => return Err(io_error(&root.join(relative), e)),
        };

        // Symlinks may still point elsewhere
        if !file.starts_with(&root) {
            return Err(AssetError::OutsideRoot(sub_path.to_string()));
        }

        let metadata = fs::metadata(&file)
            .await
            .map_err(|source| io_error(&file, source))?;
        if !metadata.is_file() {
            return Err(AssetError::NotFound(sub_path.to_string()));
        }

        Ok(file)
    }

    /// Read the full contents of an asset
    pub async fn read(&self, sub_path: &str) -> Result<Vec<u8>, AssetError> {
        let file = self.resolve(sub_path).await?;
        fs::read(&file).await.map_err(|source| io_error(&file, source))
    }
}

fn io_error(path: &Path, source: io::Error) -> AssetError {
    AssetError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Serve a documentation asset, `404` when it cannot be read
pub async fn serve(assets: &StaticAssets, sub_path: &str) -> HttpResponse {
    match assets.read(sub_path).await {
        Ok(content) => {
            let extension = Path::new(sub_path).extension().and_then(|e| e.to_str());
            http::build_file_response(content, mime::get_content_type(extension))
        }
        // File not found is common (404), no need to log
        Err(AssetError::NotFound(_)) => http::build_404_response(),
        Err(e @ AssetError::OutsideRoot(_)) => {
            logger::log_warning(&format!("Path traversal attempt blocked: {e}"));
            http::build_404_response()
        }
        Err(e @ AssetError::Io { .. }) => {
            logger::log_error(&e.to_string());
            http::build_404_response()
        }
    }
}
