//! Asset resolution: template PNGs, student photos, school logos.
//!
//! Templates come from a fixed local directory and are a hard precondition;
//! photos and logos may live anywhere (path, URL or data URI) and their
//! failures are the caller's to degrade on.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{template_filename, Orientation, Side};
use crate::util;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("template not found: {0}")]
    TemplateNotFound(PathBuf),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("http {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },
    #[error("http: {0}")]
    Http(String),
    #[error("invalid data uri")]
    DataUri,
}

#[derive(Clone)]
pub struct AssetLoader {
    http: reqwest::Client,
    template_dir: PathBuf,
}

impl AssetLoader {
    pub fn new(http: reqwest::Client, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            http,
            template_dir: template_dir.into(),
        }
    }

    pub fn template_path(&self, orientation: Orientation, side: Side) -> PathBuf {
        self.template_dir.join(template_filename(orientation, side))
    }

    /// Read the blank template for a variant. A missing file is the one
    /// fatal error in the whole pipeline.
    pub fn load_template(&self, orientation: Orientation, side: Side) -> Result<Vec<u8>, AssetError> {
        let path = self.template_path(orientation, side);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::TemplateNotFound(path))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a photo/logo reference into raw bytes.
    pub async fn fetch(&self, reference: &str) -> Result<Vec<u8>, AssetError> {
        let reference = reference.trim();
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return self.fetch_url(reference).await;
        }
        if reference.starts_with("data:") {
            return util::b64_decode(reference).ok_or(AssetError::DataUri);
        }
        Ok(std::fs::read(Path::new(reference))?)
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AssetError::Http(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(AssetError::HttpStatus {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AssetError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
