//! Output delivery
//!
//! Annotated documents are written into the output directory under a fresh,
//! collision-free name and addressed through the public `/outputs` URL.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::config::OutputConfig;

const OUTPUT_PREFIX: &str = "highlighted_";
const FALLBACK_NAME: &str = "document.pdf";

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A document persisted to the output directory
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub path: PathBuf,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Delivery {
    config: OutputConfig,
}

impl Delivery {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Create the output directory if it does not exist yet
    pub async fn ensure_dir(&self) -> Result<(), DeliveryError> {
        tokio::fs::create_dir_all(&self.config.dir)
            .await
            .map_err(|source| DeliveryError::CreateDir {
                path: self.config.dir.clone(),
                source,
            })
    }

    /// Write `bytes` under a new name derived from `original` and return its URL
    ///
    /// The file is written to a hidden temporary name first and renamed into
    /// place, so a partially written document is never served.
    pub async fn persist(&self, original: &str, bytes: &[u8]) -> Result<StoredFile, DeliveryError> {
        self.ensure_dir().await?;

        let name = output_name(original);
        let path = self.config.dir.join(&name);
        let staging = self.config.dir.join(format!(".{}.part", name));

        let write_err = |source| DeliveryError::Write {
            path: path.clone(),
            source,
        };

        tokio::fs::write(&staging, bytes).await.map_err(write_err)?;
        if let Err(source) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(write_err(source));
        }

        tracing::info!(file = %name, bytes = bytes.len(), "Stored annotated document");

        Ok(StoredFile {
            url: self.config.file_url(&name),
            name,
            path,
        })
    }
}

/// `highlighted_<uuid>_<sanitized original name>`
pub fn output_name(original: &str) -> String {
    format!(
        "{}{}_{}",
        OUTPUT_PREFIX,
        Uuid::new_v4().simple(),
        sanitize_filename(original)
    )
}

/// Reduce a client-supplied filename to a safe single path component
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
