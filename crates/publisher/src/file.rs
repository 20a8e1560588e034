//! Local certificate files, for runs without a gist token.

use crate::certificate::render_certificate;
use crate::{Locator, PublishError, ResultPublisher};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Writes `certificate-<username>.txt` into a directory
pub struct FilePublisher {
    dir: PathBuf,
}

impl FilePublisher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, username: &str) -> PathBuf {
        self.dir
            .join(format!("certificate-{}.txt", sanitize_username(username)))
    }
}

/// Keep usernames safe to use as a file name component
fn sanitize_username(username: &str) -> String {
    let cleaned: String = username
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "anonymous".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl ResultPublisher for FilePublisher {
    fn name(&self) -> &str {
        "file"
    }

    async fn publish(&self, username: &str, content: &str) -> Result<Locator, PublishError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(username);
        tokio::fs::write(&path, render_certificate(username, content)).await?;

        info!("Wrote certificate to {}", path.display());
        Ok(Locator::new(path.display().to_string()))
    }
}
