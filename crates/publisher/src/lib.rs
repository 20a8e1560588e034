//! Result publishing for finished quizzes.
//!
//! This crate turns a suggestion list into a shareable certificate and
//! hands it to an external service. It provides:
//! - Rendering of the suggestion message and the certificate text
//! - The `ResultPublisher` trait
//! - `GistPublisher`, which posts the certificate as a GitHub gist
//! - `FilePublisher`, which writes it to a local directory
//!
//! Publishing is always optional: a missing token or a failed request is
//! reported as a `PublishError` and never invalidates the suggestions.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub mod certificate;
pub mod file;
pub mod gist;

pub use certificate::{render_certificate, render_suggestion_message};
pub use file::FilePublisher;
pub use gist::GistPublisher;

/// Errors that can occur when publishing a certificate
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Publishing service rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid response from publishing service: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a published certificate can be found (URL or file path)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locator(String);

impl Locator {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Destination for a rendered certificate
#[async_trait]
pub trait ResultPublisher: Send + Sync {
    /// Short name for logs ("gist", "file")
    fn name(&self) -> &str;

    /// Publish `content` addressed to `username` and return where it went
    async fn publish(&self, username: &str, content: &str) -> Result<Locator, PublishError>;
}
