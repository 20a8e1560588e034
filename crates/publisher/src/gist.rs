//! GitHub gist publisher.

use crate::certificate::render_certificate;
use crate::{Locator, PublishError, ResultPublisher};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info};

/// Default GitHub REST API root
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const CERTIFICATE_FILE: &str = "certificate.md";

#[derive(Serialize)]
struct GistFile<'a> {
    content: &'a str,
}

#[derive(Serialize)]
struct CreateGist<'a> {
    description: &'a str,
    public: bool,
    files: HashMap<&'a str, GistFile<'a>>,
}

#[derive(Deserialize)]
struct GistCreated {
    html_url: String,
}

/// Publishes certificates as gists through the GitHub REST API.
pub struct GistPublisher {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    public: bool,
}

impl GistPublisher {
    /// Create a publisher against `api_url` (e.g. "https://api.github.com")
    ///
    /// A `None` token is accepted here; publishing then fails with
    /// `PublishError::MissingCredentials` without touching the network.
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("reel-taste/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            public: false,
        })
    }

    /// Publish as a public gist instead of a secret one
    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
}

#[async_trait]
impl ResultPublisher for GistPublisher {
    fn name(&self) -> &str {
        "gist"
    }

    async fn publish(&self, username: &str, content: &str) -> Result<Locator, PublishError> {
        let token = self.token.as_deref().ok_or_else(|| {
            PublishError::MissingCredentials("no gist token configured".to_string())
        })?;

        let certificate = render_certificate(username, content);
        let body = CreateGist {
            description: "Certificate",
            public: self.public,
            files: HashMap::from([(
                CERTIFICATE_FILE,
                GistFile {
                    content: &certificate,
                },
            )]),
        };

        let url = format!("{}/gists", self.api_url);
        debug!("Creating gist at {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Gist creation rejected");
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let created: GistCreated = response
            .json()
            .await
            .map_err(|e| PublishError::InvalidResponse(e.to_string()))?;

        info!("Published certificate to {}", created.html_url);
        Ok(Locator::new(created.html_url))
    }
}
