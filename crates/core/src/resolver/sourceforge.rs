//! SourceForge mirror redirect resolution.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;

use super::{HostResolver, ResolveError};

const SOURCEFORGE_PREFIX: &str = "http://downloads.sourceforge.net/";

/// Resolves SourceForge download URLs by following the mirror redirects.
pub struct SourceforgeResolver {
    client: Client,
    prefix: String,
}

impl SourceforgeResolver {
    pub fn new(client: Client) -> Self {
        Self::with_prefix(client, SOURCEFORGE_PREFIX)
    }

    /// Match URLs under a different prefix (used against local fixtures).
    pub fn with_prefix(client: Client, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl HostResolver for SourceforgeResolver {
    fn name(&self) -> &str {
        "sourceforge"
    }

    fn matches(&self, url: &str) -> bool {
        url.starts_with(&self.prefix)
    }

    async fn resolve_once(&self, url: &str) -> Result<String, ResolveError> {
        // The body is never read; only the effective URL matters.
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, "")
            .send()
            .await?;
        Ok(response.url().to_string())
    }
}
