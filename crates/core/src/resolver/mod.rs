//! URL indirection resolution.
//!
//! Most catalog URLs are fetched as-is. A few file hosts hide the real
//! download behind a redirect chain or a landing page; a [`HostResolver`]
//! knows how to turn such a URL into a direct one. Resolution is best effort:
//! transport failures are logged and reported as "unresolved" (an empty
//! string) instead of being propagated.

mod mediafire;
mod sourceforge;

pub use mediafire::MediafireResolver;
pub use sourceforge::SourceforgeResolver;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ResolverConfig;

/// Errors from a single resolution attempt. Never leaves this module.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Resolver for one hosting pattern.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Host name for logging.
    fn name(&self) -> &str;

    /// Whether this resolver handles the URL.
    fn matches(&self, url: &str) -> bool;

    /// One resolution attempt. An empty string means unresolved.
    async fn resolve_once(&self, url: &str) -> Result<String, ResolveError>;
}

/// Resolves indirect URLs with a bounded number of attempts.
pub struct UrlResolver {
    hosts: Vec<Box<dyn HostResolver>>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl UrlResolver {
    /// Create a resolver for the known hosts.
    pub fn new(client: Client, config: &ResolverConfig) -> Self {
        Self::with_hosts(
            vec![
                Box::new(SourceforgeResolver::new(client.clone())),
                Box::new(MediafireResolver::new(client)),
            ],
            config.max_attempts,
            Duration::from_secs(config.retry_delay_secs),
        )
    }

    /// Create a resolver with an explicit host list.
    pub fn with_hosts(
        hosts: Vec<Box<dyn HostResolver>>,
        max_attempts: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            hosts,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    /// Resolve `url` to a directly fetchable URL.
    ///
    /// Returns the input unchanged when no host resolver matches, and an empty
    /// string when a matching resolver never produced a result.
    pub async fn resolve(&self, url: &str) -> String {
        let Some(host) = self.hosts.iter().find(|h| h.matches(url)) else {
            return url.to_string();
        };

        for attempt in 1..=self.max_attempts {
            match host.resolve_once(url).await {
                Ok(resolved) if !resolved.is_empty() => {
                    debug!(host = host.name(), url = %url, resolved = %resolved, "URL resolved");
                    return resolved;
                }
                Ok(_) => {
                    debug!(host = host.name(), url = %url, attempt, "URL not resolved yet");
                }
                Err(e) => {
                    debug!(host = host.name(), url = %url, attempt, error = %e, "Resolution attempt failed");
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        warn!(
            host = host.name(),
            url = %url,
            attempts = self.max_attempts,
            "Giving up resolving URL"
        );
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Fails until `succeed_on` attempts have been made.
    struct FlakyHost {
        calls: Arc<AtomicU32>,
        succeed_on: u32,
    }

    #[async_trait]
    impl HostResolver for FlakyHost {
        fn name(&self) -> &str {
            "flaky"
        }

        fn matches(&self, url: &str) -> bool {
            url.starts_with("http://flaky/")
        }

        async fn resolve_once(&self, url: &str) -> Result<String, ResolveError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.succeed_on {
                Ok(url.replace("http://flaky/", "http://direct/"))
            } else {
                Ok(String::new())
            }
        }
    }

    fn flaky(succeed_on: u32, max_attempts: u32) -> (UrlResolver, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let resolver = UrlResolver::with_hosts(
            vec![Box::new(FlakyHost {
                calls: Arc::clone(&calls),
                succeed_on,
            })],
            max_attempts,
            Duration::ZERO,
        );
        (resolver, calls)
    }

    #[tokio::test]
    async fn test_unmatched_url_is_identity() {
        let (resolver, calls) = flaky(1, 10);
        assert_eq!(
            resolver.resolve("http://example.com/a.txt").await,
            "http://example.com/a.txt"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retries_until_resolved() {
        let (resolver, calls) = flaky(3, 10);
        assert_eq!(
            resolver.resolve("http://flaky/a.txt").await,
            "http://direct/a.txt"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let (resolver, calls) = flaky(100, 10);
        assert_eq!(resolver.resolve("http://flaky/a.txt").await, "");
        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pauses_between_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let resolver = UrlResolver::with_hosts(
            vec![Box::new(FlakyHost {
                calls: Arc::clone(&calls),
                succeed_on: 100,
            })],
            3,
            Duration::from_secs(10),
        );

        let started = tokio::time::Instant::now();
        assert_eq!(resolver.resolve("http://flaky/a.txt").await, "");
        // Two pauses between three attempts.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(20));
        assert!(elapsed < Duration::from_secs(30));
    }

    #[test]
    fn test_default_hosts() {
        let resolver = UrlResolver::new(Client::new(), &ResolverConfig::default());
        assert_eq!(resolver.max_attempts, 10);
        assert_eq!(resolver.retry_delay, Duration::from_secs(10));
        let names: Vec<_> = resolver.hosts.iter().map(|h| h.name()).collect();
        assert_eq!(names, vec!["sourceforge", "mediafire"]);
    }
}
