//! MediaFire landing page resolution.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use scraper::{Html, Selector};

use super::{HostResolver, ResolveError};

const MEDIAFIRE_PREFIX: &str = "http://www.mediafire.com/file/";

/// Visible text of the download button on a landing page.
const DOWNLOAD_MARKER: &str = "Download (";

/// Resolves MediaFire file URLs.
///
/// A HEAD request that redirects to something other than an HTML page is
/// the direct link. Otherwise the landing page is scraped for its download
/// button.
pub struct MediafireResolver {
    client: Client,
    prefix: String,
}

impl MediafireResolver {
    pub fn new(client: Client) -> Self {
        Self::with_prefix(client, MEDIAFIRE_PREFIX)
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
impl HostResolver for MediafireResolver {
    fn name(&self) -> &str {
        "mediafire"
    }

    fn matches(&self, url: &str) -> bool {
        url.starts_with(&self.prefix)
    }

    async fn resolve_once(&self, url: &str) -> Result<String, ResolveError> {
        let head = self
            .client
            .head(url)
            .header(USER_AGENT, "")
            .send()
            .await?;

        // A missing Content-Type is treated like a page and scraped.
        let is_html = head
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(true);

        if head.url().as_str() != url && !is_html {
            return Ok(head.url().to_string());
        }

        let page = self
            .client
            .get(url)
            .header(USER_AGENT, "")
            .send()
            .await?
            .text()
            .await?;

        Ok(find_download_link(&page).unwrap_or_else(|| url.to_string()))
    }
}

/// Target of the first anchor whose text starts with the download marker.
fn find_download_link(page: &str) -> Option<String> {
    let document = Html::parse_document(page);
    let anchors = Selector::parse("a[href]").ok()?;

    document
        .select(&anchors)
        .find(|a| {
            a.text()
                .collect::<String>()
                .trim()
                .starts_with(DOWNLOAD_MARKER)
        })
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve;
    use axum::http::header;
    use axum::response::{Html as HtmlResponse, IntoResponse, Redirect};
    use axum::routing::get;
    use axum::Router;

    const LANDING_PAGE: &str = r#"
        <html><body>
          <a class="input" href="http://mirror.example/other.zip">Mirror list</a>
          <a class="input popsok" href="http://download1.example/abc/rockyou.txt.gz">
              Download (59.25MB)
          </a>
        </body></html>
    "#;

    fn fixture() -> Router {
        Router::new()
            .route("/file/direct", get(|| async { Redirect::temporary("/dl/direct.txt.gz") }))
            .route(
                "/dl/direct.txt.gz",
                get(|| async {
                    ([(header::CONTENT_TYPE, "application/gzip")], "payload").into_response()
                }),
            )
            .route("/file/page", get(|| async { HtmlResponse(LANDING_PAGE) }))
            .route(
                "/file/empty",
                get(|| async { HtmlResponse("<html><body>nothing here</body></html>") }),
            )
    }

    #[test]
    fn test_find_download_link() {
        assert_eq!(
            find_download_link(LANDING_PAGE).as_deref(),
            Some("http://download1.example/abc/rockyou.txt.gz")
        );
        assert_eq!(find_download_link("<a href=\"x\">Get it</a>"), None);
    }

    #[test]
    fn test_matches_prefix() {
        let resolver = MediafireResolver::new(Client::new());
        assert!(resolver.matches("http://www.mediafire.com/file/abc/list.7z"));
        assert!(!resolver.matches("https://www.mediafire.com/file/abc/list.7z"));
        assert!(!resolver.matches("http://example.com/list.7z"));
    }

    #[tokio::test]
    async fn test_redirect_to_file_is_resolved() {
        let addr = serve(fixture()).await;
        let resolver = MediafireResolver::with_prefix(Client::new(), format!("http://{}/file/", addr));

        let resolved = resolver
            .resolve_once(&format!("http://{}/file/direct", addr))
            .await
            .unwrap();
        assert_eq!(resolved, format!("http://{}/dl/direct.txt.gz", addr));
    }

    #[tokio::test]
    async fn test_landing_page_is_scraped() {
        let addr = serve(fixture()).await;
        let resolver = MediafireResolver::with_prefix(Client::new(), format!("http://{}/file/", addr));

        let resolved = resolver
            .resolve_once(&format!("http://{}/file/page", addr))
            .await
            .unwrap();
        assert_eq!(resolved, "http://download1.example/abc/rockyou.txt.gz");
    }

    #[tokio::test]
    async fn test_page_without_button_returns_input() {
        let addr = serve(fixture()).await;
        let resolver = MediafireResolver::with_prefix(Client::new(), format!("http://{}/file/", addr));
        let url = format!("http://{}/file/empty", addr);

        assert_eq!(resolver.resolve_once(&url).await.unwrap(), url);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let resolver = MediafireResolver::with_prefix(Client::new(), "http://127.0.0.1:1/file/");
        assert!(resolver
            .resolve_once("http://127.0.0.1:1/file/x")
            .await
            .is_err());
    }
}
