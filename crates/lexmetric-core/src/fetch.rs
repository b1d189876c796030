//! Document fetching and paragraph extraction.
//!
//! [`Fetcher`] is the seam between the analysis core and the network: it
//! returns a raw HTML body or a [`FetchError`]. [`HttpFetcher`] is the
//! blocking `reqwest` implementation used by the CLI; tests substitute
//! in-memory fetchers.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::FetchError;

/// Paragraph selector used for text extraction.
static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid selector"));

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Something that can turn a URL into a document body.
pub trait Fetcher: Send + Sync {
    /// Fetch the raw body at `url`.
    fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

impl<T: Fetcher + ?Sized> Fetcher for Box<T> {
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent header value.
    pub user_agent: String,
    /// Reject bodies larger than this many bytes.
    pub max_body_bytes: Option<usize>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            max_body_bytes: None,
        }
    }
}

/// `lexmetric/<version>`.
pub fn default_user_agent() -> String {
    format!("lexmetric/{}", env!("CARGO_PKG_VERSION"))
}

/// Blocking HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Build a fetcher with its own connection pool.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    /// The configuration this fetcher was built with.
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }
}

impl Fetcher for HttpFetcher {
    #[tracing::instrument(skip(self), fields(url = %url))]
    fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        validate_scheme(url)?;

        let response = self
            .client
            .get(url.clone())
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        if let (Some(limit), Some(len)) = (self.config.max_body_bytes, response.content_length())
        {
            let size = usize::try_from(len).unwrap_or(usize::MAX);
            if size > limit {
                return Err(FetchError::TooLarge { size, limit });
            }
        }

        let body = response.text().map_err(|e| self.classify(e))?;
        if let Some(limit) = self.config.max_body_bytes
            && body.len() > limit
        {
            return Err(FetchError::TooLarge {
                size: body.len(),
                limit,
            });
        }

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "fetched");
        Ok(body)
    }
}

impl HttpFetcher {
    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                timeout: self.config.timeout_secs,
            }
        } else {
            FetchError::Http(err)
        }
    }
}

/// Parse `raw` as an absolute `http`/`https` URL.
pub fn parse_url(raw: &str) -> Result<Url, FetchError> {
    if raw.trim().is_empty() {
        return Err(FetchError::InvalidUrl("empty".to_string()));
    }
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))?;
    validate_scheme(&url)?;
    Ok(url)
}

fn validate_scheme(url: &Url) -> Result<(), FetchError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(FetchError::InvalidUrl(format!(
            "{url}: unsupported scheme `{other}` (expected http or https)"
        ))),
    }
}

/// Concatenate the text of every `<p>` element, in document order, one per line.
///
/// A document with no paragraphs yields an empty string.
pub fn extract_paragraphs(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
