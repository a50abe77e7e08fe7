// src/core/scanner/page_auditor.rs

use crate::core::error::ReconError;
use crate::core::models::{Anchor, FetchedPage, PageAudit, PageContent};
use crate::core::scanner::headers_scanner::audit_headers;
use crate::core::scanner::link_classifier::classify_links;
use crate::core::scanner::target::ScanTarget;
use once_cell::sync::Lazy;
use reqwest::header::HeaderMap;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2").unwrap());
static HIDDEN_INPUT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"input[type="hidden"]"#).unwrap());

/// Comments containing any of these (case-insensitive) are flagged.
const SENSITIVE_KEYWORDS: &[&str] = &["password", "config", "key", "admin", "db", "user"];

/// Fetches one page and hands back its headers, anchors and notable content.
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, ReconError>> + Send;
}

/// `PageFetcher` backed by a `reqwest` client that follows redirects.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ReconError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client.");
                ReconError::FetchError { url: String::new(), reason: format!("HTTP client error: {e}") }
            })?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ReconError> {
        let fetch_error = |e: reqwest::Error| ReconError::FetchError {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url.clone()).send().await.map_err(fetch_error)?;
        info!(status = %response.status(), "Received HTTP response.");

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let headers = flatten_headers(response.headers());
        let body = response.text().await.map_err(fetch_error)?;
        debug!(bytes = body.len(), "Read response body.");

        let (anchors, content) = parse_page(&body);
        Ok(FetchedPage { final_url, status, headers, anchors, content })
    }
}

/// Keeps the first value of each header; non-UTF-8 values become a placeholder.
fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    for (name, value) in headers {
        let value = value.to_str().map(str::to_string).unwrap_or_else(|_| {
            warn!(header_name = %name, "Header contained invalid UTF-8.");
            "[Invalid UTF-8]".to_string()
        });
        flat.entry(name.as_str().to_string()).or_insert(value);
    }
    flat
}

/// Parses the body once and collects its anchors, headings, hidden inputs and
/// flagged comments.
pub fn parse_page(body: &str) -> (Vec<Anchor>, PageContent) {
    let document = Html::parse_document(body);

    let anchors = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|el| {
            el.value().attr("href").map(|href| Anchor {
                href: href.to_string(),
                text: el.text().collect::<String>(),
            })
        })
        .collect();

    let headings = document
        .select(&HEADING_SELECTOR)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect();

    let hidden_inputs = document
        .select(&HIDDEN_INPUT_SELECTOR)
        .map(|el| el.value().attr("name").unwrap_or("unnamed").to_string())
        .collect();

    let flagged_comments: Vec<String> = document
        .tree
        .values()
        .filter_map(|node| node.as_comment())
        .map(|comment| comment.trim().to_string())
        .filter(|comment| is_sensitive_comment(comment))
        .collect();
    if !flagged_comments.is_empty() {
        warn!(count = flagged_comments.len(), "Page carries sensitive-looking comments.");
    }

    (anchors, PageContent { headings, hidden_inputs, flagged_comments })
}

fn is_sensitive_comment(comment: &str) -> bool {
    let lower = comment.to_lowercase();
    SENSITIVE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Fetches the target page and runs the header audit and link classification over it.
pub async fn audit_page(fetcher: &impl PageFetcher, target: &ScanTarget) -> Result<PageAudit, ReconError> {
    info!(url = %target.url, "Starting page audit.");

    let page = fetcher.fetch(&target.url).await.map_err(|e| {
        error!(url = %target.url, error = %e, "Page fetch failed.");
        e
    })?;

    let (header_audit, proxy, fingerprint) = audit_headers(&page.headers);
    let (links, navigation) = classify_links(&page.final_url, &target.domain, &page.anchors);

    info!(
        internal = links.internal_urls.len(),
        external = links.external_domains.len(),
        "Page audit finished."
    );
    Ok(PageAudit {
        final_url: page.final_url.to_string(),
        status: page.status,
        headers: page.headers,
        header_audit,
        proxy,
        fingerprint,
        links,
        navigation,
        content: page.content,
    })
}
