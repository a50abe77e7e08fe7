// src/core/scanner/link_classifier.rs

use crate::core::models::{Anchor, LinkClassification, NavigationEdge};
use std::collections::BTreeSet;
use url::Url;

/// Text recorded for an anchor that has no visible text.
pub const EMPTY_ANCHOR_TEXT: &str = "[Internal Link]";

/// Network location of a URL: the host, plus the port when one is given explicitly.
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Resolves the anchors of one page and splits them into internal URLs and external hosts.
///
/// Every anchor yields exactly one `NavigationEdge`, in page order. A link is
/// internal only when its network location equals `target_domain` exactly, so
/// subdomains count as external. Links without a host (`mailto:`, `javascript:`)
/// and hrefs that cannot be resolved get an edge but no classification.
pub fn classify_links(
    base_url: &Url,
    target_domain: &str,
    anchors: &[Anchor],
) -> (LinkClassification, Vec<NavigationEdge>) {
    let mut internal = BTreeSet::new();
    let mut external = BTreeSet::new();
    let mut edges = Vec::with_capacity(anchors.len());

    for anchor in anchors {
        let resolved = base_url.join(anchor.href.trim()).ok();

        if let Some(link) = &resolved {
            match netloc(link) {
                Some(location) if location == target_domain => {
                    internal.insert(link.to_string());
                }
                Some(_) => {
                    if let Some(host) = link.host_str() {
                        external.insert(host.to_string());
                    }
                }
                None => {}
            }
        }

        let text = anchor.text.trim();
        edges.push(NavigationEdge {
            from: base_url.to_string(),
            to: resolved.map(|u| u.to_string()).unwrap_or_else(|| anchor.href.clone()),
            text: if text.is_empty() { EMPTY_ANCHOR_TEXT.to_string() } else { text.to_string() },
        });
    }

    let classification = LinkClassification {
        internal_urls: internal.into_iter().collect(),
        external_domains: external.into_iter().collect(),
    };
    (classification, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(href: &str, text: &str) -> Anchor {
        Anchor { href: href.to_string(), text: text.to_string() }
    }

    #[test]
    fn test_internal_and_external_split() {
        let base = Url::parse("https://example.com/").unwrap();
        let (links, edges) = classify_links(
            &base,
            "example.com",
            &[anchor("/about", "About"), anchor("https://other.org/x", "")],
        );

        assert_eq!(links.internal_urls, vec!["https://example.com/about"]);
        assert_eq!(links.external_domains, vec!["other.org"]);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].text, "About");
        assert_eq!(edges[0].from, "https://example.com/");
        assert_eq!(edges[1].to, "https://other.org/x");
        assert_eq!(edges[1].text, EMPTY_ANCHOR_TEXT);
    }

    #[test]
    fn test_subdomains_are_external() {
        let base = Url::parse("https://example.com/blog/").unwrap();
        let (links, _) = classify_links(
            &base,
            "example.com",
            &[anchor("https://www.example.com/", "www"), anchor("post-1", "  Post  ")],
        );

        assert_eq!(links.internal_urls, vec!["https://example.com/blog/post-1"]);
        assert_eq!(links.external_domains, vec!["www.example.com"]);
    }

    #[test]
    fn test_sets_are_sorted_and_deduplicated() {
        let base = Url::parse("https://example.com/").unwrap();
        let (links, edges) = classify_links(
            &base,
            "example.com",
            &[
                anchor("/z", "z"),
                anchor("/a", "a"),
                anchor("/z", "z again"),
                anchor("https://b.org/1", ""),
                anchor("https://a.org/1", ""),
                anchor("https://b.org/2", ""),
            ],
        );

        assert_eq!(links.internal_urls, vec!["https://example.com/a", "https://example.com/z"]);
        assert_eq!(links.external_domains, vec!["a.org", "b.org"]);
        assert_eq!(edges.len(), 6);
    }

    #[test]
    fn test_hostless_links_keep_their_edge() {
        let base = Url::parse("https://example.com/").unwrap();
        let (links, edges) = classify_links(
            &base,
            "example.com",
            &[anchor("mailto:info@example.com", "Mail"), anchor("javascript:void(0)", "")],
        );

        assert!(links.internal_urls.is_empty());
        assert!(links.external_domains.is_empty());
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].to, "mailto:info@example.com");
    }

    #[test]
    fn test_explicit_port_is_part_of_the_location() {
        let base = Url::parse("http://example.com:8080/").unwrap();
        let (links, _) = classify_links(
            &base,
            "example.com:8080",
            &[anchor("/in", ""), anchor("http://example.com/out", "")],
        );

        assert_eq!(links.internal_urls, vec!["http://example.com:8080/in"]);
        assert_eq!(links.external_domains, vec!["example.com"]);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let base = Url::parse("https://example.com/").unwrap();
        let anchors = [anchor("/about", "About"), anchor("https://other.org/x", "")];
        assert_eq!(
            classify_links(&base, "example.com", &anchors),
            classify_links(&base, "example.com", &anchors)
        );
    }
}
