//! Next-page detection from pagination links
//!
//! Listing sites expose pagination inconsistently, so two signals are read
//! from the page itself before the crawler falls back to probing the next
//! page directly:
//!
//! 1. an anchor whose `page=` parameter is exactly the next index
//! 2. an anchor labelled as "next" (`Next`, `›` or `>>`)

use crate::crawler::fetcher::PAGE_PARAM;
use scraper::{Html, Selector};
use url::Url;

/// Labels that mark a "next page" anchor
const NEXT_LABELS: [&str; 3] = ["next", "›", ">>"];

/// What convinced the crawler that another page exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPageSignal {
    /// An anchor links straight to the next page index
    ExplicitLink { href: String },

    /// An anchor is labelled as a "next" control
    NextLabel { text: String },

    /// A lookahead fetch of the next page found player rows
    Probe,
}

/// Looks for a pagination link to the page after `current`
///
/// Explicit `page=<current + 1>` links win over "next" labels. Returns
/// `None` when neither is present; the caller then decides whether to probe.
///
/// # Arguments
///
/// * `document` - The parsed listing page
/// * `page_url` - URL of that page, for resolving relative links
/// * `current` - 1-based index of that page
pub fn find_next_link(document: &Html, page_url: &Url, current: u32) -> Option<NextPageSignal> {
    let target = current.checked_add(1)?;

    if let Ok(paged_selector) = Selector::parse("a[href*='page=']") {
        for element in document.select(&paged_selector) {
            if let Some(href) = element.value().attr("href") {
                if links_to_page(href, page_url, target) {
                    return Some(NextPageSignal::ExplicitLink {
                        href: href.to_string(),
                    });
                }
            }
        }
    }

    if let Ok(anchor_selector) = Selector::parse("a") {
        for element in document.select(&anchor_selector) {
            let text = element.text().collect::<String>();
            if is_next_label(&text) {
                return Some(NextPageSignal::NextLabel {
                    text: text.trim().to_string(),
                });
            }
        }
    }

    None
}

/// Returns true if `href` carries `page=<target>` once resolved against `base`
///
/// The parameter value is compared as a number, so `page=20` never counts as
/// a link to page 2.
fn links_to_page(href: &str, base: &Url, target: u32) -> bool {
    let Ok(resolved) = base.join(href.trim()) else {
        return false;
    };

    resolved
        .query_pairs()
        .filter(|(key, _)| key == PAGE_PARAM)
        .any(|(_, value)| value.trim().parse::<u32>() == Ok(target))
}

/// Returns true if anchor text reads as a "next page" control
///
/// Matching is a case-insensitive substring test, so "Next »" and
/// "next page" both qualify.
fn is_next_label(text: &str) -> bool {
    let text = text.to_lowercase();
    NEXT_LABELS.iter().any(|label| text.contains(label))
}
