//! Link and hostname extraction from message bodies

use crate::error::{Error, Result};
use crate::types::domain_of;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Collect link targets from an HTML document.
///
/// Non-empty `href` values of `<a>` elements and non-empty `src` values of
/// `<img>` elements, deduplicated and sorted.
pub fn extract_urls(html: &str) -> Result<Vec<String>> {
    let anchors = selector("a[href]")?;
    let images = selector("img[src]")?;
    let document = Html::parse_document(html);

    let hrefs = document
        .select(&anchors)
        .filter_map(|element| element.value().attr("href"));
    let sources = document
        .select(&images)
        .filter_map(|element| element.value().attr("src"));

    let urls: BTreeSet<String> = hrefs
        .chain(sources)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect();

    Ok(urls.into_iter().collect())
}

/// Network location of a URL: `host[:port]` with any userinfo removed.
///
/// Empty when the URL has no `//` authority, e.g. `mailto:` links or
/// relative paths.
#[must_use]
pub fn netloc(url: &str) -> &str {
    let url = url.trim();
    let rest = match url.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => url,
    };

    let Some(after) = rest.strip_prefix("//") else {
        return "";
    };

    let authority = after.split(['/', '?', '#']).next().unwrap_or_default();
    authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
}

/// Union of URL hosts and the domains of the given addresses, deduplicated
/// and sorted.
///
/// URLs without a network location are skipped. Addresses contribute only
/// when they contain exactly one `@`; the part after it is kept even when
/// empty, so `a@` adds `""`.
#[must_use]
pub fn collect_hostnames<'a>(
    urls: &[String],
    addresses: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let from_urls = urls
        .iter()
        .map(|url| netloc(url))
        .filter(|host| !host.is_empty())
        .map(str::to_string);
    let from_addresses = addresses
        .into_iter()
        .filter_map(domain_of)
        .map(str::to_string);

    let hostnames: BTreeSet<String> = from_urls.chain(from_addresses).collect();

    hostnames.into_iter().collect()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Html(format!("selector {css:?}: {e}")))
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
