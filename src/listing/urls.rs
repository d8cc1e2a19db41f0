use std::sync::LazyLock;

use regex::Regex;

/// Search page the host seeds the crawl with.
pub const START_URL: &str = "https://newyork.craigslist.org/search/apa";

static LISTING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"newyork\.craigslist\.org/(.*)/?apa/d/(.*)\.html$").unwrap());

static INDEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"newyork\.craigslist\.org/search/apa\?s=([0-9]*)$").unwrap());

/// One apartment posting. The end anchor rejects URLs carrying a fragment.
pub fn is_listing_url(url: &str) -> bool {
    LISTING_RE.is_match(url)
}

/// A paginated search-results page.
pub fn is_index_url(url: &str) -> bool {
    INDEX_RE.is_match(url)
}

/// Keep only the two page types this job crawls.
pub fn filter_links(links: Vec<String>) -> Vec<String> {
    links
        .into_iter()
        .filter(|link| is_index_url(link) || is_listing_url(link))
        .collect()
}
