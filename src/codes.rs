// Small integer codes carried in link query strings, e.g. `/sv/move_list.htm?type=1`.

use crate::error::{Result, ScrapeError};
use scraper::ElementRef;

/// Parses the segment after the last `=` of a `...?key=<value>` string as an integer.
pub fn query_code(href: &str) -> Result<i32> {
    let (_, value) = href
        .rsplit_once('=')
        .ok_or_else(|| ScrapeError::MalformedLink(href.to_string()))?;
    value
        .trim()
        .parse()
        .map_err(|_| ScrapeError::MalformedLink(href.to_string()))
}

/// Resolves the code carried by an anchor's `href`.
pub fn link_code(anchor: ElementRef<'_>) -> Result<i32> {
    let href = anchor
        .value()
        .attr("href")
        .ok_or_else(|| ScrapeError::MalformedLink(format!("<{}> without href", anchor.value().name())))?;
    query_code(href)
}
