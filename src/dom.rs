// Read-only view over a parsed page: select-one, select-all, attribute and text lookup.

use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Html, Selector};

/// A fetched page together with the URL it was requested from.
pub struct Page {
    pub url: String,
    pub html: Html,
}

impl Page {
    pub fn parse(url: impl Into<String>, body: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(body),
        }
    }

    pub fn select_one(&self, selector: &Selector, what: &'static str) -> Result<ElementRef<'_>> {
        self.html
            .select(selector)
            .next()
            .ok_or(ScrapeError::MissingElement(what))
    }

    pub fn try_select_one(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    pub fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.html.select(selector).collect()
    }
}

/// Compiles a selector literal. Only used for the fixed selectors of this crate.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("selector is valid")
}

pub fn select_one_in<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    what: &'static str,
) -> Result<ElementRef<'a>> {
    scope
        .select(selector)
        .next()
        .ok_or(ScrapeError::MissingElement(what))
}

pub fn attr<'a>(element: ElementRef<'a>, name: &str, what: &'static str) -> Result<&'a str> {
    element
        .value()
        .attr(name)
        .ok_or(ScrapeError::MissingElement(what))
}

/// All descendant text, trimmed at both ends.
pub fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the element when its only child is a text node, or an element that
/// itself resolves to a single text node. `None` otherwise.
pub fn single_text(element: ElementRef<'_>) -> Option<String> {
    let mut children = element.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    match ElementRef::wrap(only) {
        Some(child) => single_text(child),
        None => only.value().as_text().map(|t| t.trim().to_string()),
    }
}
