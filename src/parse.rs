use std::collections::BTreeMap;

use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// Heading tag names in rank order.
pub const HEADING_LEVELS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// On-page SEO signals of a single document.
///
/// `headings` always holds all six levels as keys, each one listing the heading
/// texts of that level in document order.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct SeoSignals {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub headings: BTreeMap<String, Vec<String>>,
}

impl SeoSignals {
    /// Creates a signal set with every heading level present and empty.
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        meta_description: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            meta_description: meta_description.into(),
            headings: HEADING_LEVELS
                .iter()
                .map(|level| ((*level).to_owned(), Vec::new()))
                .collect(),
        }
    }

    /// Replaces the texts of one heading level, ignoring unknown levels.
    pub fn with_headings<I, S>(mut self, level: &str, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(slot) = self.headings.get_mut(level) {
            *slot = texts.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Heading texts of `level`, empty for levels without matches.
    pub fn headings(&self, level: &str) -> &[String] {
        self.headings
            .get(level)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Extracts title, meta description and headings from HTML.
///
/// Never fails: html5ever recovers from any malformed input and every missing
/// element simply leaves its field empty.
pub fn extract_signals(url: &str, html: &str) -> SeoSignals {
    let document = Html::parse_document(html);

    let mut signals = SeoSignals::new(
        url,
        parse_title(&document),
        parse_meta_description(&document),
    );

    for level in HEADING_LEVELS {
        let texts: Vec<String> = select_all(&document, level)
            .into_iter()
            .map(element_text)
            .collect();
        signals = signals.with_headings(level, texts);
    }

    debug!(
        "Extracted from {url}: title {} chars, description {} chars, {} headings",
        signals.title.len(),
        signals.meta_description.len(),
        signals.headings.values().map(Vec::len).sum::<usize>()
    );

    signals
}

/// Text of the first `<title>` element.
fn parse_title(document: &Html) -> String {
    select_all(document, "title")
        .into_iter()
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// `content` of the first `<meta>` whose `name` is exactly `description`.
///
/// Matching is case-sensitive on the attribute value.
fn parse_meta_description(document: &Html) -> String {
    select_all(document, "meta")
        .into_iter()
        .find(|meta| meta.value().attr("name") == Some("description"))
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_owned)
        .unwrap_or_default()
}

fn select_all<'a>(document: &'a Html, tag: &str) -> Vec<ElementRef<'a>> {
    Selector::parse(tag)
        .map(|selector| document.select(&selector).collect())
        .unwrap_or_default()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}
