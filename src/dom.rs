//! Thin extraction layer over exported HTML pages
//!
//! The export tool writes an index page whose `<span>` labels carry the
//! album title and description, and one detail page per image whose
//! `div.imagetitle` carries the caption. This module only pulls those text
//! nodes out; the extraction rules applied to them live in [`crate::extract`].

use scraper::{Html, Selector};

/// Text of every `<span>` in the index page, trimmed, empties dropped,
/// in document order
pub fn index_fragments(html: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("span") else {
        return Vec::new();
    };
    let doc = Html::parse_document(html);
    doc.select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Text of the first `div.imagetitle` in a detail page, if any
pub fn caption_text(html: &str) -> Option<String> {
    let selector = Selector::parse("div.imagetitle").ok()?;
    let doc = Html::parse_document(html);
    let text = doc
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    if text.is_empty() { None } else { Some(text) }
}
