use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::text::tidy;
use crate::error::ScrapeError;

static LIST_ITEMS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ol li").expect("Invalid li selector"));
static SPANS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("Invalid span selector"));
static LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("Invalid link selector"));

/// Output of the honorific section: title prefixes ordered longest-first,
/// plus the full names harvested from the same list for the wikinames table.
#[derive(Debug)]
pub struct HonorificSection {
    pub honorifics: Vec<String>,
    pub wikinames: Vec<String>,
}

/// Extract honorifics from the wiki article.
///
/// The region is bounded by two landmarks: the heading carrying the span
/// whose id is `anchor_id` (everything before it is ignored), and the first
/// table following that heading (everything after it is ignored). Either
/// landmark missing is fatal — without honorifics the name splitter would
/// silently do nothing.
pub fn extract(html: &str, anchor_id: &str) -> Result<HonorificSection, ScrapeError> {
    let doc = Html::parse_document(html);
    let table = section_table(&doc, anchor_id)?;

    let mut honorifics: Vec<String> = Vec::new();
    let mut wikinames: Vec<String> = Vec::new();

    for li in table.select(&LIST_ITEMS) {
        if li.select(&LINKS).next().is_none() {
            continue;
        }
        let hon = tidy(&leading_text(&li));
        if !hon.is_empty() && !honorifics.contains(&hon) {
            honorifics.push(hon);
        }
        if let Some(name) = wikiname(&li) {
            wikinames.push(name);
        }
    }

    if honorifics.is_empty() {
        return Err(ScrapeError::NoHonorifics);
    }

    // Longest first: a compound honorific must sort before its own prefix,
    // or stripping would leave a residual fragment on the name.
    honorifics.sort_by(|a, b| b.len().cmp(&a.len()));

    Ok(HonorificSection {
        honorifics,
        wikinames,
    })
}

/// Locate the roll table: the first table following the heading that
/// contains the section anchor span.
fn section_table<'a>(doc: &'a Html, anchor_id: &str) -> Result<ElementRef<'a>, ScrapeError> {
    let anchor = doc
        .select(&SPANS)
        .find(|s| s.value().id() == Some(anchor_id))
        .ok_or(ScrapeError::SectionNotFound {
            landmark: "section anchor",
        })?;

    // The anchor span sits inside a heading; sibling traversal starts there.
    let start = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| matches!(e.value().name(), "h2" | "h3" | "h4"))
        .unwrap_or(anchor);

    start
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
        .ok_or(ScrapeError::SectionNotFound {
            landmark: "roll table",
        })
}

/// Direct text of a list item up to its first link child. That leading
/// run is the honorific; the link itself is the person.
fn leading_text(li: &ElementRef) -> String {
    let mut out = String::new();
    for child in li.children() {
        if let Some(el) = ElementRef::wrap(child) {
            if el.value().name() == "a" {
                break;
            }
        }
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
    out
}

/// Full name for the wikinames side table: the title attribute (fallback:
/// link text) of the first link that is not a red "new" link.
fn wikiname(li: &ElementRef) -> Option<String> {
    let link = li.select(&LINKS).find(|a| {
        a.value()
            .attr("class")
            .map_or(true, |c| !c.split_whitespace().any(|t| t == "new"))
    })?;
    let title = link
        .value()
        .attr("title")
        .map(tidy)
        .filter(|t| !t.is_empty());
    let name = title.unwrap_or_else(|| tidy(&link.text().collect::<String>()));
    (!name.is_empty()).then_some(name)
}
