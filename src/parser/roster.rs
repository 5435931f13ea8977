use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::names::split_honorific;
use super::text::tidy;
use crate::db::MemberRow;

/// Substring the senate site puts in its pagination control ("page").
pub const PAGE_MARKER: &str = "หน้า";

static ANY_ELEMENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("*").expect("Invalid selector"));
static ROLL_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#maincontent table").expect("Invalid table selector"));
static ROWS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("Invalid tr selector"));
static CELLS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("Invalid td selector"));
static IMAGES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("Invalid img selector"));

static SITE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());
static IMAGE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9_]+)\.(?:jpe?g|png|gif)$").unwrap());

/// Where the store's primary key comes from. `SiteId` (default) trusts the
/// numeric first column of the roll table; `ImageFilename` digs the id out
/// of the photo filename, falling back to the site id when the filename
/// carries no digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    SiteId,
    ImageFilename,
}

/// Per-page extraction context: the constants that end up on every record
/// plus the run-wide honorific list.
pub struct RowContext<'a> {
    pub page_url: &'a str,
    pub honorifics: &'a [String],
    pub strategy: IdStrategy,
    pub party: &'a str,
    pub term: &'a str,
}

/// Total page count from the pagination control on listing page 1: the
/// last link inside the element whose text mentions the page marker.
/// A missing control means a single-page (or empty) listing, not an error.
pub fn page_count(html: &str) -> usize {
    let doc = Html::parse_document(html);
    doc.select(&ANY_ELEMENT)
        .filter(|el| {
            el.children()
                .filter_map(|c| c.value().as_text())
                .any(|t| t.contains(PAGE_MARKER))
        })
        .find_map(|el| {
            let last = el
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|e| e.value().name() == "a")
                .last()?;
            tidy(&last.text().collect::<String>()).parse::<usize>().ok()
        })
        .unwrap_or(0)
}

/// Pull member records out of one listing page.
///
/// Rows whose first cell is not all digits (headers, spacers, junk) are
/// skipped silently; the second return value counts them. Missing cells
/// read as empty text. Nothing on a row aborts the page.
pub fn extract_members(html: &str, ctx: &RowContext) -> (Vec<MemberRow>, usize) {
    let doc = Html::parse_document(html);
    let Some(table) = doc.select(&ROLL_TABLE).next() else {
        return (Vec::new(), 0);
    };

    let mut members = Vec::new();
    let mut skipped = 0usize;

    for row in table.select(&ROWS) {
        let cells: Vec<ElementRef> = row.select(&CELLS).collect();
        if cells.is_empty() {
            continue;
        }

        let site_id = cell_text(&cells, 0);
        if !SITE_ID.is_match(&site_id) {
            skipped += 1;
            continue;
        }

        let image = cells
            .get(1)
            .and_then(|td| td.select(&IMAGES).next())
            .and_then(|img| img.value().attr("src"))
            .map(|src| absolutize(ctx.page_url, &tidy(src)))
            .unwrap_or_default();

        let (name, honorific) = split_honorific(&cell_text(&cells, 2), ctx.honorifics);

        let id = match ctx.strategy {
            IdStrategy::SiteId => site_id,
            IdStrategy::ImageFilename => member_id_from_image(&image).unwrap_or(site_id),
        };

        members.push(MemberRow {
            id,
            name,
            image,
            honorific_prefix: honorific,
            party: ctx.party.to_string(),
            term: ctx.term.to_string(),
            source: ctx.page_url.to_string(),
        });
    }

    (members, skipped)
}

/// Identifier embedded in a photo filename: the run of digits and
/// underscores right before the extension, with a leading underscore
/// stripped. `.../photo_007.JPG` → `007`.
pub fn member_id_from_image(image_url: &str) -> Option<String> {
    let caps = IMAGE_ID.captures(image_url)?;
    let id = caps[1].trim_start_matches('_').to_string();
    (id.chars().any(|c| c.is_ascii_digit())).then_some(id)
}

fn cell_text(cells: &[ElementRef], idx: usize) -> String {
    cells
        .get(idx)
        .map(|td| tidy(&td.text().collect::<String>()))
        .unwrap_or_default()
}

fn absolutize(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|b| b.join(href))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}
