use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use crate::db::{self, MemberRow};
use crate::fetch::CachedClient;
use crate::parser::honorifics;
use crate::parser::roster::{self, IdStrategy, RowContext};

/// Senate roster listing; `{PAGE-NUMBER}` is substituted per page, 1-based.
pub const DEFAULT_LISTING_URL: &str =
    "http://www.senate.go.th/w3c/senate/senator.php?id=18&page={PAGE-NUMBER}&orby=&orrg=ASC";

/// Thai-Wikipedia article on the 2557 BE National Legislative Assembly.
/// Unlike the senate site, it separates honorifics from names.
pub const DEFAULT_WIKI_URL: &str =
    "https://th.wikipedia.org/wiki/สภานิติบัญญัติแห่งชาติ_(ประเทศไทย)_พ.ศ._2557";

/// Encoded anchor id of the first-round-appointments section heading on
/// the wiki article. The honorific list lives in the table that follows it.
const SECTION_ANCHOR_ID: &str = ".E0.B8.81.E0.B8.B2.E0.B8.A3.E0.B9.81.E0.B8.95.E0.B9.88.E0.B8.87\
.E0.B8.95.E0.B8.B1.E0.B9.89.E0.B8.87.E0.B8.A3.E0.B8.AD.E0.B8.9A.E0.B9.81.E0.B8.A3.E0.B8.81";

/// When set, every assembled record's non-empty fields print to stdout
/// (sorted by field name) before the upsert.
const DEBUG_ENV: &str = "ROSTER_DEBUG";

pub struct ScrapeConfig {
    pub listing_url: String,
    pub wiki_url: String,
    pub party: String,
    pub term: String,
    pub id_strategy: IdStrategy,
    pub max_pages: Option<usize>,
    pub keep_existing: bool,
}

pub struct RunStats {
    pub pages: usize,
    pub members: usize,
    pub skipped: usize,
    pub wikinames: usize,
}

pub fn listing_url(template: &str, page: usize) -> String {
    template.replace("{PAGE-NUMBER}", &page.to_string())
}

/// Listing pages to visit, ascending, optionally capped.
fn pages_to_visit(count: usize, limit: Option<usize>) -> Vec<usize> {
    let n = limit.map_or(count, |l| count.min(l));
    (1..=n).collect()
}

/// Full scrape run: reset the store, discover the page count, extract
/// honorifics once, then walk every listing page in order. Pages are
/// fetched strictly sequentially; the first fetch/parse failure unwinds
/// the whole run.
pub async fn run(conn: &Connection, client: &CachedClient, cfg: &ScrapeConfig) -> Result<RunStats> {
    if !cfg.keep_existing {
        db::reset_members(conn)?;
    }
    db::init_schema(conn)?;

    let first = listing_url(&cfg.listing_url, 1);
    println!("--> page count from {}", first);
    let count = roster::page_count(&client.get(&first).await?);
    println!("    last page number: {}", count);

    let wiki = client.get(&cfg.wiki_url).await?;
    let section = honorifics::extract(&wiki, SECTION_ANCHOR_ID)?;
    let wikinames = db::upsert_wikinames(conn, &section.wikinames)?;
    info!(
        "{} honorifics, {} wikinames ({} new)",
        section.honorifics.len(),
        section.wikinames.len(),
        wikinames
    );

    let debug_dump = std::env::var_os(DEBUG_ENV).is_some();
    let pages = pages_to_visit(count, cfg.max_pages);
    let mut members = 0usize;
    let mut skipped = 0usize;

    for &page in &pages {
        let url = listing_url(&cfg.listing_url, page);
        println!("--> scrape_senate_page({})", url);
        let html = client.get(&url).await?;

        let ctx = RowContext {
            page_url: &url,
            honorifics: &section.honorifics,
            strategy: cfg.id_strategy,
            party: &cfg.party,
            term: &cfg.term,
        };
        let (rows, page_skipped) = roster::extract_members(&html, &ctx);

        for row in &rows {
            if debug_dump {
                dump_record(row);
            }
            db::upsert_member(conn, row)?;
        }

        println!("    members on this page: {}", rows.len());
        members += rows.len();
        skipped += page_skipped;
    }

    Ok(RunStats {
        pages: pages.len(),
        members,
        skipped,
        wikinames,
    })
}

/// Debug side channel: print non-empty fields sorted by field name.
/// serde_json's object map is a BTreeMap, so iteration order is the sort.
fn dump_record(row: &MemberRow) {
    if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(row) {
        for (key, value) in &map {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) if s.is_empty() => {}
                _ => println!("  {}: {}", key, value),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_url_substitutes_page_number() {
        let url = listing_url(DEFAULT_LISTING_URL, 3);
        assert!(url.contains("page=3&"));
        assert!(!url.contains("{PAGE-NUMBER}"));
    }

    #[test]
    fn pages_are_visited_ascending_from_one() {
        assert_eq!(pages_to_visit(5, None), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn page_limit_caps_the_walk() {
        assert_eq!(pages_to_visit(5, Some(2)), vec![1, 2]);
        assert_eq!(pages_to_visit(2, Some(10)), vec![1, 2]);
    }

    #[test]
    fn zero_pages_means_nothing_to_scrape() {
        assert!(pages_to_visit(0, None).is_empty());
    }
}
