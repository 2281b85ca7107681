use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::client::Fetch;
use crate::html;
use crate::query::{PAGE_SIZE, SearchQuery, SITE_ROOT};

/// Fixed phrase PatFT renders when a query matches nothing.
const NO_RESULTS_SENTINEL: &str = "No patents have matched your query";

/// Fixed phrase present only on multi-result listing pages. A single
/// match redirects straight to the detail page, which lacks it.
const RESULTS_SENTINEL: &str = "Patent Database Search Results";

/// Header of the results table's patent-number column.
const RESULTS_TABLE_HEADER: &str = "PAT. NO.";

/// How a search resolved after classifying the first response.
#[derive(Debug)]
pub enum SearchOutcome {
    NoMatches,
    /// Exactly one match. The search redirected to the patent's own page,
    /// so the query URL doubles as the detail link.
    Single(String),
    /// Two or more matches: detail links from every results page, first
    /// occurrence wins, order preserved.
    Results(Vec<String>),
}

/// Fetch the first results page, classify it, and walk the remaining
/// pages when there are any.
///
/// A continuation page that fails to fetch is reported and skipped; only
/// the initial request is fatal.
pub fn search_links(
    fetcher: &dyn Fetch,
    query: &SearchQuery,
    quiet: bool,
) -> Result<SearchOutcome> {
    let first_url = query.results_url(1);
    let body = fetcher.fetch(&first_url)?;

    if body.contains(NO_RESULTS_SENTINEL) {
        return Ok(SearchOutcome::NoMatches);
    }
    if !body.contains(RESULTS_SENTINEL) {
        return Ok(SearchOutcome::Single(first_url));
    }

    let count = result_count(&body)
        .with_context(|| format!("No result count marker on {}", first_url))?;
    let pages = page_count(count);
    if !quiet {
        println!("Found {} results across {} pages", count, pages);
    }

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if !quiet {
        println!("Fetching links from page 1");
    }
    collect_links(&mut links, &mut seen, extract_links(&Html::parse_document(&body))?);

    for page in 2..=pages {
        if !quiet {
            println!("Fetching links from page {}", page);
        }
        let url = query.results_url(page);
        match fetcher.fetch(&url) {
            Ok(page_body) => {
                let doc = Html::parse_document(&page_body);
                collect_links(&mut links, &mut seen, extract_links(&doc)?);
            }
            Err(e) => eprintln!("  WARNING: skipping results page {}: {}", page, e),
        }
    }

    Ok(SearchOutcome::Results(links))
}

fn collect_links(links: &mut Vec<String>, seen: &mut HashSet<String>, page_links: Vec<String>) {
    for link in page_links {
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }
}

/// Total match count from the `<DOCS: N>` marker embedded in the page,
/// matched case-insensitively against the raw body.
fn result_count(body: &str) -> Option<u32> {
    let lower = body.to_lowercase();
    let at = lower.find("<docs:")?;
    let digits: String = lower[at + "<docs:".len()..]
        .chars()
        .skip_while(|c| c.is_whitespace())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Number of results pages needed for `count` matches.
fn page_count(count: u32) -> u32 {
    count.div_ceil(PAGE_SIZE)
}

/// Detail links from one results page: every anchor inside the table
/// headed by `PAT. NO.`, made absolute, first occurrence of each kept.
fn extract_links(doc: &Html) -> Result<Vec<String>> {
    let anchor = Selector::parse("a").unwrap();
    let table = html::table_with_header(doc, RESULTS_TABLE_HEADER)
        .context("No results table on page")?;

    let mut seen = HashSet::new();
    Ok(table
        .select(&anchor)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| format!("{}{}", SITE_ROOT, href))
        .filter(|link| seen.insert(link.clone()))
        .collect())
}

/// Run a search and write its links to `path`, one per line.
///
/// Returns how many links were written. On zero matches no file is
/// produced at all.
pub fn run_links(
    fetcher: &dyn Fetch,
    query: &SearchQuery,
    path: &Path,
    quiet: bool,
) -> Result<usize> {
    if !quiet {
        println!(
            "Searching {} to {} for patents from {}, {}",
            query.start_date, query.end_date, query.city, query.state
        );
    }

    let links = match search_links(fetcher, query, quiet)? {
        SearchOutcome::NoMatches => {
            if !quiet {
                println!("No patents matched the query");
            }
            return Ok(0);
        }
        SearchOutcome::Single(link) => {
            if !quiet {
                println!("Found a single patent");
            }
            vec![link]
        }
        SearchOutcome::Results(links) => links,
    };

    let mut contents = links.join("\n");
    contents.push('\n');
    fs::write(path, contents)
        .with_context(|| format!("Failed to write links file: {}", path.display()))?;

    if !quiet {
        println!("Wrote {} links to {}", links.len(), path.display());
    }
    Ok(links.len())
}
