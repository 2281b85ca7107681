use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::Path;

use crate::client::Fetch;
use crate::html::{collapse_ws, labeled_row_value, text_of};
use crate::types::{Inventor, PatentRecord};

/// One fetched detail page, parsed once, with an accessor per field.
///
/// Accessors assume the fixed PatFT page template and fail on a missing
/// structural anchor rather than returning partial data.
pub struct DetailPage {
    url: String,
    doc: Html,
}

impl DetailPage {
    pub fn parse(url: &str, body: &str) -> Self {
        Self {
            url: url.to_string(),
            doc: Html::parse_document(body),
        }
    }

    /// The part of the page title after its first colon.
    pub fn patent_number(&self) -> Result<String> {
        let title = Selector::parse("title").unwrap();
        let text = self
            .doc
            .select(&title)
            .next()
            .map(text_of)
            .with_context(|| format!("No title on {}", self.url))?;
        let (_, number) = text
            .split_once(':')
            .with_context(|| format!("No patent number in title on {}", self.url))?;
        Ok(number.trim().to_string())
    }

    /// The invention title, set one font size above body text.
    pub fn description(&self) -> Result<String> {
        let font = Selector::parse("font[size=\"+1\"]").unwrap();
        let el = self
            .doc
            .select(&font)
            .next()
            .with_context(|| format!("No description on {}", self.url))?;
        Ok(collapse_ws(&text_of(el)))
    }

    pub fn assignee(&self) -> Result<String> {
        let raw = labeled_row_value(&self.doc, "Assignee")
            .with_context(|| format!("No assignee row on {}", self.url))?;
        Ok(collapse_ws(&raw))
    }

    /// Href of the anchor wrapping the `[Image]` icon.
    pub fn pdf_link(&self) -> Result<String> {
        let image = Selector::parse("img[alt=\"[Image]\"]").unwrap();
        let icon = self
            .doc
            .select(&image)
            .next()
            .with_context(|| format!("No image link on {}", self.url))?;
        let href = icon
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|parent| parent.value().attr("href"))
            .with_context(|| format!("Image icon is not wrapped in a link on {}", self.url))?;
        Ok(href.to_string())
    }

    /// Trimmed text of the first right-aligned half-width cell whose
    /// text ends in a 4-digit year after 1900. The template gives the
    /// date cell no label, only its alignment.
    pub fn award_date(&self) -> Result<String> {
        let cell = Selector::parse("td[align=\"right\"][width=\"50%\"]").unwrap();
        self.doc
            .select(&cell)
            .map(|c| text_of(c).trim().to_string())
            .find(|text| trailing_year(text).is_some_and(|year| year > 1900))
            .with_context(|| format!("No award date on {}", self.url))
    }

    pub fn inventors(&self) -> Result<Vec<Inventor>> {
        let raw = labeled_row_value(&self.doc, "Inventor")
            .with_context(|| format!("No inventors row on {}", self.url))?;
        parse_inventors(&raw)
    }

    /// Assemble the full record. The first missing field aborts.
    pub fn record(&self) -> Result<PatentRecord> {
        Ok(PatentRecord {
            patent_number: self.patent_number()?,
            link_to_page: self.url.clone(),
            description: self.description()?,
            assignee: self.assignee()?,
            award_date: self.award_date()?,
            link_to_pdf: self.pdf_link()?,
            inventors: self.inventors()?,
        })
    }
}

/// Year taken from the last four characters, all of which must be digits.
fn trailing_year(text: &str) -> Option<u32> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 4 {
        return None;
    }
    let tail = &chars[chars.len() - 4..];
    if !tail.iter().all(|c| c.is_ascii_digit()) {
        return None;
    }
    tail.iter().collect::<String>().parse().ok()
}

/// Split the raw inventor field into entries.
///
/// The field reads like `DOE; JOHN (AUSTIN, TX), ROE; JANE (DALLAS, TX)`.
/// Splitting on `)` yields one fragment per inventor plus a remnant.
/// A non-empty fragment without a ` (` location is reported and skipped;
/// a located fragment that will not parse is an error.
fn parse_inventors(raw: &str) -> Result<Vec<Inventor>> {
    let mut inventors = Vec::new();

    for fragment in raw.split(')') {
        if fragment.trim().is_empty() {
            continue;
        }
        let Some((name_part, location)) = fragment.split_once(" (") else {
            eprintln!(
                "  WARNING: no location in inventor entry: {:?}",
                fragment.trim()
            );
            continue;
        };

        let (city, state) = location
            .split_once(',')
            .with_context(|| format!("No city/state separator in {:?}", location))?;

        // Entries after the first arrive with a leading comma from the
        // list separator. Only that comma is stripped; commas inside the
        // name, as in "JOHN, JR.", stay.
        let name = name_part.replace('\n', "");
        let name = name.trim();
        let name = name.strip_prefix(',').map(str::trim_start).unwrap_or(name);
        let (last, rest) = name
            .split_once(';')
            .with_context(|| format!("No surname separator in {:?}", name))?;

        inventors.push(Inventor {
            last: last.trim().to_string(),
            rest: rest.trim().to_string(),
            city: city.trim().to_string(),
            state: state.trim().to_string(),
        });
    }

    Ok(inventors)
}

/// Fetch every link in `links_path` and write the extracted records to
/// `output_path` as one JSON array.
pub fn run_details(
    fetcher: &dyn Fetch,
    links_path: &Path,
    output_path: &Path,
    quiet: bool,
) -> Result<()> {
    let list = fs::read_to_string(links_path)
        .with_context(|| format!("Failed to read links file: {}", links_path.display()))?;
    let links: Vec<&str> = list
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let total = links.len();
    if !quiet {
        println!("Extracting {} patents...\n", total);
    }

    let mut records = Vec::with_capacity(total);
    for (i, link) in links.iter().enumerate() {
        let body = fetcher.fetch(link)?;
        let record = DetailPage::parse(link, &body).record()?;
        if !quiet {
            println!(
                "[{:02}/{:02}] Patent {}: {}",
                i + 1,
                total,
                record.patent_number,
                record.description
            );
        }
        records.push(record);
    }

    let json = serde_json::to_string(&records)?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    if !quiet {
        println!("\nWrote {} records to {}", records.len(), output_path.display());
    }
    Ok(())
}
