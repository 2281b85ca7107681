//! Structural lookups for label-based table templates
//!
//! PatFT pages carry their data in bare `<th>`/`<td>` rows with no ids or
//! classes, so extraction finds a header cell by its text and walks the
//! tree from there. The parser inserts `tbody` elements the source markup
//! omits, so these walks climb ancestors instead of counting parents.

use scraper::{ElementRef, Html, Selector};

/// Collect the full text of an element's subtree.
pub fn text_of(el: ElementRef) -> String {
    el.text().collect()
}

/// Trim, delete newlines outright, and collapse whitespace runs to single
/// spaces. A line break with no surrounding spaces joins its neighbors.
pub fn collapse_ws(text: &str) -> String {
    text.trim()
        .replace('\n', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Nearest `<table>` ancestor of an element.
fn enclosing_table(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

/// Nearest `<tr>` ancestor of an element.
fn enclosing_row(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "tr")
}

/// Raw text of the first `<td>` in the same row as the first `<th>` whose
/// trimmed text starts with `label`. Callers normalize the result.
pub fn labeled_row_value(doc: &Html, label: &str) -> Option<String> {
    let th = Selector::parse("th").unwrap();
    let td = Selector::parse("td").unwrap();
    let header = doc
        .select(&th)
        .find(|cell| text_of(*cell).trim().starts_with(label))?;
    let row = enclosing_row(header)?;
    row.select(&td).next().map(text_of)
}

/// The table containing a `<th>` whose trimmed text is exactly `header`.
pub fn table_with_header<'a>(doc: &'a Html, header: &str) -> Option<ElementRef<'a>> {
    let th = Selector::parse("th").unwrap();
    let cell = doc
        .select(&th)
        .find(|c| text_of(*c).trim() == header)?;
    enclosing_table(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_ws_squeezes_runs() {
        assert_eq!(collapse_ws("  Acme   Research \t LLC  "), "Acme Research LLC");
    }

    #[test]
    fn test_collapse_ws_deletes_newlines() {
        // No space around the break, so the halves join.
        assert_eq!(collapse_ws("Wid\nget Co"), "Widget Co");
        // An adjacent space still separates the words.
        assert_eq!(collapse_ws("Widget\n Co"), "Widget Co");
    }

    #[test]
    fn test_labeled_row_value_matches_label_prefix() {
        let doc = Html::parse_document(
            "<table><tr><th>Inventors: </th><td>DOE; JOHN</td></tr></table>",
        );
        assert_eq!(
            labeled_row_value(&doc, "Inventor").as_deref(),
            Some("DOE; JOHN")
        );
    }

    #[test]
    fn test_labeled_row_value_missing_label() {
        let doc = Html::parse_document("<table><tr><th>Appl. No.:</th><td>17/1</td></tr></table>");
        assert_eq!(labeled_row_value(&doc, "Assignee"), None);
    }

    #[test]
    fn test_labeled_row_value_crosses_inserted_tbody() {
        // The source omits tbody; the parser adds one between table and tr.
        let doc = Html::parse_document(
            "<table><tr><th>Assignee:</th><td>Acme Corp.</td></tr></table>",
        );
        assert_eq!(labeled_row_value(&doc, "Assignee").as_deref(), Some("Acme Corp."));
    }

    #[test]
    fn test_table_with_header_requires_exact_text() {
        let doc = Html::parse_document(
            "<table><tr><th>PAT. NO.</th><td><a href=\"/a\">1</a></td></tr></table>\
             <table><tr><th>Title</th><td><a href=\"/b\">2</a></td></tr></table>",
        );
        let table = table_with_header(&doc, "PAT. NO.").unwrap();
        let anchor = Selector::parse("a").unwrap();
        let hrefs: Vec<&str> = table
            .select(&anchor)
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(hrefs, ["/a"]);
        assert!(table_with_header(&doc, "PAT NO").is_none());
    }
}
