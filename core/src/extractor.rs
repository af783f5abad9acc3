//! Row extractor — turns a rendered race page into raw candidate rows.
//!
//! Expected structure: the first `table[role="table"]`, its `tbody`, and
//! inside that `tr[role="row"]` rows of at least six `<td>` cells:
//! name, party, contributions, loans, expenditures, status.
//!
//! A missing table is not an error; the race simply yields no rows.
//! Rows with too few cells are skipped and counted.

use crate::error::{ScrapeError, ScrapeResult};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_TABLE_SELECTOR: &str = r#"table[role="table"]"#;
pub const DEFAULT_ROW_SELECTOR: &str = r#"tr[role="row"]"#;
/// name, party, contributions, loans, expenditures, status
pub const EXPECTED_CELLS: usize = 6;

/// One scraped table row. Currency columns stay as formatted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandidateRow {
    pub name:          String,
    pub party:         String,
    pub contributions: String,
    pub loans:         String,
    pub expenditures:  String,
    pub status:        String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Found,
    NoTable,
    NoBody,
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableStatus::Found   => "found",
            TableStatus::NoTable => "no table",
            TableStatus::NoBody  => "no tbody",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub status:    TableStatus,
    pub rows:      Vec<RawCandidateRow>,
    /// Row elements matched, including skipped ones.
    pub rows_seen: usize,
    pub skipped:   usize,
}

impl Extraction {
    fn missing(status: TableStatus) -> Self {
        Self { status, rows: Vec::new(), rows_seen: 0, skipped: 0 }
    }
}

pub struct RowExtractor {
    table: Selector,
    body:  Selector,
    row:   Selector,
    cell:  Selector,
    link:  Selector,
}

impl RowExtractor {
    pub fn new() -> ScrapeResult<Self> {
        Self::with_selectors(DEFAULT_TABLE_SELECTOR, DEFAULT_ROW_SELECTOR)
    }

    pub fn with_selectors(table: &str, row: &str) -> ScrapeResult<Self> {
        Ok(Self {
            table: parse_selector(table)?,
            body: parse_selector("tbody")?,
            row: parse_selector(row)?,
            cell: parse_selector("td")?,
            link: parse_selector("a")?,
        })
    }

    pub fn extract(&self, html: &str) -> Extraction {
        let document = Html::parse_document(html);

        let Some(table) = document.select(&self.table).next() else {
            return Extraction::missing(TableStatus::NoTable);
        };
        let Some(body) = table.select(&self.body).next() else {
            return Extraction::missing(TableStatus::NoBody);
        };

        let mut extraction = Extraction {
            status: TableStatus::Found,
            rows: Vec::new(),
            rows_seen: 0,
            skipped: 0,
        };
        for row in body.select(&self.row) {
            extraction.rows_seen += 1;
            match self.parse_row(row) {
                Some(parsed) => extraction.rows.push(parsed),
                None => extraction.skipped += 1,
            }
        }
        extraction
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Option<RawCandidateRow> {
        let cells: Vec<ElementRef<'_>> = row.select(&self.cell).collect();
        if cells.len() < EXPECTED_CELLS {
            return None;
        }

        // Prefer the candidate link text; the cell may hold badges too.
        let name = match cells[0].select(&self.link).next() {
            Some(link) => stripped_text(link),
            None => stripped_text(cells[0]),
        };

        Some(RawCandidateRow {
            name,
            party: stripped_text(cells[1]),
            contributions: stripped_text(cells[2]),
            loans: stripped_text(cells[3]),
            expenditures: stripped_text(cells[4]),
            status: stripped_text(cells[5]),
        })
    }
}

fn parse_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|_| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
    })
}

/// Concatenate the element's text nodes, each trimmed, empty ones dropped.
fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|s| !s.is_empty()).collect()
}
