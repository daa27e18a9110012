use crate::error::{Result, ScraperError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// Compile CSS selectors once; the strings are compile-time constants.
static FIRM_TBODY: Lazy<Selector> = Lazy::new(|| Selector::parse("#firms tbody").unwrap());
static TBODY: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody").unwrap());
static TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

/// One positionally-indexed table on a registry page. The site renders its
/// tables in a fixed order with no distinguishing markup, so extraction is
/// positional; every layout assumption lives in the schema values below.
pub struct TableSchema {
    /// Label used in structure errors.
    label: &'static str,
    /// Selector matching candidate table bodies.
    table: &'static Lazy<Selector>,
    /// Which match holds the data, counting in document order.
    index: usize,
    /// Header rows before the data begins.
    skip_rows: usize,
}

/// The firm index table on a listing page: one header row, then one row
/// per firm.
pub static FIRM_LISTING: TableSchema = TableSchema {
    label: "firm listing",
    table: &FIRM_TBODY,
    index: 0,
    skip_rows: 1,
};

/// Payments-by-quarter table on a detail page, the 7th table body.
pub static PAYMENT_TABLE: TableSchema = TableSchema {
    label: "payments by quarter",
    table: &TBODY,
    index: 6,
    skip_rows: 2,
};

/// Clients table on a detail page, the 8th table body. Absent when the
/// firm reported no lobbying activity for the session.
pub static CLIENT_TABLE: TableSchema = TableSchema {
    label: "clients",
    table: &TBODY,
    index: 7,
    skip_rows: 2,
};

/// Locate a schema's table body, if the page has one.
pub fn find_table<'a>(document: &'a Html, schema: &TableSchema) -> Option<ElementRef<'a>> {
    document.select(schema.table).nth(schema.index)
}

/// Data rows of a schema's table, header rows skipped. A missing table is
/// a structure error.
pub fn data_rows<'a>(document: &'a Html, schema: &TableSchema) -> Result<Vec<ElementRef<'a>>> {
    let table = find_table(document, schema).ok_or_else(|| ScraperError::Structure {
        message: format!("{} table not found", schema.label),
    })?;
    Ok(table.select(&TR).skip(schema.skip_rows).collect())
}

/// Positional cell of a data row.
pub fn cell<'a>(row: &ElementRef<'a>, index: usize, schema: &TableSchema) -> Result<ElementRef<'a>> {
    row.select(&TD).nth(index).ok_or_else(|| ScraperError::Structure {
        message: format!("{} row is missing cell {}", schema.label, index),
    })
}

/// Trimmed visible text of a positional cell.
pub fn cell_text(row: &ElementRef, index: usize, schema: &TableSchema) -> Result<String> {
    Ok(cell(row, index, schema)?
        .text()
        .collect::<String>()
        .trim()
        .to_string())
}

/// Parse a currency cell like `$1,234.56`. Thousands separators and a
/// leading dollar sign are stripped; anything that still fails to parse
/// (dash placeholders, empty cells) yields `None` rather than an error.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    let cleaned = cleaned.strip_prefix('$').unwrap_or(&cleaned);
    cleaned.parse::<f64>().ok()
}

/// Split a payment row's combined `"SESSION, QUARTER N"` label into its
/// session and quarter parts. A label without the separator keeps the
/// whole text as the session.
pub fn split_session_quarter(label: &str) -> (Option<String>, Option<String>) {
    match label.split_once(", QUARTER ") {
        Some((session, quarter)) => (Some(session.to_string()), Some(quarter.to_string())),
        None => (Some(label.to_string()), None),
    }
}
