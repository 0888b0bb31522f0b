//! CSV row codec: one ordered list of text cells ↔ one delimited line.
//!
//! Cells are quoted only when needed (they contain the delimiter, a quote,
//! or a line break) and embedded quotes are doubled, so those characters
//! survive a round trip. Input and output are Rust strings, so non-ASCII
//! text crosses the row boundary as UTF-8 unchanged.

use convert_core::{ConvertError, Result};

/// Error message for text spanning several records where one row is expected.
pub const MULTIPLE_LINES: &str = "more than one line found for the given delimiter";

/// Encode cells as one CSV line, without a trailing line terminator.
///
/// `None` cells are written as empty cells.
pub fn encode_row(cells: &[Option<String>], delimiter: u8) -> Result<String> {
    match cells {
        [] => return Ok(String::new()),
        // A lone empty cell is quoted so it reads back as one cell, not zero
        [cell] if cell.as_deref().unwrap_or_default().is_empty() => {
            return Ok("\"\"".to_string())
        }
        _ => {}
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer
        .write_record(cells.iter().map(|cell| cell.as_deref().unwrap_or_default()))
        .map_err(|e| ConvertError::malformed(format!("Failed to write CSV row: {e}")))?;

    let bytes = writer.into_inner().map_err(|e| {
        ConvertError::malformed(format!("Failed to flush CSV row: {}", e.error()))
    })?;
    let mut row = String::from_utf8(bytes)
        .map_err(|e| ConvertError::malformed(format!("CSV row is not valid UTF-8: {e}")))?;

    if row.ends_with('\n') {
        row.pop();
    }
    Ok(row)
}

/// Decode one CSV line into its cells.
///
/// Empty input yields no cells. Input holding more than one record is
/// rejected with `MalformedInput`.
pub fn decode_row(row: &str, delimiter: u8) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(row.as_bytes());

    let mut records = reader.records();
    let cells = match records.next() {
        None => return Ok(Vec::new()),
        Some(record) => record
            .map_err(|e| ConvertError::malformed(format!("Failed to read CSV row: {e}")))?
            .iter()
            .map(str::to_string)
            .collect(),
    };

    if records.next().is_some() {
        return Err(ConvertError::malformed(MULTIPLE_LINES));
    }
    Ok(cells)
}
