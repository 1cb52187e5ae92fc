// Digit-run extraction for PDF417 payloads whose fields do not line up
// with any positional layout.
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::{DateStyle, DniRecord, RecordSource, SymbolFormat};
use crate::processing::dates::reformat;

lazy_static! {
    static ref DOCUMENT_NUMBER_PATTERN: Regex = Regex::new(r"([0-9]{7,8})").unwrap();
    // YYYYMMDD starting with 1 or 2
    static ref BIRTH_DATE_PATTERN: Regex = Regex::new(r"([1-2][0-9]{7})").unwrap();
}

pub fn find_document_number(text: &str) -> Option<&str> {
    DOCUMENT_NUMBER_PATTERN
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

pub fn find_birth_date(text: &str) -> Option<&str> {
    BIRTH_DATE_PATTERN
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Builds a record from the two independent scans. Fields that could not be
/// found stay empty; names and nationality are never recovered this way.
pub fn scan_record(text: &str, style: DateStyle) -> DniRecord {
    let document_number = find_document_number(text).unwrap_or_default().to_string();
    let birth_date = find_birth_date(text)
        .and_then(|date| reformat(date, style))
        .unwrap_or_default();

    debug!(
        "Pattern scan found document={} birth_date={}",
        !document_number.is_empty(),
        !birth_date.is_empty()
    );

    DniRecord {
        surname: String::new(),
        given_name: String::new(),
        document_number,
        nationality: String::new(),
        birth_date,
        format: SymbolFormat::Pdf417,
        source: RecordSource::PatternScan,
    }
}
