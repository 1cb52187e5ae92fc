use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Barcode symbology reported by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SymbolFormat {
    QrCode,
    Pdf417,
    Other(String),
}

impl SymbolFormat {
    pub fn name(&self) -> &str {
        match self {
            SymbolFormat::QrCode => "QR_CODE",
            SymbolFormat::Pdf417 => "PDF_417",
            SymbolFormat::Other(name) => name,
        }
    }

    /// Families the DNI reader understands.
    pub fn is_supported(&self) -> bool {
        !matches!(self, SymbolFormat::Other(_))
    }
}

impl From<&str> for SymbolFormat {
    fn from(name: &str) -> Self {
        let normalized = name.trim().to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "QR" | "QR_CODE" | "QRCODE" => SymbolFormat::QrCode,
            "PDF417" | "PDF_417" => SymbolFormat::Pdf417,
            _ => SymbolFormat::Other(normalized),
        }
    }
}

impl From<String> for SymbolFormat {
    fn from(name: String) -> Self {
        SymbolFormat::from(name.as_str())
    }
}

impl From<SymbolFormat> for String {
    fn from(format: SymbolFormat) -> Self {
        format.name().to_string()
    }
}

impl fmt::Display for SymbolFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How the fields of a record were located in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Positional,
    PatternScan,
}

/// Personal data read from one DNI barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DniRecord {
    pub surname: String,
    pub given_name: String,
    pub document_number: String,
    pub nationality: String,
    pub birth_date: String,
    pub format: SymbolFormat,
    pub source: RecordSource,
}

impl DniRecord {
    pub fn has_document(&self) -> bool {
        !self.document_number.is_empty()
    }

    /// All five personal fields carry a value.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.surname.is_empty() {
            missing.push("surname");
        }
        if self.given_name.is_empty() {
            missing.push("given_name");
        }
        if self.document_number.is_empty() {
            missing.push("document_number");
        }
        if self.nationality.is_empty() {
            missing.push("nationality");
        }
        if self.birth_date.is_empty() {
            missing.push("birth_date");
        }
        missing
    }

    /// Calendar date of birth, when the birth date was reformatted into a
    /// real date.
    pub fn birth_date_naive(&self) -> Option<NaiveDate> {
        ["%d/%m/%Y", "%Y-%m-%d"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&self.birth_date, fmt).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub issue_type: ValidationIssueType,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssueType {
    FieldCount,
    MissingField,
    DateFormat,
}

#[derive(Debug, Clone)]
pub struct FieldValidationResult {
    pub is_valid: bool,
    pub field_count: usize,
    pub issues: Vec<ValidationIssue>,
}

impl FieldValidationResult {
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|issue| issue.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DniRecord {
        DniRecord {
            surname: "PEREZ".to_string(),
            given_name: "JUAN".to_string(),
            document_number: "30123456".to_string(),
            nationality: "ARG".to_string(),
            birth_date: "15/01/1990".to_string(),
            format: SymbolFormat::Pdf417,
            source: RecordSource::Positional,
        }
    }

    #[test]
    fn test_symbol_format_names() {
        assert_eq!(SymbolFormat::from("qr"), SymbolFormat::QrCode);
        assert_eq!(SymbolFormat::from("PDF_417"), SymbolFormat::Pdf417);
        assert_eq!(SymbolFormat::from("pdf417"), SymbolFormat::Pdf417);
        assert_eq!(
            SymbolFormat::from("ean-13"),
            SymbolFormat::Other("EAN_13".to_string())
        );
        assert!(!SymbolFormat::from("EAN_13").is_supported());
    }

    #[test]
    fn test_symbol_format_serde() {
        let json = serde_json::to_string(&SymbolFormat::Pdf417).unwrap();
        assert_eq!(json, "\"PDF_417\"");
        let format: SymbolFormat = serde_json::from_str("\"QR_CODE\"").unwrap();
        assert_eq!(format, SymbolFormat::QrCode);
    }

    #[test]
    fn test_missing_fields() {
        let mut rec = record();
        assert!(rec.is_complete());
        rec.nationality.clear();
        assert_eq!(rec.missing_fields(), vec!["nationality"]);
        assert!(rec.has_document());
    }

    #[test]
    fn test_birth_date_naive() {
        let mut rec = record();
        assert_eq!(rec.birth_date_naive(), NaiveDate::from_ymd_opt(1990, 1, 15));
        rec.birth_date = "1990-01-15".to_string();
        assert_eq!(rec.birth_date_naive(), NaiveDate::from_ymd_opt(1990, 1, 15));
        rec.birth_date = "sin fecha".to_string();
        assert_eq!(rec.birth_date_naive(), None);
    }
}
