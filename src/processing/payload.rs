use log::{debug, info};

use crate::models::{DniRecord, FieldLayout, RecordSource, SymbolFormat};
use crate::processing::dates::birth_date_field;
use crate::processing::pattern_scan;
use crate::utils::ParseError;
use crate::validation::FieldValidator;

pub const FIELD_DELIMITER: char = '@';

/// Turns decoded barcode text into a [`DniRecord`].
///
/// Parsing is pure: the same text, format and layout always give the same
/// result, and a positional record is either fully built or rejected.
#[derive(Debug, Clone, Default)]
pub struct PayloadParser {
    layout: FieldLayout,
}

impl PayloadParser {
    pub fn new(layout: FieldLayout) -> Self {
        PayloadParser { layout }
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    pub fn parse(&self, raw: &str, format: &SymbolFormat) -> Result<DniRecord, ParseError> {
        if !format.is_supported() {
            return Err(ParseError::UnsupportedSymbolFormat(format.name().to_string()));
        }

        let fields: Vec<&str> = raw.split(FIELD_DELIMITER).collect();
        let validation = FieldValidator::validate(&fields, &self.layout);

        if validation.is_valid {
            debug!(
                "Payload matched layout '{}' with {} fields",
                self.layout.name, validation.field_count
            );
            return Ok(self.positional_record(&fields, format));
        }

        if *format == SymbolFormat::Pdf417 && self.layout.pattern_fallback {
            info!(
                "Layout '{}' did not match ({}), scanning PDF417 text",
                self.layout.name,
                validation.summary()
            );
            let record = self.scan_patterns(raw);
            if record.has_document() {
                return Ok(record);
            }
            return Err(ParseError::MalformedPayload(
                "no document number found in PDF417 text".to_string(),
            ));
        }

        Err(ParseError::MalformedPayload(validation.summary()))
    }

    /// Regex fallback over the whole text. The record may have empty fields;
    /// callers must treat an empty document number as "no document".
    pub fn scan_patterns(&self, raw: &str) -> DniRecord {
        pattern_scan::scan_record(raw, self.layout.date_style)
    }

    // Caller guarantees the fields passed validation, so every index the
    // layout reads is below the field count.
    fn positional_record(&self, fields: &[&str], format: &SymbolFormat) -> DniRecord {
        let layout = &self.layout;
        let field = |index: usize| fields.get(index).copied().unwrap_or_default().trim();

        DniRecord {
            surname: field(layout.surname).to_string(),
            given_name: field(layout.given_name).to_string(),
            document_number: field(layout.document_number).to_string(),
            nationality: layout
                .nationality
                .map(|index| field(index).to_string())
                .unwrap_or_default(),
            birth_date: birth_date_field(field(layout.birth_date), layout.date_style),
            format: format.clone(),
            source: RecordSource::Positional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::dates::restore;

    const STANDARD: &str = "PEREZ@JUAN@M@30123456@ARG@19900115@1@A@B@C";

    fn parser() -> PayloadParser {
        PayloadParser::new(FieldLayout::standard())
    }

    #[test]
    fn test_parse_standard_payload() {
        let record = parser().parse(STANDARD, &SymbolFormat::Pdf417).unwrap();
        assert_eq!(record.surname, "PEREZ");
        assert_eq!(record.given_name, "JUAN");
        assert_eq!(record.document_number, "30123456");
        assert_eq!(record.nationality, "ARG");
        assert_eq!(record.birth_date, "15/01/1990");
        assert_eq!(record.source, RecordSource::Positional);
        assert_eq!(
            restore(&record.birth_date, FieldLayout::standard().date_style).as_deref(),
            Some("19900115")
        );
    }

    #[test]
    fn test_parse_trims_edges_only() {
        let raw = "  DE LA CRUZ @ MARIA JOSE@F@ 30123456 @ARG@19900115@1@A@B@C";
        let record = parser().parse(raw, &SymbolFormat::QrCode).unwrap();
        assert_eq!(record.surname, "DE LA CRUZ");
        assert_eq!(record.given_name, "MARIA JOSE");
        assert_eq!(record.document_number, "30123456");
        assert_eq!(record.format, SymbolFormat::QrCode);
    }

    #[test]
    fn test_short_payload_is_rejected() {
        let parser = parser();
        for count in 0..10 {
            let raw = vec!["PEREZ"; count].join("@");
            let result = parser.parse(&raw, &SymbolFormat::QrCode);
            assert!(
                matches!(result, Err(ParseError::MalformedPayload(_))),
                "{} fields accepted",
                count
            );
        }
    }

    #[test]
    fn test_empty_required_field_rejects_whole_payload() {
        let raw = "@JUAN@M@30123456@ARG@19900115@1@A@B@C";
        let result = parser().parse(raw, &SymbolFormat::QrCode);
        assert!(matches!(result, Err(ParseError::MalformedPayload(_))));
    }

    #[test]
    fn test_non_compact_date_passes_through() {
        let raw = "PEREZ@JUAN@M@30123456@ARG@ 15/01/1990 @1@A@B@C";
        let record = parser().parse(raw, &SymbolFormat::QrCode).unwrap();
        assert_eq!(record.birth_date, "15/01/1990");

        let raw = "PEREZ@JUAN@M@30123456@ARG@@1@A@B@C";
        let record = parser().parse(raw, &SymbolFormat::QrCode).unwrap();
        assert_eq!(record.birth_date, "");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = parser();
        let first = parser.parse(STANDARD, &SymbolFormat::Pdf417);
        let second = parser.parse(STANDARD, &SymbolFormat::Pdf417);
        assert_eq!(first, second);

        let bad = "PEREZ@JUAN";
        assert_eq!(
            parser.parse(bad, &SymbolFormat::QrCode),
            parser.parse(bad, &SymbolFormat::QrCode)
        );
    }

    #[test]
    fn test_unsupported_format() {
        let result = parser().parse(STANDARD, &SymbolFormat::from("EAN_13"));
        assert_eq!(
            result,
            Err(ParseError::UnsupportedSymbolFormat("EAN_13".to_string()))
        );
    }

    #[test]
    fn test_pdf417_pattern_fallback() {
        let raw = "00412345678 30123456 M 19900115";
        let record = parser().parse(raw, &SymbolFormat::Pdf417).unwrap();
        assert_eq!(record.source, RecordSource::PatternScan);
        assert_eq!(record.document_number, "00412345");
        assert_eq!(record.surname, "");

        // no fallback for QR
        assert!(parser().parse(raw, &SymbolFormat::QrCode).is_err());
    }

    #[test]
    fn test_pdf417_fallback_without_document() {
        let result = parser().parse("PEREZ JUAN", &SymbolFormat::Pdf417);
        assert!(matches!(result, Err(ParseError::MalformedPayload(_))));
        assert!(!parser().scan_patterns("PEREZ JUAN").has_document());
    }

    #[test]
    fn test_tramite_layout() {
        let parser = PayloadParser::new(FieldLayout::tramite());
        let raw = "00412345678@GOMEZ@ANA@F@28999111@A@19850310@20150601";
        let record = parser.parse(raw, &SymbolFormat::QrCode).unwrap();
        assert_eq!(record.surname, "GOMEZ");
        assert_eq!(record.given_name, "ANA");
        assert_eq!(record.document_number, "28999111");
        assert_eq!(record.nationality, "");
        assert_eq!(record.birth_date, "01/06/2015");
    }

    #[test]
    fn test_standard_layout_scans_tramite_shaped_pdf417() {
        let raw = "00412345678@GOMEZ@ANA@F@28999111@A@19850310@20150601";

        // eight fields are too few for the standard layout, so the digit scan
        // takes the first run: the tramite number, not the document number
        let record = parser().parse(raw, &SymbolFormat::Pdf417).unwrap();
        assert_eq!(record.source, RecordSource::PatternScan);
        assert_eq!(record.document_number, "00412345");

        let tramite = PayloadParser::new(FieldLayout::tramite());
        let record = tramite.parse(raw, &SymbolFormat::Pdf417).unwrap();
        assert_eq!(record.source, RecordSource::Positional);
        assert_eq!(record.document_number, "28999111");
    }

    #[test]
    fn test_compact_layout() {
        let parser = PayloadParser::new(FieldLayout::compact());
        let record = parser
            .parse("PEREZ@JUAN@30123456@ARGENTINA@19900115", &SymbolFormat::QrCode)
            .unwrap();
        assert_eq!(record.nationality, "ARGENTINA");
        assert_eq!(record.birth_date, "1990-01-15");

        let result = parser.parse("PEREZ@JUAN@30123456@ARGENTINA@1990", &SymbolFormat::Pdf417);
        assert!(matches!(result, Err(ParseError::MalformedPayload(_))));
    }
}
