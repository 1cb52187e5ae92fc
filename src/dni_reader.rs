use log::info;
use url::Url;

use crate::config::ScannerConfig;
use crate::models::{DniRecord, FieldValidationResult, SymbolFormat};
use crate::processing::{PayloadParser, FIELD_DELIMITER};
use crate::submission::FormSubmission;
use crate::utils::DniError;
use crate::validation::FieldValidator;

/// Entry point for reading already-decoded DNI payloads without a camera.
pub struct DniReader {
    parser: PayloadParser,
    form: FormSubmission,
}

impl DniReader {
    pub fn new() -> Self {
        DniReader {
            parser: PayloadParser::default(),
            form: FormSubmission::default(),
        }
    }

    pub fn from_config(config: &ScannerConfig) -> Result<Self, DniError> {
        config.validate()?;
        Ok(DniReader {
            parser: PayloadParser::new(config.layout.resolve()?),
            form: config.form.clone(),
        })
    }

    // Main read function: parse the payload into a record
    pub fn read(&self, raw: &str, format: &SymbolFormat) -> Result<DniRecord, DniError> {
        let record = self.parser.parse(raw, format)?;
        info!(
            "Read DNI {} from {} payload ({:?})",
            record.document_number, format, record.source
        );
        Ok(record)
    }

    /// Structural check only, for explaining why a payload was rejected.
    pub fn inspect(&self, raw: &str) -> FieldValidationResult {
        let fields: Vec<&str> = raw.split(FIELD_DELIMITER).collect();
        FieldValidator::validate(&fields, self.parser.layout())
    }

    pub fn submission_url(&self, record: &DniRecord) -> Result<Url, DniError> {
        self.form.prefilled_url(record)
    }
}

impl Default for DniReader {
    fn default() -> Self {
        Self::new()
    }
}
