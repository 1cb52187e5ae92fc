use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::DniRecord;
use crate::utils::DniError;

const DEFAULT_FORM_URL: &str =
    "https://docs.google.com/forms/d/e/1nKrWnalh-FZ1J0pVYU_Ysp07k3zvkuR8ivAorhJwGGQ/viewform";

/// Query parameter name for each record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormEntries {
    pub surname: String,
    pub given_name: String,
    pub document_number: String,
    pub nationality: String,
    pub birth_date: String,
}

impl Default for FormEntries {
    fn default() -> Self {
        FormEntries {
            surname: "entry.1070769273".to_string(),
            given_name: "entry.1754481886".to_string(),
            document_number: "entry.1546660382".to_string(),
            nationality: "entry.835584076".to_string(),
            birth_date: "entry.1113672182".to_string(),
        }
    }
}

/// External form that receives a scanned record as pre-filled answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub base_url: String,
    #[serde(default)]
    pub entries: FormEntries,
}

impl Default for FormSubmission {
    fn default() -> Self {
        FormSubmission {
            base_url: DEFAULT_FORM_URL.to_string(),
            entries: FormEntries::default(),
        }
    }
}

impl FormSubmission {
    pub fn prefilled_url(&self, record: &DniRecord) -> Result<Url, DniError> {
        let missing = record.missing_fields();
        if !missing.is_empty() {
            return Err(DniError::IncompleteRecord(format!(
                "missing {}",
                missing.join(", ")
            )));
        }

        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair(&self.entries.surname, &record.surname)
            .append_pair(&self.entries.given_name, &record.given_name)
            .append_pair(&self.entries.document_number, &record.document_number)
            .append_pair(&self.entries.nationality, &record.nationality)
            .append_pair(&self.entries.birth_date, &record.birth_date);

        debug!("Built pre-filled form URL for document {}", record.document_number);
        Ok(url)
    }
}

pub fn render_json(record: &DniRecord) -> Result<String, DniError> {
    Ok(serde_json::to_string_pretty(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordSource, SymbolFormat};

    fn record() -> DniRecord {
        DniRecord {
            surname: "DE LA CRUZ".to_string(),
            given_name: "MARÍA".to_string(),
            document_number: "30123456".to_string(),
            nationality: "ARG".to_string(),
            birth_date: "15/01/1990".to_string(),
            format: SymbolFormat::QrCode,
            source: RecordSource::Positional,
        }
    }

    #[test]
    fn test_prefilled_url() {
        let url = FormSubmission::default().prefilled_url(&record()).unwrap();
        assert!(url.as_str().starts_with(DEFAULT_FORM_URL));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), 5);
        assert_eq!(
            pairs[0],
            ("entry.1070769273".to_string(), "DE LA CRUZ".to_string())
        );
        assert_eq!(pairs[1].1, "MARÍA");
        assert_eq!(pairs[4].1, "15/01/1990");
        assert!(url.as_str().contains("15%2F01%2F1990"));
    }

    #[test]
    fn test_incomplete_record_is_refused() {
        let mut rec = record();
        rec.nationality.clear();
        let err = FormSubmission::default().prefilled_url(&rec).unwrap_err();
        assert!(matches!(err, DniError::IncompleteRecord(ref msg) if msg == "missing nationality"));
    }

    #[test]
    fn test_invalid_base_url() {
        let form = FormSubmission {
            base_url: "not a url".to_string(),
            entries: FormEntries::default(),
        };
        assert!(matches!(
            form.prefilled_url(&record()),
            Err(DniError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&record()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["document_number"], "30123456");
        assert_eq!(value["format"], "QR_CODE");
        assert_eq!(value["source"], "positional");
    }
}
