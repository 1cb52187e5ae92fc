use crate::models::{FieldLayout, FieldValidationResult, ValidationIssue, ValidationIssueType};
use crate::processing::dates::is_compact_date;

pub struct FieldValidator;

impl FieldValidator {
    /// Structural check of split payload fields against a layout.
    ///
    /// Only presence and position are checked; values are never interpreted.
    pub fn validate(fields: &[&str], layout: &FieldLayout) -> FieldValidationResult {
        let mut issues = Vec::new();

        if fields.len() < layout.min_fields {
            issues.push(ValidationIssue {
                issue_type: ValidationIssueType::FieldCount,
                message: format!(
                    "Expected at least {} fields, found {}",
                    layout.min_fields,
                    fields.len()
                ),
            });
        }

        for &index in &layout.required {
            let present = fields
                .get(index)
                .map(|value| !value.trim().is_empty())
                .unwrap_or(false);
            if !present {
                issues.push(ValidationIssue {
                    issue_type: ValidationIssueType::MissingField,
                    message: format!("Required field {} is empty", index),
                });
            }
        }

        if layout.strict_birth_date {
            let date_ok = fields
                .get(layout.birth_date)
                .map(|value| is_compact_date(value))
                .unwrap_or(false);
            if !date_ok {
                issues.push(ValidationIssue {
                    issue_type: ValidationIssueType::DateFormat,
                    message: format!("Field {} is not an 8-digit date", layout.birth_date),
                });
            }
        }

        FieldValidationResult {
            is_valid: issues.is_empty(),
            field_count: fields.len(),
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(raw: &str) -> Vec<&str> {
        raw.split('@').collect()
    }

    #[test]
    fn test_valid_standard_payload() {
        let fields = split("PEREZ@JUAN@M@30123456@ARG@19900115@1@A@B@C");
        let result = FieldValidator::validate(&fields, &FieldLayout::standard());
        assert!(result.is_valid);
        assert_eq!(result.field_count, 10);
    }

    #[test]
    fn test_too_few_fields() {
        let fields = split("PEREZ@JUAN@M@30123456");
        let result = FieldValidator::validate(&fields, &FieldLayout::standard());
        assert!(!result.is_valid);
        assert_eq!(result.issues[0].issue_type, ValidationIssueType::FieldCount);
    }

    #[test]
    fn test_whitespace_only_required_field() {
        let fields = split("   @JUAN@M@30123456@ARG@19900115@1@A@B@C");
        let result = FieldValidator::validate(&fields, &FieldLayout::standard());
        assert!(!result.is_valid);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].issue_type, ValidationIssueType::MissingField);
        assert_eq!(result.summary(), "Required field 0 is empty");
    }

    #[test]
    fn test_internal_whitespace_is_accepted() {
        let fields = split("DE LA CRUZ@MARIA JOSE@F@30123456@ARG@19900115@1@A@B@C");
        assert!(FieldValidator::validate(&fields, &FieldLayout::standard()).is_valid);
    }

    #[test]
    fn test_strict_birth_date() {
        let layout = FieldLayout::compact();
        let ok = split("PEREZ@JUAN@30123456@ARG@19900115");
        assert!(FieldValidator::validate(&ok, &layout).is_valid);

        let bad = split("PEREZ@JUAN@30123456@ARG@15-01-1990");
        let result = FieldValidator::validate(&bad, &layout);
        assert!(!result.is_valid);
        assert_eq!(result.issues[0].issue_type, ValidationIssueType::DateFormat);
    }
}
