use serde::{Deserialize, Serialize};

use crate::utils::DniError;

/// Output shape of an 8-digit `YYYYMMDD` date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStyle {
    /// `DD/MM/YYYY`
    DayMonthYear,
    /// `YYYY-MM-DD`
    Iso,
}

/// Positions of the DNI fields inside an `@`-delimited payload.
///
/// Indices are zero-based. Payload variants disagree about where each field
/// lives, so the layout is configuration rather than a constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    pub name: String,
    pub min_fields: usize,
    pub surname: usize,
    pub given_name: usize,
    pub document_number: usize,
    #[serde(default)]
    pub nationality: Option<usize>,
    pub birth_date: usize,
    /// Indices that must be non-empty after trimming.
    pub required: Vec<usize>,
    pub date_style: DateStyle,
    /// Reject the payload unless the birth date slot is exactly 8 digits.
    #[serde(default)]
    pub strict_birth_date: bool,
    /// Scan PDF417 text for digit runs when the positional layout does not match.
    #[serde(default)]
    pub pattern_fallback: bool,
}

pub const PRESET_NAMES: [&str; 3] = ["standard", "tramite", "compact"];

impl FieldLayout {
    /// `SURNAME@NAME@SEX@DOCUMENT@NATIONALITY@YYYYMMDD@...`, ten fields or more.
    pub fn standard() -> Self {
        FieldLayout {
            name: "standard".to_string(),
            min_fields: 10,
            surname: 0,
            given_name: 1,
            document_number: 3,
            nationality: Some(4),
            birth_date: 5,
            required: vec![0, 1, 3],
            date_style: DateStyle::DayMonthYear,
            strict_birth_date: false,
            pattern_fallback: true,
        }
    }

    /// `TRAMITE@SURNAME@NAME@SEX@DOCUMENT@...` with the date in slot 7.
    pub fn tramite() -> Self {
        FieldLayout {
            name: "tramite".to_string(),
            min_fields: 8,
            surname: 1,
            given_name: 2,
            document_number: 4,
            nationality: None,
            birth_date: 7,
            required: vec![1, 2, 3, 4],
            date_style: DateStyle::DayMonthYear,
            strict_birth_date: false,
            pattern_fallback: true,
        }
    }

    /// `SURNAME@NAME@DOCUMENT@NATIONALITY@YYYYMMDD`
    pub fn compact() -> Self {
        FieldLayout {
            name: "compact".to_string(),
            min_fields: 5,
            surname: 0,
            given_name: 1,
            document_number: 2,
            nationality: Some(3),
            birth_date: 4,
            required: vec![0, 1, 2, 3],
            date_style: DateStyle::Iso,
            strict_birth_date: true,
            pattern_fallback: false,
        }
    }

    pub fn presets() -> Vec<FieldLayout> {
        vec![Self::standard(), Self::tramite(), Self::compact()]
    }

    pub fn preset(name: &str) -> Result<FieldLayout, DniError> {
        Self::presets()
            .into_iter()
            .find(|layout| layout.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                DniError::Config(format!(
                    "No layout named '{}' (known: {})",
                    name,
                    PRESET_NAMES.join(", ")
                ))
            })
    }

    /// Every index the layout reads must fall below `min_fields`, otherwise
    /// a payload could pass validation and still miss a slot.
    pub fn check(&self) -> Result<(), DniError> {
        let mut indices = vec![
            self.surname,
            self.given_name,
            self.document_number,
            self.birth_date,
        ];
        indices.extend(self.nationality);
        indices.extend(self.required.iter().copied());

        if let Some(max) = indices.iter().copied().max() {
            if max >= self.min_fields {
                return Err(DniError::Config(format!(
                    "Layout '{}' reads field {} but only requires {} fields",
                    self.name, max, self.min_fields
                )));
            }
        }
        Ok(())
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self::standard()
    }
}
