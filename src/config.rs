use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::capture::camera::FacingMode;
use crate::capture::decoder::{DecoderOptions, ScanBox};
use crate::models::{FieldLayout, SymbolFormat};
use crate::submission::FormSubmission;
use crate::utils::DniError;

/// A preset name or a full inline layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutSetting {
    Preset(String),
    Custom(FieldLayout),
}

impl LayoutSetting {
    pub fn resolve(&self) -> Result<FieldLayout, DniError> {
        let layout = match self {
            LayoutSetting::Preset(name) => FieldLayout::preset(name)?,
            LayoutSetting::Custom(layout) => layout.clone(),
        };
        layout.check()?;
        Ok(layout)
    }
}

impl Default for LayoutSetting {
    fn default() -> Self {
        LayoutSetting::Preset("standard".to_string())
    }
}

fn default_formats() -> Vec<SymbolFormat> {
    vec![SymbolFormat::QrCode, SymbolFormat::Pdf417]
}

fn default_fps() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub layout: LayoutSetting,
    #[serde(default = "default_formats")]
    pub formats: Vec<SymbolFormat>,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub scan_box: ScanBox,
    #[serde(default)]
    pub facing_mode: FacingMode,
    #[serde(default)]
    pub form: FormSubmission,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            layout: LayoutSetting::default(),
            formats: default_formats(),
            fps: default_fps(),
            scan_box: ScanBox::default(),
            facing_mode: FacingMode::default(),
            form: FormSubmission::default(),
        }
    }
}

impl ScannerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DniError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            DniError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&text)?;
        info!("Loaded scanner configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, DniError> {
        let config: ScannerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DniError> {
        self.layout.resolve()?;
        if self.formats.is_empty() {
            return Err(DniError::Config("At least one symbol format is required".to_string()));
        }
        if self.fps == 0 {
            return Err(DniError::Config("fps must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn decoder_options(&self) -> DecoderOptions {
        DecoderOptions {
            formats: self.formats.clone(),
            fps: self.fps,
            scan_box: self.scan_box,
        }
    }
}
