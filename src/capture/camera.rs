use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::DniError;

/// Which way the requested camera should face, as an "ideal" constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    Environment,
    User,
}

impl Default for FacingMode {
    fn default() -> Self {
        FacingMode::Environment
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    pub device_id: Option<String>,
    pub facing_mode: FacingMode,
}

/// A live video source. Implementations must release the device on drop
/// as well as on an explicit [`VideoStream::release`].
pub trait VideoStream: Send + Sync {
    fn label(&self) -> &str;
    fn is_live(&self) -> bool;
    /// Stops every track. Calling it twice is harmless.
    fn release(&mut self);
}

#[async_trait]
pub trait Camera: Send + Sync {
    async fn devices(&self) -> Result<Vec<CameraDevice>, DniError>;
    async fn open(&mut self, request: &StreamRequest) -> Result<Box<dyn VideoStream>, DniError>;
}

const REAR_CAMERA_HINTS: [&str; 4] = ["back", "rear", "trasera", "environment"];

/// Prefers a rear-facing device judged by its label, else the first one.
pub fn select_device(devices: &[CameraDevice]) -> Option<&CameraDevice> {
    devices
        .iter()
        .find(|device| {
            let label = device.label.to_lowercase();
            REAR_CAMERA_HINTS.iter().any(|hint| label.contains(hint))
        })
        .or_else(|| devices.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, label: &str) -> CameraDevice {
        CameraDevice {
            id: id.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_select_rear_camera() {
        let devices = vec![
            device("0", "Integrated Webcam (front)"),
            device("1", "Camera 2, facing BACK"),
        ];
        assert_eq!(select_device(&devices).map(|d| d.id.as_str()), Some("1"));
    }

    #[test]
    fn test_select_falls_back_to_first() {
        let devices = vec![device("a", "USB Camera"), device("b", "Other")];
        assert_eq!(select_device(&devices).map(|d| d.id.as_str()), Some("a"));
        assert_eq!(select_device(&[]), None);
    }
}
