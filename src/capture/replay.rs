// File-backed camera and decoder that replay a recorded decode session.
//
// Session files hold one decoder callback per line:
//
//   # comment
//   NOT_FOUND
//   ERROR<TAB>message
//   QR_CODE<TAB>payload
//   PDF_417<TAB>payload
//
// Any other first column is taken as the name of the decoded symbology.
use std::fs;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::capture::camera::{Camera, CameraDevice, StreamRequest, VideoStream};
use crate::capture::decoder::{BarcodeDecoder, DecodeEvent, DecoderOptions, EVENT_CHANNEL_CAPACITY};
use crate::models::SymbolFormat;
use crate::utils::{CameraFault, DniError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySession {
    pub events: Vec<DecodeEvent>,
}

impl ReplaySession {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DniError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, DniError> {
        let mut events = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let (kind, rest) = match line.split_once('\t') {
                Some((kind, rest)) => (kind.trim(), Some(rest)),
                None => (line.trim(), None),
            };
            let event = match (kind, rest) {
                ("NOT_FOUND", None) => DecodeEvent::NotFound,
                ("NOT_FOUND", Some(_)) => {
                    return Err(DniError::Session(format!(
                        "line {}: NOT_FOUND takes no payload",
                        number + 1
                    )))
                }
                ("ERROR", message) => DecodeEvent::Error(message.unwrap_or_default().to_string()),
                (format, Some(text)) => DecodeEvent::Decoded {
                    text: text.to_string(),
                    format: SymbolFormat::from(format),
                },
                (other, None) => {
                    return Err(DniError::Session(format!(
                        "line {}: '{}' needs a tab-separated payload",
                        number + 1,
                        other
                    )))
                }
            };
            events.push(event);
        }
        Ok(ReplaySession { events })
    }
}

pub struct ReplayStream {
    label: String,
    live: bool,
}

impl VideoStream for ReplayStream {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn release(&mut self) {
        if self.live {
            self.live = false;
            debug!("Replay stream '{}' closed", self.label);
        }
    }
}

impl Drop for ReplayStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// Camera stand-in; it can also simulate a missing or refused device.
#[derive(Debug, Clone)]
pub struct ReplayCamera {
    devices: Vec<CameraDevice>,
    fault: Option<CameraFault>,
}

impl ReplayCamera {
    pub fn new() -> Self {
        ReplayCamera {
            devices: vec![CameraDevice {
                id: "replay-0".to_string(),
                label: "Replay camera (back)".to_string(),
            }],
            fault: None,
        }
    }

    pub fn without_devices() -> Self {
        ReplayCamera {
            devices: Vec::new(),
            fault: None,
        }
    }

    pub fn refusing(fault: CameraFault) -> Self {
        ReplayCamera {
            fault: Some(fault),
            ..Self::new()
        }
    }
}

impl Default for ReplayCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Camera for ReplayCamera {
    async fn devices(&self) -> Result<Vec<CameraDevice>, DniError> {
        Ok(self.devices.clone())
    }

    async fn open(&mut self, request: &StreamRequest) -> Result<Box<dyn VideoStream>, DniError> {
        if let Some(fault) = self.fault {
            return Err(DniError::CameraUnavailable(fault));
        }
        let label = request
            .device_id
            .as_ref()
            .and_then(|id| self.devices.iter().find(|d| &d.id == id))
            .map(|d| d.label.clone())
            .ok_or(DniError::CameraUnavailable(CameraFault::NoCamera))?;
        Ok(Box::new(ReplayStream { label, live: true }))
    }
}

/// Feeds session events to the controller from a background task.
pub struct ReplayDecoder {
    session: ReplaySession,
    paced: bool,
    task: Option<JoinHandle<()>>,
}

impl ReplayDecoder {
    pub fn new(session: ReplaySession) -> Self {
        ReplayDecoder {
            session,
            paced: false,
            task: None,
        }
    }

    /// Space events one frame apart at the configured fps.
    pub fn paced(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }
}

#[async_trait]
impl BarcodeDecoder for ReplayDecoder {
    async fn start(
        &mut self,
        stream: &dyn VideoStream,
        options: &DecoderOptions,
    ) -> Result<mpsc::Receiver<DecodeEvent>, DniError> {
        if !stream.is_live() {
            return Err(DniError::DecoderStartFailure(format!(
                "stream '{}' is not live",
                stream.label()
            )));
        }
        self.reset();

        // Symbols outside the requested families are invisible to the decoder.
        let events: Vec<DecodeEvent> = self
            .session
            .events
            .iter()
            .map(|event| match event {
                DecodeEvent::Decoded { format, .. } if !options.formats.contains(format) => {
                    DecodeEvent::NotFound
                }
                other => other.clone(),
            })
            .collect();
        let frame = if self.paced {
            Some(Duration::from_millis(1000 / u64::from(options.fps.max(1))))
        } else {
            None
        };

        info!(
            "Replaying {} decoder events on '{}'",
            events.len(),
            stream.label()
        );
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        self.task = Some(tokio::spawn(async move {
            for event in events {
                if let Some(frame) = frame {
                    tokio::time::sleep(frame).await;
                }
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }));
        Ok(rx)
    }

    fn reset(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ReplayDecoder {
    fn drop(&mut self) {
        self.reset();
    }
}
