use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::capture::camera::VideoStream;
use crate::models::SymbolFormat;
use crate::utils::DniError;

pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// One callback from the barcode decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    Decoded { text: String, format: SymbolFormat },
    /// Nothing recognisable in this frame. Not an error.
    NotFound,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanBox {
    pub width: u32,
    pub height: u32,
}

impl Default for ScanBox {
    fn default() -> Self {
        ScanBox {
            width: 250,
            height: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    pub formats: Vec<SymbolFormat>,
    pub fps: u32,
    pub scan_box: ScanBox,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            formats: vec![SymbolFormat::QrCode, SymbolFormat::Pdf417],
            fps: 10,
            scan_box: ScanBox::default(),
        }
    }
}

/// External symbol decoder attached to a video stream.
///
/// Events flow through the returned channel until [`BarcodeDecoder::reset`]
/// is called or the decoder runs dry, at which point the channel closes.
#[async_trait]
pub trait BarcodeDecoder: Send {
    async fn start(
        &mut self,
        stream: &dyn VideoStream,
        options: &DecoderOptions,
    ) -> Result<mpsc::Receiver<DecodeEvent>, DniError>;

    fn reset(&mut self);
}
