use std::fmt;

use thiserror::Error;

/// Why a camera could not be handed to the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFault {
    PermissionDenied,
    NoCamera,
    Unsupported,
}

impl fmt::Display for CameraFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CameraFault::PermissionDenied => write!(f, "camera permission denied"),
            CameraFault::NoCamera => write!(f, "no camera found"),
            CameraFault::Unsupported => write!(f, "camera capture not supported"),
        }
    }
}

/// Errors raised by the payload parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed DNI payload: {0}")]
    MalformedPayload(String),
    #[error("unsupported symbol format: {0}")]
    UnsupportedSymbolFormat(String),
}

#[derive(Debug, Error)]
pub enum DniError {
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(CameraFault),
    #[error("Decoder start failure: {0}")]
    DecoderStartFailure(String),
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("Unsupported symbol format: {0}")]
    UnsupportedSymbolFormat(String),
    #[error("A scan is already in progress")]
    ScanInProgress,
    #[error("Incomplete record: {0}")]
    IncompleteRecord(String),
    #[error("No scanned record available")]
    NoRecord,
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Session error: {0}")]
    Session(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ParseError> for DniError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::MalformedPayload(msg) => DniError::MalformedPayload(msg),
            ParseError::UnsupportedSymbolFormat(msg) => DniError::UnsupportedSymbolFormat(msg),
        }
    }
}
