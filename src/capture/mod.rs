pub mod camera;
pub mod controller;
pub mod decoder;
pub mod display;
pub mod replay;

pub use camera::{select_device, Camera, CameraDevice, FacingMode, StreamRequest, VideoStream};
pub use controller::{CaptureController, ScanOutcome, ScanState, StopHandle};
pub use decoder::{BarcodeDecoder, DecodeEvent, DecoderOptions, ScanBox};
pub use display::{ConsoleDisplay, DisplayState, DisplaySurface, MemoryDisplay};
pub use replay::{ReplayCamera, ReplayDecoder, ReplaySession};
