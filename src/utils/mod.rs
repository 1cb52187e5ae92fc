pub mod error;

pub use error::{CameraFault, DniError, ParseError};
