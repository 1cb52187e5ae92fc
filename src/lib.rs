pub mod capture;
pub mod config;
pub mod dni_reader;
pub mod models;
pub mod processing;
pub mod submission;
pub mod utils;
pub mod validation;

pub use config::ScannerConfig;
pub use dni_reader::DniReader;
pub use utils::{DniError, ParseError};
