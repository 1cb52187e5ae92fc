pub mod dates;
pub mod pattern_scan;
pub mod payload;

pub use payload::{PayloadParser, FIELD_DELIMITER};
