pub mod data;
pub mod layout;

pub use data::*;
pub use layout::{DateStyle, FieldLayout, PRESET_NAMES};
