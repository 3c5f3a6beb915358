//! Advisory Response Validation
//!
//! Defensive parsing of model output. A payload that cannot be salvaged is a
//! `ParseError`, never a panic.

mod json_repair;
mod labelled;

pub use json_repair::{JsonRepairer, extract_json_from_response};
pub use labelled::{LabelledFields, parse_labelled};
