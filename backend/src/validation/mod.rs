//! Input validation for request payloads and webhook path parameters.

pub mod rules;

pub use validator::Validate;
