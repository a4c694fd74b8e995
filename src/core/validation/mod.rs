//! Request validation
//!
//! Request DTOs derive [`validator::Validate`]; the [`ValidatedJson`]
//! extractor decodes and validates them in one step so handlers only ever
//! see well-formed input.

pub mod extractor;
pub mod validators;

pub use extractor::ValidatedJson;
