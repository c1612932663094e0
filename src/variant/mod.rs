//! Variant registry: the fixed catalogue of script conversions.
//!
//! Read-only after startup.  An id that does not resolve here is never an
//! error; callers simply keep their previous selection.

pub mod catalog;

pub use catalog::{default_variant, list, lookup, ConversionVariant, DEFAULT_VARIANT_ID, VARIANTS};
