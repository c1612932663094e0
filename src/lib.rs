//! Live Chinese script conversion.
//!
//! Text typed by the user is converted between script variants (Simplified,
//! Traditional, regional and Japanese forms) by a remote conversion service.
//! The [`scheduler`] decides when to call it and which results to keep.

pub mod app;
pub mod config;
pub mod convert;
pub mod scheduler;
pub mod variant;
