//! External collaborators of the scheduler.
//!
//! This module provides:
//! * [`Converter`] — async trait for the remote conversion call.
//! * [`HttpConverter`] — reqwest-backed implementation.
//! * [`ConvertError`] — error variants for conversion calls.
//! * [`DiagnosticsSink`] / [`LogSink`] — where failures and timings go.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use hanconv_live::config::ServiceConfig;
//! use hanconv_live::convert::{Converter, HttpConverter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let converter = HttpConverter::from_config(&ServiceConfig::default());
//!     let traditional = converter.convert("s2t", "汉字").await.unwrap();
//!     println!("{traditional}");
//! }
//! ```

pub mod converter;
pub mod diagnostics;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use converter::{ConvertError, Converter, HttpConverter};
pub use diagnostics::{DiagnosticsSink, LogSink};
