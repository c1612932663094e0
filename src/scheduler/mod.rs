//! Conversion scheduler module.
//!
//! This module turns live edits into conversion calls:
//!
//! ```text
//! set_input_text / set_selected_variant
//!        │
//!        ▼
//! ConversionScheduler  ── debounce timer ──▶ Converter::convert  (seq N)
//!        │                                         │
//!        │◀──────── resolve(N): applied only if N is still the latest
//!        ▼
//! SessionSnapshot (watch channel) ──▶ presentation layer
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hanconv_live::config::AppConfig;
//! use hanconv_live::convert::{HttpConverter, LogSink};
//! use hanconv_live::scheduler::ConversionScheduler;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let scheduler = ConversionScheduler::new(
//!         Arc::new(HttpConverter::from_config(&config.service)),
//!         Arc::new(LogSink),
//!         config.scheduler,
//!         "s2twp",
//!     )
//!     .expect("inside a tokio runtime");
//!
//!     scheduler.set_input_text("软件");
//!     tokio::time::sleep(std::time::Duration::from_millis(500)).await;
//!     println!("{}", scheduler.snapshot().output_text);
//! }
//! ```

pub mod debounce;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use debounce::DebouncePolicy;
pub use runner::{ConversionScheduler, SchedulerError};
pub use state::{ConversionSession, Resolution, SessionSnapshot};
