//! Outward reporting of conversion failures and per-call timing.
//!
//! The scheduler never shows errors to the user itself; it hands them to a
//! [`DiagnosticsSink`].  [`LogSink`] forwards everything to the `log` facade.

use std::time::Duration;

use crate::convert::ConvertError;

/// Receives diagnostics from the conversion scheduler.
///
/// Called from tokio tasks, so implementors must be `Send + Sync` and must
/// not block.
pub trait DiagnosticsSink: Send + Sync {
    /// A conversion for the current input failed.  The previous output is
    /// still on screen.
    fn conversion_failed(&self, variant_id: &str, chars: usize, error: &ConvertError);

    /// A conversion call finished (successfully), whether or not its result
    /// was still wanted.
    fn conversion_timed(&self, variant_id: &str, chars: usize, elapsed: Duration);
}

/// Default sink: failures at `warn`, timings at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn conversion_failed(&self, variant_id: &str, chars: usize, error: &ConvertError) {
        log::warn!("conversion {variant_id} of {chars} chars failed: {error}");
    }

    fn conversion_timed(&self, variant_id: &str, chars: usize, elapsed: Duration) {
        log::debug!(
            "conversion {variant_id} of {chars} chars took {:.2}ms",
            elapsed.as_secs_f64() * 1_000.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_sink_is_object_safe() {
        let sink: Box<dyn DiagnosticsSink> = Box::new(LogSink);
        sink.conversion_failed("s2t", 2, &ConvertError::Timeout);
        sink.conversion_timed("s2t", 2, Duration::from_millis(3));
    }
}
