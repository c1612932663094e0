//! Conversion session state and the per-request sequencing rules.
//!
//! [`ConversionSession`] is the single mutable record behind a scheduler.
//! Its methods are the only places where request sequence numbers are
//! compared, so the "latest issued wins" rule lives in one file:
//!
//! ```text
//! begin_request ──▶ Issued ──grace elapsed, still latest──▶ BusyShown
//!                     │                                        │
//!                     ├──resolve(seq == latest)────────────────┴──▶ Resolved (Current)
//!                     └──resolve(seq != latest)────────────────────▶ Resolved (Stale)
//! ```
//!
//! [`SessionSnapshot`] is what observers see: a copy taken under the
//! scheduler's lock, so it is never half-updated.

use crate::variant::ConversionVariant;

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Outcome of applying a finished request to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The request was the latest issued one; its result (if any) is shown.
    Current,
    /// A newer request was issued in the meantime; the result was dropped.
    Stale,
}

// ---------------------------------------------------------------------------
// ConversionSession
// ---------------------------------------------------------------------------

/// Mutable state of one live conversion session.
#[derive(Debug)]
pub struct ConversionSession {
    /// The latest text the user has entered.
    pub input_text: String,

    /// The chosen variant.  Holding the registry entry rather than a raw id
    /// keeps the selection valid by construction.
    pub selected: &'static ConversionVariant,

    /// The most recently accepted conversion result, or empty.
    pub output_text: String,

    /// Busy indicator, only raised once a call outlives the grace period.
    pub is_busy: bool,

    /// Sequence number of the most recently issued request.
    pub latest_request_seq: u64,

    /// Sequence number of the latest request while it is still unresolved.
    in_flight: Option<u64>,
}

impl ConversionSession {
    /// A fresh session with empty input and output.
    pub fn new(selected: &'static ConversionVariant) -> Self {
        Self {
            input_text: String::new(),
            selected,
            output_text: String::new(),
            is_busy: false,
            latest_request_seq: 0,
            in_flight: None,
        }
    }

    /// Allocate the sequence number for a request that is about to be issued.
    pub fn begin_request(&mut self) -> u64 {
        self.latest_request_seq += 1;
        self.in_flight = Some(self.latest_request_seq);
        self.latest_request_seq
    }

    /// Empty-input path: clear the output and supersede anything in flight.
    ///
    /// Advancing the sequence makes every outstanding request stale, so a
    /// late result can never refill an output the user just emptied.
    pub fn clear_output(&mut self) {
        self.latest_request_seq += 1;
        self.in_flight = None;
        self.output_text.clear();
        self.is_busy = false;
    }

    /// Grace period for request `seq` elapsed.  Raises the busy flag when
    /// `seq` is still the latest request and has not resolved yet.
    ///
    /// Returns `true` when the observable state changed.
    pub fn show_busy(&mut self, seq: u64) -> bool {
        if self.in_flight != Some(seq) || self.is_busy {
            return false;
        }
        self.is_busy = true;
        true
    }

    /// Apply the outcome of request `seq`.
    ///
    /// `converted` is `None` when the call failed; the previous output is
    /// kept in that case.  Stale resolutions leave the session untouched,
    /// including the busy flag.
    pub fn resolve(&mut self, seq: u64, converted: Option<String>) -> Resolution {
        if seq != self.latest_request_seq {
            return Resolution::Stale;
        }

        self.in_flight = None;
        self.is_busy = false;
        if let Some(text) = converted {
            self.output_text = text;
        }
        Resolution::Current
    }

    /// `true` while the latest issued request has not resolved.
    #[cfg(test)]
    fn has_request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Consistent copy of the observable fields.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            input_text: self.input_text.clone(),
            output_text: self.output_text.clone(),
            is_busy: self.is_busy,
            selected_variant_id: self.selected.id,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// Observable session state handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub input_text: String,
    pub output_text: String,
    pub is_busy: bool,
    pub selected_variant_id: &'static str,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
