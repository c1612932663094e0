//! Conversion scheduler: turns a stream of edits into ordered, debounced
//! conversion calls.
//!
//! [`ConversionScheduler`] owns the [`ConversionSession`] and reacts to
//! [`set_input_text`](ConversionScheduler::set_input_text) and
//! [`set_selected_variant`](ConversionScheduler::set_selected_variant).
//!
//! # Request flow
//!
//! ```text
//! edit / reselect
//!   └─▶ abort pending debounce timer
//!         ├─ input empty → clear output now, supersede in-flight requests
//!         └─ spawn debounce timer (10 / 50 / 200 ms by input length)
//!               └─▶ seq = latest + 1, spawn request task
//!                     ├─ spawn grace timer (150 ms) → busy if seq still latest
//!                     └─ converter.convert(variant, text).await
//!                           ├─ seq == latest → apply (Ok) / report (Err), clear busy
//!                           └─ seq != latest → drop
//! ```
//!
//! The two timers are independent tokio tasks.  Outstanding calls are never
//! aborted; superseded ones finish and are discarded by the sequence check.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::SchedulerConfig;
use crate::convert::{Converter, DiagnosticsSink};
use crate::variant::{self, ConversionVariant};

use super::debounce::DebouncePolicy;
use super::state::{ConversionSession, Resolution, SessionSnapshot};

// ---------------------------------------------------------------------------
// SchedulerError
// ---------------------------------------------------------------------------

/// Errors raised while constructing a scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Timers and calls are spawned on tokio; there has to be a runtime.
    #[error("the conversion scheduler must be created inside a tokio runtime")]
    NoRuntime,
}

// ---------------------------------------------------------------------------
// ConversionScheduler
// ---------------------------------------------------------------------------

/// Debounced, sequence-stamped driver for the conversion service.
///
/// Setters never block and never fail; results and busy changes arrive
/// later through [`snapshot`](Self::snapshot) and [`subscribe`](Self::subscribe).
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use hanconv_live::config::AppConfig;
/// use hanconv_live::convert::{HttpConverter, LogSink};
/// use hanconv_live::scheduler::ConversionScheduler;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let scheduler = ConversionScheduler::new(
///     Arc::new(HttpConverter::from_config(&config.service)),
///     Arc::new(LogSink),
///     config.scheduler.clone(),
///     &config.conversion.variant,
/// )
/// .unwrap();
///
/// let mut changes = scheduler.subscribe();
/// scheduler.set_input_text("汉字");
/// while changes.changed().await.is_ok() {
///     println!("{}", changes.borrow().output_text);
/// }
/// # }
/// ```
pub struct ConversionScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    slot: Mutex<Slot>,
    converter: Arc<dyn Converter>,
    sink: Arc<dyn DiagnosticsSink>,
    policy: DebouncePolicy,
    runtime: Handle,
    changes: watch::Sender<SessionSnapshot>,
}

/// Everything guarded by the scheduler lock.
struct Slot {
    session: ConversionSession,
    /// Bumped on every re-evaluation; a debounce timer only fires if its
    /// generation is still current.
    debounce_gen: u64,
    debounce: Option<JoinHandle<()>>,
}

impl ConversionScheduler {
    /// Create a scheduler on the current tokio runtime.
    ///
    /// `initial_variant` falls back to [`variant::DEFAULT_VARIANT_ID`] when
    /// it is not a registered id.
    pub fn new(
        converter: Arc<dyn Converter>,
        sink: Arc<dyn DiagnosticsSink>,
        config: SchedulerConfig,
        initial_variant: &str,
    ) -> Result<Self, SchedulerError> {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        Ok(Self::with_handle(
            runtime,
            converter,
            sink,
            config,
            initial_variant,
        ))
    }

    /// Create a scheduler that spawns onto `runtime`.  The setters may then
    /// be called from any thread, e.g. a UI thread outside the runtime.
    pub fn with_handle(
        runtime: Handle,
        converter: Arc<dyn Converter>,
        sink: Arc<dyn DiagnosticsSink>,
        config: SchedulerConfig,
        initial_variant: &str,
    ) -> Self {
        let selected = variant::lookup(initial_variant).unwrap_or_else(|| {
            log::warn!(
                "unknown conversion variant {initial_variant:?}; using {}",
                variant::DEFAULT_VARIANT_ID
            );
            variant::default_variant()
        });

        let session = ConversionSession::new(selected);
        let (changes, _) = watch::channel(session.snapshot());

        Self {
            inner: Arc::new(Inner {
                slot: Mutex::new(Slot {
                    session,
                    debounce_gen: 0,
                    debounce: None,
                }),
                converter,
                sink,
                policy: DebouncePolicy::new(config),
                runtime,
                changes,
            }),
        }
    }

    /// Replace the input text.
    ///
    /// An empty text clears the output immediately; anything else is
    /// converted once the debounce delay passes without further edits.
    /// Setting the text it already holds does nothing.
    pub fn set_input_text(&self, text: impl Into<String>) {
        let text = text.into();
        let mut slot = self.inner.lock();
        if slot.session.input_text == text {
            return;
        }

        slot.session.input_text = text;
        self.inner.reevaluate(&mut slot);
        self.inner.publish(&slot.session);
    }

    /// Select the variant with the given id.
    ///
    /// Unknown ids and the id that is already selected are ignored.
    pub fn set_selected_variant(&self, id: &str) {
        let Some(selected) = variant::lookup(id) else {
            log::debug!("scheduler: ignoring unknown variant id {id:?}");
            return;
        };

        let mut slot = self.inner.lock();
        if slot.session.selected.id == selected.id {
            return;
        }

        slot.session.selected = selected;
        self.inner.reevaluate(&mut slot);
        self.inner.publish(&slot.session);
    }

    /// Consistent read of the observable state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().session.snapshot()
    }

    /// The currently selected registry entry.
    pub fn selected_variant(&self) -> &'static ConversionVariant {
        self.inner.lock().session.selected
    }

    /// Receive a fresh [`SessionSnapshot`] after every observable change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.changes.subscribe()
    }
}

impl Drop for ConversionScheduler {
    /// Cancel the pending debounce timer.  In-flight calls are abandoned and
    /// finish into a session nobody reads.
    fn drop(&mut self) {
        let mut slot = self.inner.lock();
        slot.debounce_gen += 1;
        if let Some(timer) = slot.debounce.take() {
            timer.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Timer and request callbacks
// ---------------------------------------------------------------------------

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, session: &ConversionSession) {
        self.changes.send_replace(session.snapshot());
    }

    /// Input or variant changed: restart the debounce timer.
    fn reevaluate(self: &Arc<Self>, slot: &mut Slot) {
        slot.debounce_gen += 1;
        if let Some(timer) = slot.debounce.take() {
            timer.abort();
        }

        if slot.session.input_text.is_empty() {
            log::debug!("scheduler: input cleared");
            slot.session.clear_output();
            return;
        }

        let gen = slot.debounce_gen;
        let delay = self.policy.delay_for(&slot.session.input_text);
        log::debug!("scheduler: debounce {}ms (gen {gen})", delay.as_millis());

        let inner = Arc::clone(self);
        slot.debounce = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            inner.debounce_elapsed(gen);
        }));
    }

    /// Debounce timer `gen` fired: issue the conversion if nothing changed
    /// since it was armed.
    fn debounce_elapsed(self: &Arc<Self>, gen: u64) {
        let mut slot = self.lock();
        if slot.debounce_gen != gen {
            return;
        }
        slot.debounce = None;
        // Empty input is cleared in `reevaluate` and never arms a timer.
        debug_assert!(!slot.session.input_text.is_empty());

        let seq = slot.session.begin_request();
        let selected = slot.session.selected;
        let text = slot.session.input_text.clone();
        drop(slot);

        let inner = Arc::clone(self);
        self.runtime
            .spawn(async move { inner.run_request(seq, selected, text).await });
    }

    async fn run_request(
        self: Arc<Self>,
        seq: u64,
        selected: &'static ConversionVariant,
        text: String,
    ) {
        let chars = text.chars().count();
        log::debug!("scheduler: request #{seq} {} ({chars} chars)", selected.id);

        let grace = {
            let inner = Arc::clone(&self);
            let wait = self.policy.busy_grace();
            self.runtime.spawn(async move {
                tokio::time::sleep(wait).await;
                inner.grace_elapsed(seq);
            })
        };

        let started = Instant::now();
        let result = self.converter.convert(selected.id, &text).await;
        let elapsed = started.elapsed();
        grace.abort();

        let (resolution, failure) = {
            let mut slot = self.lock();
            let (resolution, failure) = match result {
                Ok(converted) => (slot.session.resolve(seq, Some(converted)), None),
                Err(e) => (slot.session.resolve(seq, None), Some(e)),
            };
            if resolution == Resolution::Current {
                self.publish(&slot.session);
            }
            (resolution, failure)
        };

        match (resolution, failure) {
            (_, None) => self.sink.conversion_timed(selected.id, chars, elapsed),
            (Resolution::Current, Some(e)) => self.sink.conversion_failed(selected.id, chars, &e),
            (Resolution::Stale, Some(e)) => {
                log::debug!("scheduler: superseded request #{seq} failed: {e}");
            }
        }

        if resolution == Resolution::Stale {
            log::debug!("scheduler: dropped result of superseded request #{seq}");
        }
    }

    /// Grace timer for request `seq` fired.
    fn grace_elapsed(&self, seq: u64) {
        let mut slot = self.lock();
        if slot.session.show_busy(seq) {
            log::debug!("scheduler: request #{seq} still running, showing busy");
            self.publish(&slot.session);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
