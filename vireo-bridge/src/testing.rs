//! Test doubles for the native boundary.
//!
//! `RecordingHook` stands in for a native registration surface: it stores
//! the trampoline and key a bridge installs, records every call in order,
//! and can replay events through the real C-ABI trampoline with `emit`. The
//! next subscribe or unsubscribe can be made to fail with a chosen status,
//! which is how rollback paths get exercised.
//!
//! Available to dependents behind the `test-support` feature.

use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ProjectionError;
use crate::hook::EventHook;
use crate::payload::RawPayload;
use crate::projection::PayloadProjection;
use crate::registry::{Trampoline, TrampolineKey};
use crate::source::EventSource;
use crate::status::{NativeCallError, NativeStatus};

/// Projection for payload-less events, handy wherever a test only cares
/// about delivery and ordering.
pub struct NoopProjection;

impl PayloadProjection for NoopProjection {
    type Args = ();

    fn project(&self, _payload: RawPayload) -> Result<(), ProjectionError> {
        Ok(())
    }
}

#[derive(Default)]
struct HookState {
    installed: HashMap<EventSource, (Trampoline, TrampolineKey)>,
    calls: Vec<String>,
    fail_next_subscribe: Option<NativeStatus>,
    fail_next_unsubscribe: Option<NativeStatus>,
    subscribes: usize,
    unsubscribes: usize,
}

/// Fake native registration surface with failure injection and a call log.
#[derive(Default)]
pub struct RecordingHook {
    state: Mutex<HookState>,
}

impl RecordingHook {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes the next `subscribe` fail with `status`.
    pub fn fail_next_subscribe(&self, status: NativeStatus) {
        self.state.lock().fail_next_subscribe = Some(status);
    }

    /// Makes the next `unsubscribe` fail with `status`.
    pub fn fail_next_unsubscribe(&self, status: NativeStatus) {
        self.state.lock().fail_next_unsubscribe = Some(status);
    }

    /// Successful subscribe calls so far.
    pub fn subscribe_count(&self) -> usize {
        self.state.lock().subscribes
    }

    /// Successful unsubscribe calls so far.
    pub fn unsubscribe_count(&self) -> usize {
        self.state.lock().unsubscribes
    }

    /// Sources with a trampoline currently installed.
    pub fn installed_count(&self) -> usize {
        self.state.lock().installed.len()
    }

    /// Every call in arrival order, failures included.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Fires the installed trampoline for `source` with `payload`, the way
    /// the native side would. Returns `false` if nothing is installed.
    ///
    /// The hook's own lock is released before the trampoline runs, so
    /// subscribers are free to call back into the hook.
    pub fn emit(&self, source: &EventSource, payload: *const c_void) -> bool {
        let installed = { self.state.lock().installed.get(source).copied() };
        match installed {
            Some((trampoline, key)) => {
                // SAFETY: the trampoline and key were captured from a real
                // registration; payload validity is the caller's contract.
                unsafe { trampoline(payload, key.as_context()) };
                true
            }
            None => false,
        }
    }
}

impl EventHook for RecordingHook {
    fn subscribe(
        &self,
        source: &EventSource,
        trampoline: Trampoline,
        context: TrampolineKey,
    ) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state.calls.push(format!("subscribe:{}", source));
        if let Some(status) = state.fail_next_subscribe.take() {
            return Err(NativeCallError::new("subscribe", status));
        }
        state.installed.insert(source.clone(), (trampoline, context));
        state.subscribes += 1;
        Ok(())
    }

    fn unsubscribe(&self, source: &EventSource) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state.calls.push(format!("unsubscribe:{}", source));
        if let Some(status) = state.fail_next_unsubscribe.take() {
            return Err(NativeCallError::new("unsubscribe", status));
        }
        state.installed.remove(source);
        state.unsubscribes += 1;
        Ok(())
    }
}
