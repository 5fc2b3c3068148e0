//! Test doubles for the widget toolkit boundary.
//!
//! `FakeWidgetRuntime` keeps a `(widget, signal)` connection table, records
//! calls in order, injects failures into the next connect, and replays
//! signal emissions through the real C-ABI trampoline with `emit`.
//!
//! Available to dependents behind the `test-support` feature.

use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::Arc;

use parking_lot::Mutex;

use vireo_bridge::{NativeCallError, NativeHandle, NativeStatus, SmartName, Trampoline, TrampolineKey};

use crate::runtime::WidgetRuntime;

#[derive(Default)]
struct WidgetState {
    connections: HashMap<(NativeHandle, String), (Trampoline, TrampolineKey)>,
    calls: Vec<String>,
    fail_next_connect: Option<NativeStatus>,
    connects: usize,
    disconnects: usize,
}

/// Fake widget toolkit with a connection table and failure injection.
#[derive(Default)]
pub struct FakeWidgetRuntime {
    state: Mutex<WidgetState>,
}

impl FakeWidgetRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes the next `connect` fail with `status`.
    pub fn fail_next_connect(&self, status: NativeStatus) {
        self.state.lock().fail_next_connect = Some(status);
    }

    /// Successful connect calls so far.
    pub fn connect_count(&self) -> usize {
        self.state.lock().connects
    }

    /// Successful disconnect calls so far.
    pub fn disconnect_count(&self) -> usize {
        self.state.lock().disconnects
    }

    /// Signals currently connected.
    pub fn connected_count(&self) -> usize {
        self.state.lock().connections.len()
    }

    /// Every call in arrival order, failures included.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Fires `signal` on `widget` through the connected trampoline, the way
    /// the toolkit would. Returns `false` if the signal is not connected.
    ///
    /// The runtime's own lock is released before the trampoline runs, so
    /// subscribers are free to call back into the runtime.
    pub fn emit(&self, widget: NativeHandle, signal: &str, payload: *const c_void) -> bool {
        let connected = {
            self.state
                .lock()
                .connections
                .get(&(widget, signal.to_string()))
                .copied()
        };
        match connected {
            Some((trampoline, key)) => {
                // SAFETY: the trampoline and key were captured from a real
                // connect; payload validity is the caller's contract.
                unsafe { trampoline(payload, key.as_context()) };
                true
            }
            None => false,
        }
    }
}

impl WidgetRuntime for FakeWidgetRuntime {
    fn connect(
        &self,
        widget: NativeHandle,
        signal: &SmartName,
        trampoline: Trampoline,
        context: TrampolineKey,
    ) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state.calls.push(format!("connect:{widget}:{signal}"));
        if let Some(status) = state.fail_next_connect.take() {
            return Err(NativeCallError::new("connect", status));
        }
        state
            .connections
            .insert((widget, signal.as_str().to_string()), (trampoline, context));
        state.connects += 1;
        Ok(())
    }

    fn disconnect(&self, widget: NativeHandle, signal: &SmartName) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state.calls.push(format!("disconnect:{widget}:{signal}"));
        state.connections.remove(&(widget, signal.as_str().to_string()));
        state.disconnects += 1;
        Ok(())
    }
}
