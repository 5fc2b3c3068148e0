//! Test doubles for the native sensor service.
//!
//! `FakeSensorRuntime` is an in-memory sensor service: a supported-kind
//! table, listener records with their attached trampolines, failure
//! injection for the create and attach paths, and emit helpers that drive
//! events through the real C-ABI trampoline exactly the way the platform
//! would.
//!
//! Available to dependents behind the `test-support` feature.

use std::collections::{HashMap, HashSet};
use std::ffi::c_void;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use vireo_bridge::{NativeCallError, NativeHandle, NativeStatus, Trampoline, TrampolineKey};

use crate::runtime::SensorRuntime;
use crate::types::{RawAccuracyEvent, RawSensorEvent, SensorKind, MAX_VALUE_COUNT};

#[derive(Clone, Copy)]
struct ListenerRecord {
    sensor: NativeHandle,
    interval: Option<Duration>,
    event_cb: Option<(Trampoline, TrampolineKey)>,
    accuracy_cb: Option<(Trampoline, TrampolineKey)>,
}

#[derive(Default)]
struct RuntimeState {
    supported: HashSet<SensorKind>,
    counts: HashMap<SensorKind, usize>,
    listeners: HashMap<NativeHandle, ListenerRecord>,
    next_listener: usize,
    created: usize,
    destroyed: usize,
    /// Listener commands in arrival order. Queries are not logged.
    calls: Vec<String>,
    fail_next_create: Option<NativeStatus>,
    fail_next_attach: Option<NativeStatus>,
}

/// In-memory sensor service with failure injection and a command log.
#[derive(Default)]
pub struct FakeSensorRuntime {
    state: Mutex<RuntimeState>,
}

fn kind_code(kind: SensorKind) -> usize {
    match kind {
        SensorKind::Orientation => 1,
        SensorKind::Accelerometer => 2,
        SensorKind::Gyroscope => 3,
        SensorKind::Magnetometer => 4,
        SensorKind::Light => 5,
        SensorKind::Proximity => 6,
        SensorKind::Pressure => 7,
    }
}

/// Sensor handles are fabricated deterministically from kind and index, so
/// tests can name a sensor without first constructing a wrapper for it.
fn sensor_handle(kind: SensorKind, index: usize) -> NativeHandle {
    NativeHandle::from_raw(0x5E00_0000 + kind_code(kind) * 0x100 + index + 1)
        .expect("fabricated sensor handle is nonzero")
}

impl FakeSensorRuntime {
    /// A runtime carrying exactly one sensor of each listed kind.
    pub fn supporting(kinds: &[SensorKind]) -> Arc<Self> {
        let runtime = Arc::new(Self::default());
        {
            let mut state = runtime.state.lock();
            for &kind in kinds {
                state.supported.insert(kind);
                state.counts.insert(kind, 1);
            }
        }
        runtime
    }

    /// Overrides how many sensors of `kind` the fake device carries.
    pub fn set_count(&self, kind: SensorKind, count: usize) {
        let mut state = self.state.lock();
        state.supported.insert(kind);
        state.counts.insert(kind, count);
    }

    /// Makes the next `create_listener` fail with `status`.
    pub fn fail_next_create(&self, status: NativeStatus) {
        self.state.lock().fail_next_create = Some(status);
    }

    /// Makes the next attach call (either kind) fail with `status`.
    pub fn fail_next_attach(&self, status: NativeStatus) {
        self.state.lock().fail_next_attach = Some(status);
    }

    pub fn created_listeners(&self) -> usize {
        self.state.lock().created
    }

    pub fn destroyed_listeners(&self) -> usize {
        self.state.lock().destroyed
    }

    /// Listeners currently alive.
    pub fn live_listeners(&self) -> usize {
        self.state.lock().listeners.len()
    }

    /// Listener commands in arrival order, failures included.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// The interval applied to the listener bound to `sensor`, if one is
    /// alive.
    pub fn listener_interval(&self, sensor: NativeHandle) -> Option<Duration> {
        let state = self.state.lock();
        state
            .listeners
            .values()
            .find(|record| record.sensor == sensor)
            .and_then(|record| record.interval)
    }

    /// Delivers a data event for the `index`-th sensor of `kind` through
    /// the attached trampoline, the way the platform would: the raw event
    /// lives on this stack frame for exactly the duration of the dispatch.
    /// Returns `false` when no listener has a data callback attached.
    pub fn emit_sample(
        &self,
        kind: SensorKind,
        index: usize,
        values: &[f32],
        timestamp_us: u64,
    ) -> bool {
        let Some((trampoline, key)) = self.attached_callback(kind, index, false) else {
            return false;
        };
        let mut slots = [0.0f32; MAX_VALUE_COUNT];
        let count = values.len().min(MAX_VALUE_COUNT);
        slots[..count].copy_from_slice(&values[..count]);
        let raw = RawSensorEvent {
            timestamp_us,
            accuracy: 2,
            value_count: count as u32,
            values: slots,
        };
        // SAFETY: trampoline and key were captured from a real attach; the
        // payload points at a live RawSensorEvent for the whole call.
        unsafe { trampoline(&raw as *const RawSensorEvent as *const c_void, key.as_context()) };
        true
    }

    /// Delivers an accuracy-change event. Returns `false` when no listener
    /// has an accuracy callback attached.
    pub fn emit_accuracy(
        &self,
        kind: SensorKind,
        index: usize,
        accuracy: i32,
        timestamp_us: u64,
    ) -> bool {
        let Some((trampoline, key)) = self.attached_callback(kind, index, true) else {
            return false;
        };
        let raw = RawAccuracyEvent {
            timestamp_us,
            accuracy,
        };
        // SAFETY: same contract as emit_sample.
        unsafe {
            trampoline(
                &raw as *const RawAccuracyEvent as *const c_void,
                key.as_context(),
            )
        };
        true
    }

    fn attached_callback(
        &self,
        kind: SensorKind,
        index: usize,
        accuracy: bool,
    ) -> Option<(Trampoline, TrampolineKey)> {
        let sensor = sensor_handle(kind, index);
        let state = self.state.lock();
        state
            .listeners
            .values()
            .filter(|record| record.sensor == sensor)
            .find_map(|record| {
                if accuracy {
                    record.accuracy_cb
                } else {
                    record.event_cb
                }
            })
        // The lock drops here; the trampoline runs unlocked so subscribers
        // may call back into the runtime.
    }
}

impl SensorRuntime for FakeSensorRuntime {
    fn is_supported(&self, kind: SensorKind) -> Result<bool, NativeCallError> {
        Ok(self.state.lock().supported.contains(&kind))
    }

    fn sensor_count(&self, kind: SensorKind) -> Result<usize, NativeCallError> {
        Ok(self.state.lock().counts.get(&kind).copied().unwrap_or(0))
    }

    fn default_sensor(
        &self,
        kind: SensorKind,
        index: usize,
    ) -> Result<NativeHandle, NativeCallError> {
        let state = self.state.lock();
        if !state.supported.contains(&kind) {
            return Err(NativeCallError::new(
                "default_sensor",
                NativeStatus::NOT_SUPPORTED,
            ));
        }
        if index >= state.counts.get(&kind).copied().unwrap_or(0) {
            return Err(NativeCallError::new(
                "default_sensor",
                NativeStatus::INVALID_PARAMETER,
            ));
        }
        Ok(sensor_handle(kind, index))
    }

    fn create_listener(&self, sensor: NativeHandle) -> Result<NativeHandle, NativeCallError> {
        let mut state = self.state.lock();
        state.calls.push(format!("create_listener:{sensor}"));
        if let Some(status) = state.fail_next_create.take() {
            return Err(NativeCallError::new("create_listener", status));
        }
        state.next_listener += 1;
        let listener = NativeHandle::from_raw(0x11D0_0000 + state.next_listener)
            .expect("fabricated listener handle is nonzero");
        state.listeners.insert(
            listener,
            ListenerRecord {
                sensor,
                interval: None,
                event_cb: None,
                accuracy_cb: None,
            },
        );
        state.created += 1;
        Ok(listener)
    }

    fn destroy_listener(&self, listener: NativeHandle) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state.calls.push(format!("destroy_listener:{listener}"));
        if state.listeners.remove(&listener).is_none() {
            return Err(NativeCallError::new(
                "destroy_listener",
                NativeStatus::INVALID_PARAMETER,
            ));
        }
        state.destroyed += 1;
        Ok(())
    }

    fn set_interval(
        &self,
        listener: NativeHandle,
        interval: Duration,
    ) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(format!("set_interval:{listener}:{}ms", interval.as_millis()));
        match state.listeners.get_mut(&listener) {
            Some(record) => {
                record.interval = Some(interval);
                Ok(())
            }
            None => Err(NativeCallError::new(
                "set_interval",
                NativeStatus::INVALID_PARAMETER,
            )),
        }
    }

    fn attach_event_callback(
        &self,
        listener: NativeHandle,
        trampoline: Trampoline,
        context: TrampolineKey,
    ) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state.calls.push(format!("attach_event:{listener}"));
        if let Some(status) = state.fail_next_attach.take() {
            return Err(NativeCallError::new("attach_event_callback", status));
        }
        match state.listeners.get_mut(&listener) {
            Some(record) => {
                record.event_cb = Some((trampoline, context));
                Ok(())
            }
            None => Err(NativeCallError::new(
                "attach_event_callback",
                NativeStatus::INVALID_PARAMETER,
            )),
        }
    }

    fn detach_event_callback(&self, listener: NativeHandle) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state.calls.push(format!("detach_event:{listener}"));
        if let Some(record) = state.listeners.get_mut(&listener) {
            record.event_cb = None;
        }
        Ok(())
    }

    fn attach_accuracy_callback(
        &self,
        listener: NativeHandle,
        trampoline: Trampoline,
        context: TrampolineKey,
    ) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state.calls.push(format!("attach_accuracy:{listener}"));
        if let Some(status) = state.fail_next_attach.take() {
            return Err(NativeCallError::new("attach_accuracy_callback", status));
        }
        match state.listeners.get_mut(&listener) {
            Some(record) => {
                record.accuracy_cb = Some((trampoline, context));
                Ok(())
            }
            None => Err(NativeCallError::new(
                "attach_accuracy_callback",
                NativeStatus::INVALID_PARAMETER,
            )),
        }
    }

    fn detach_accuracy_callback(&self, listener: NativeHandle) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state.calls.push(format!("detach_accuracy:{listener}"));
        if let Some(record) = state.listeners.get_mut(&listener) {
            record.accuracy_cb = None;
        }
        Ok(())
    }
}
