//! The native sensor service boundary.

use std::time::Duration;

use vireo_bridge::{NativeCallError, NativeHandle, Trampoline, TrampolineKey};

use crate::types::SensorKind;

/// Models the platform's sensor service entry points.
///
/// A production implementation wraps the C sensor API one call per method;
/// the fake in [`testing`](crate::testing) records calls and replays events
/// through the real trampoline. All methods are short, synchronous, and
/// callable from any thread.
///
/// Two handle families cross this boundary and must not be mixed up:
///
/// * a **sensor handle** identifies a physical sensor and stays valid for
///   the process lifetime ([`default_sensor`](Self::default_sensor));
/// * a **listener handle** is a per-client subscription resource, created
///   by [`create_listener`](Self::create_listener) and owned by whoever
///   created it until [`destroy_listener`](Self::destroy_listener).
///
/// Callback attachment follows the trampoline convention: the runtime must
/// deliver events by invoking `trampoline(payload, context)` on its own
/// threads, where `payload` points at the kind's raw event layout for the
/// duration of the call. Implementations must not invoke the trampoline
/// synchronously from inside an attach or detach call.
pub trait SensorRuntime: Send + Sync {
    fn is_supported(&self, kind: SensorKind) -> Result<bool, NativeCallError>;

    /// How many physical sensors of `kind` the device carries.
    fn sensor_count(&self, kind: SensorKind) -> Result<usize, NativeCallError>;

    /// Resolves the sensor handle for the `index`-th sensor of `kind`.
    fn default_sensor(&self, kind: SensorKind, index: usize)
        -> Result<NativeHandle, NativeCallError>;

    fn create_listener(&self, sensor: NativeHandle) -> Result<NativeHandle, NativeCallError>;

    fn destroy_listener(&self, listener: NativeHandle) -> Result<(), NativeCallError>;

    /// Sets the delivery interval for data events on a live listener.
    fn set_interval(
        &self,
        listener: NativeHandle,
        interval: Duration,
    ) -> Result<(), NativeCallError>;

    fn attach_event_callback(
        &self,
        listener: NativeHandle,
        trampoline: Trampoline,
        context: TrampolineKey,
    ) -> Result<(), NativeCallError>;

    fn detach_event_callback(&self, listener: NativeHandle) -> Result<(), NativeCallError>;

    fn attach_accuracy_callback(
        &self,
        listener: NativeHandle,
        trampoline: Trampoline,
        context: TrampolineKey,
    ) -> Result<(), NativeCallError>;

    fn detach_accuracy_callback(&self, listener: NativeHandle) -> Result<(), NativeCallError>;
}
