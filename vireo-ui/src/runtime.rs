//! The widget toolkit's signal boundary.

use std::sync::Arc;

use vireo_bridge::{
    EventHook, EventKind, EventSource, NativeCallError, NativeHandle, NativeStatus, SmartName,
    Trampoline, TrampolineKey,
};

/// Models the toolkit's smart-signal entry points.
///
/// One `connect` installs one callback for one named signal on one widget;
/// the toolkit delivers by invoking `trampoline(payload, context)` on its
/// own thread. Item signals pass the item handle as the payload pointer,
/// notification signals pass null. `disconnect` must tolerate signals that
/// were never connected.
pub trait WidgetRuntime: Send + Sync {
    fn connect(
        &self,
        widget: NativeHandle,
        signal: &SmartName,
        trampoline: Trampoline,
        context: TrampolineKey,
    ) -> Result<(), NativeCallError>;

    fn disconnect(&self, widget: NativeHandle, signal: &SmartName) -> Result<(), NativeCallError>;
}

/// Adapts a [`WidgetRuntime`] to the bridge's [`EventHook`] contract for
/// `Smart` sources. Sensor-kinded sources are a caller bug and are refused.
pub(crate) struct SignalHook {
    runtime: Arc<dyn WidgetRuntime>,
}

impl SignalHook {
    pub(crate) fn new(runtime: Arc<dyn WidgetRuntime>) -> Self {
        SignalHook { runtime }
    }
}

impl EventHook for SignalHook {
    fn subscribe(
        &self,
        source: &EventSource,
        trampoline: Trampoline,
        context: TrampolineKey,
    ) -> Result<(), NativeCallError> {
        match source.kind() {
            EventKind::Smart(name) => self
                .runtime
                .connect(source.handle(), name, trampoline, context),
            _ => Err(NativeCallError::new(
                "connect",
                NativeStatus::INVALID_PARAMETER,
            )),
        }
    }

    fn unsubscribe(&self, source: &EventSource) -> Result<(), NativeCallError> {
        match source.kind() {
            EventKind::Smart(name) => self.runtime.disconnect(source.handle(), name),
            _ => Ok(()),
        }
    }
}
