//! Shared listener lifecycle behind a sensor's two event bridges.

use std::time::Duration;

use parking_lot::Mutex;

use vireo_bridge::{
    EventHook, EventKind, EventSource, NativeCallError, NativeHandle, NativeStatus, Trampoline,
    TrampolineKey,
};

use crate::runtime::SensorRuntime;
use crate::types::SensorKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Side {
    Data,
    Accuracy,
}

impl Side {
    fn of(source: &EventSource) -> Option<Side> {
        match source.kind() {
            EventKind::SensorData => Some(Side::Data),
            EventKind::SensorAccuracy => Some(Side::Accuracy),
            EventKind::Smart(_) => None,
        }
    }
}

struct ListenerState {
    /// `Some` exactly while the native listener is acquired.
    listener: Option<NativeHandle>,
    interval: Duration,
    data_attached: bool,
    accuracy_attached: bool,
}

impl ListenerState {
    fn attached(&self, side: Side) -> bool {
        match side {
            Side::Data => self.data_attached,
            Side::Accuracy => self.accuracy_attached,
        }
    }

    fn set_attached(&mut self, side: Side, value: bool) {
        match side {
            Side::Data => self.data_attached = value,
            Side::Accuracy => self.accuracy_attached = value,
        }
    }
}

/// One native listener shared by a sensor's data and accuracy bridges.
///
/// Implements [`EventHook`] for both of the sensor's event sources. The
/// bridges drive it only on their activation edges, so "subscribe" here
/// means "attach this side's native callback", acquiring the listener first
/// if neither side holds it yet. The listener is destroyed when the last
/// attached side detaches, and unconditionally by [`force_release`] on the
/// owner's dispose path.
///
/// A single lock guards the whole state, which is what makes the acquire
/// exactly-once when the two bridges race their first subscribers.
///
/// [`force_release`]: ListenerLifecycle::force_release
pub struct ListenerLifecycle {
    runtime: std::sync::Arc<dyn SensorRuntime>,
    kind: SensorKind,
    sensor: NativeHandle,
    state: Mutex<ListenerState>,
}

impl ListenerLifecycle {
    pub fn new(
        runtime: std::sync::Arc<dyn SensorRuntime>,
        kind: SensorKind,
        sensor: NativeHandle,
        interval: Duration,
    ) -> Self {
        ListenerLifecycle {
            runtime,
            kind,
            sensor,
            state: Mutex::new(ListenerState {
                listener: None,
                interval,
                data_attached: false,
                accuracy_attached: false,
            }),
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn sensor(&self) -> NativeHandle {
        self.sensor
    }

    /// Whether the native listener is currently acquired.
    pub fn is_acquired(&self) -> bool {
        self.state.lock().listener.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.state.lock().interval
    }

    /// Stores the delivery interval and forwards it immediately when a
    /// listener is live. A freshly acquired listener always gets the stored
    /// interval applied before any callback is attached.
    pub fn set_interval(&self, interval: Duration) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state.interval = interval;
        match state.listener {
            Some(listener) => self.runtime.set_interval(listener, interval),
            None => Ok(()),
        }
    }

    /// Destroys a still-acquired listener regardless of attached sides.
    ///
    /// Dispose path only: the caller must have disposed both bridges first,
    /// so no callback can still resolve to them.
    pub fn force_release(&self) -> Result<(), NativeCallError> {
        let mut state = self.state.lock();
        state.data_attached = false;
        state.accuracy_attached = false;
        match state.listener.take() {
            Some(listener) => {
                tracing::debug!(kind = %self.kind, %listener, "force-releasing sensor listener");
                self.runtime.destroy_listener(listener)
            }
            None => Ok(()),
        }
    }

    /// Acquires the listener if neither side holds it yet. Applies the
    /// stored interval as part of acquisition; a failure rolls the fresh
    /// listener back so no half-acquired state can escape the lock.
    fn acquire_locked(&self, state: &mut ListenerState) -> Result<NativeHandle, NativeCallError> {
        if let Some(listener) = state.listener {
            return Ok(listener);
        }
        let listener = self.runtime.create_listener(self.sensor)?;
        if let Err(cause) = self.runtime.set_interval(listener, state.interval) {
            if let Err(error) = self.runtime.destroy_listener(listener) {
                tracing::warn!(
                    kind = %self.kind,
                    %error,
                    "listener rollback failed after interval rejection; listener leaked"
                );
            }
            return Err(cause);
        }
        state.listener = Some(listener);
        tracing::debug!(kind = %self.kind, %listener, "sensor listener acquired");
        Ok(listener)
    }
}

impl EventHook for ListenerLifecycle {
    fn subscribe(
        &self,
        source: &EventSource,
        trampoline: Trampoline,
        context: TrampolineKey,
    ) -> Result<(), NativeCallError> {
        let Some(side) = Side::of(source) else {
            return Err(NativeCallError::new(
                "attach_callback",
                NativeStatus::INVALID_PARAMETER,
            ));
        };

        let mut state = self.state.lock();
        let freshly_acquired = state.listener.is_none();
        let listener = self.acquire_locked(&mut state)?;

        let attached = match side {
            Side::Data => self
                .runtime
                .attach_event_callback(listener, trampoline, context),
            Side::Accuracy => self
                .runtime
                .attach_accuracy_callback(listener, trampoline, context),
        };
        if let Err(cause) = attached {
            // A listener acquired for this attach alone goes away again.
            if freshly_acquired {
                state.listener = None;
                if let Err(error) = self.runtime.destroy_listener(listener) {
                    tracing::warn!(
                        kind = %self.kind,
                        %error,
                        "listener rollback failed after attach rejection; listener leaked"
                    );
                }
            }
            return Err(cause);
        }

        state.set_attached(side, true);
        tracing::debug!(
            kind = %self.kind,
            side = ?side,
            data = state.data_attached,
            accuracy = state.accuracy_attached,
            "sensor callback attached"
        );
        Ok(())
    }

    fn unsubscribe(&self, source: &EventSource) -> Result<(), NativeCallError> {
        let Some(side) = Side::of(source) else {
            return Ok(());
        };

        let mut state = self.state.lock();
        if !state.attached(side) {
            return Ok(());
        }
        let Some(listener) = state.listener else {
            state.set_attached(side, false);
            return Ok(());
        };

        let detached = match side {
            Side::Data => self.runtime.detach_event_callback(listener),
            Side::Accuracy => self.runtime.detach_accuracy_callback(listener),
        };
        state.set_attached(side, false);

        let mut destroyed = Ok(());
        if !state.data_attached && !state.accuracy_attached {
            state.listener = None;
            destroyed = self.runtime.destroy_listener(listener);
            if destroyed.is_ok() {
                tracing::debug!(kind = %self.kind, %listener, "sensor listener released");
            }
        }

        // Both steps run even when the detach failed; the detach error wins.
        if let Err(error) = &destroyed {
            tracing::warn!(kind = %self.kind, %error, "listener destroy failed; listener leaked");
        }
        detached.and(destroyed)
    }
}
