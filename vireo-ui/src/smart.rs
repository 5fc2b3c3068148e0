//! One named smart signal on one widget.

use std::sync::Arc;

use vireo_bridge::{
    EventBridge, EventHook, EventKind, EventSource, NativeHandle, PayloadProjection, SmartName,
    SubscriptionId,
};

use crate::error::Result;
use crate::runtime::{SignalHook, WidgetRuntime};

/// Typed facade over an [`EventBridge`] for a widget smart signal.
///
/// Reference-counted activation applies per signal: the first subscriber
/// triggers the toolkit `connect`, the last unsubscribe the `disconnect`.
/// Widget wrappers hold one `SmartEvent` per signal they expose.
pub struct SmartEvent<P: PayloadProjection> {
    name: SmartName,
    bridge: EventBridge<P>,
}

impl<P: PayloadProjection> SmartEvent<P> {
    pub fn new(
        widget: NativeHandle,
        name: impl Into<SmartName>,
        runtime: Arc<dyn WidgetRuntime>,
        projection: P,
    ) -> Self {
        let name = name.into();
        let source = EventSource::new(widget, EventKind::Smart(name.clone()));
        let hook: Arc<dyn EventHook> = Arc::new(SignalHook::new(runtime));
        SmartEvent {
            name,
            bridge: EventBridge::new(source, hook, projection),
        }
    }

    /// Adds a subscriber; connects the native signal on the 0→1 edge. A
    /// refused connect leaves the event exactly as it was.
    pub fn subscribe<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(&P::Args) + Send + Sync + 'static,
    {
        Ok(self.bridge.subscribe(callback)?)
    }

    /// Removes a subscriber; disconnects on the 1→0 edge. Stale ids no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        Ok(self.bridge.unsubscribe(id)?)
    }

    pub fn name(&self) -> &SmartName {
        &self.name
    }

    pub fn widget(&self) -> NativeHandle {
        self.bridge.source().handle()
    }

    pub fn subscriber_count(&self) -> usize {
        self.bridge.subscriber_count()
    }

    /// Whether the native signal is currently connected.
    pub fn is_active(&self) -> bool {
        self.bridge.is_active()
    }

    pub fn is_disposed(&self) -> bool {
        self.bridge.is_disposed()
    }

    /// Disconnects and drops all subscribers. Idempotent.
    pub fn dispose(&self) -> Result<()> {
        Ok(self.bridge.dispose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UiError;
    use crate::events::{EmptyProjection, ItemEvent, ItemProjection};
    use crate::testing::FakeWidgetRuntime;
    use std::sync::Mutex as StdMutex;
    use vireo_bridge::NativeStatus;

    fn widget(addr: usize) -> NativeHandle {
        NativeHandle::from_raw(addr).unwrap()
    }

    #[test]
    fn test_one_connect_for_many_subscribers() {
        let runtime = FakeWidgetRuntime::new();
        let event = SmartEvent::new(
            widget(0x100),
            "selected",
            runtime.clone() as Arc<dyn WidgetRuntime>,
            ItemProjection,
        );

        let a = event.subscribe(|_| {}).unwrap();
        let b = event.subscribe(|_| {}).unwrap();
        assert_eq!(runtime.connect_count(), 1);
        assert_eq!(event.subscriber_count(), 2);
        assert!(event.is_active());

        event.unsubscribe(a).unwrap();
        assert_eq!(runtime.disconnect_count(), 0);
        event.unsubscribe(b).unwrap();
        assert_eq!(runtime.disconnect_count(), 1);
        assert!(!event.is_active());
    }

    #[test]
    fn test_item_handle_rides_the_payload_pointer() {
        let runtime = FakeWidgetRuntime::new();
        let event = SmartEvent::new(
            widget(0x101),
            "selected",
            runtime.clone() as Arc<dyn WidgetRuntime>,
            ItemProjection,
        );
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        event
            .subscribe(move |item: &ItemEvent| sink.lock().unwrap().push(item.item))
            .unwrap();

        assert!(runtime.emit(widget(0x101), "selected", 0x7A10 as *const std::ffi::c_void));
        assert_eq!(*seen.lock().unwrap(), vec![widget(0x7a10)]);
    }

    #[test]
    fn test_failed_connect_rolls_back() {
        let runtime = FakeWidgetRuntime::new();
        let event = SmartEvent::new(
            widget(0x102),
            "longpressed",
            runtime.clone() as Arc<dyn WidgetRuntime>,
            ItemProjection,
        );
        runtime.fail_next_connect(NativeStatus::OPERATION_FAILED);

        let err = event.subscribe(|_| {}).unwrap_err();
        assert!(matches!(err, UiError::Signal { .. }));
        assert_eq!(event.subscriber_count(), 0);
        assert!(!event.is_active());

        event.subscribe(|_| {}).unwrap();
        assert!(event.is_active());
    }

    #[test]
    fn test_signals_on_one_widget_are_independent() {
        let runtime = FakeWidgetRuntime::new();
        let selected = SmartEvent::new(
            widget(0x103),
            "selected",
            runtime.clone() as Arc<dyn WidgetRuntime>,
            EmptyProjection,
        );
        let unselected = SmartEvent::new(
            widget(0x103),
            "unselected",
            runtime.clone() as Arc<dyn WidgetRuntime>,
            EmptyProjection,
        );

        let hits = Arc::new(StdMutex::new((0usize, 0usize)));
        let sink = Arc::clone(&hits);
        selected.subscribe(move |_| sink.lock().unwrap().0 += 1).unwrap();
        let sink = Arc::clone(&hits);
        unselected.subscribe(move |_| sink.lock().unwrap().1 += 1).unwrap();

        runtime.emit(widget(0x103), "selected", std::ptr::null());
        runtime.emit(widget(0x103), "selected", std::ptr::null());
        runtime.emit(widget(0x103), "unselected", std::ptr::null());
        assert_eq!(*hits.lock().unwrap(), (2, 1));
    }

    #[test]
    fn test_dispose_disconnects_and_silences() {
        let runtime = FakeWidgetRuntime::new();
        let event = SmartEvent::new(
            widget(0x104),
            "activated",
            runtime.clone() as Arc<dyn WidgetRuntime>,
            EmptyProjection,
        );
        let hits = Arc::new(StdMutex::new(0usize));
        let sink = Arc::clone(&hits);
        event.subscribe(move |_| *sink.lock().unwrap() += 1).unwrap();

        event.dispose().unwrap();
        event.dispose().unwrap();
        assert_eq!(runtime.disconnect_count(), 1);
        assert!(event.is_disposed());

        assert!(!runtime.emit(widget(0x104), "activated", std::ptr::null()));
        assert_eq!(*hits.lock().unwrap(), 0);
        assert!(matches!(
            event.subscribe(|_| {}),
            Err(UiError::Disposed { .. })
        ));
    }
}
