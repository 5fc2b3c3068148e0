//! Reference-counted bridging of one native event source to managed
//! subscribers.
//!
//! An [`EventBridge`] wraps a single `(handle, event kind)` pair. Managed
//! callbacks subscribe and unsubscribe freely; the bridge keeps exactly one
//! native subscription alive while at least one subscriber exists:
//!
//! * 0 → 1 subscribers: a dispatch target is registered in the global
//!   [`CallbackRegistry`](crate::CallbackRegistry), then the native
//!   subscribe runs with the trampoline and the fresh key. If the native
//!   side refuses, both steps are rolled back and the caller gets the error.
//! * 1 → 0 subscribers (and disposal): the registry entry is removed
//!   strictly before the native unsubscribe, so a callback that fires
//!   during teardown resolves nothing and dies at the trampoline.
//!
//! Dispatch snapshots the subscriber list at entry and invokes it in
//! subscription order with no internal lock held. Subscribers may therefore
//! subscribe and unsubscribe from inside their own callbacks; changes take
//! effect on the next dispatch. A panicking subscriber is contained and
//! counted, and never stops the rest of the snapshot.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};

use crate::dispose::DisposeFlag;
use crate::error::{BridgeError, Result};
use crate::hook::EventHook;
use crate::payload::RawPayload;
use crate::projection::PayloadProjection;
use crate::registry::{self, DispatchTarget, RegistrationToken};
use crate::source::EventSource;

/// Identifies one subscription within its bridge. Ids are monotonically
/// increasing and never reused, so a stale id is a reliable no-op.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Point-in-time counters for one bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeStats {
    pub subscribers: usize,
    pub active: bool,
    pub dispatched_events: u64,
    pub dropped_payloads: u64,
    pub callback_panics: u64,
}

struct Subscriber<T> {
    id: SubscriptionId,
    callback: Arc<dyn Fn(&T) + Send + Sync>,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Subscriber {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

struct BridgeState<T> {
    subscribers: Vec<Subscriber<T>>,
    /// `Some` exactly while the native subscription is established.
    registration: Option<RegistrationToken>,
    next_id: u64,
}

impl<T> BridgeState<T> {
    fn new() -> Self {
        BridgeState {
            subscribers: Vec::new(),
            registration: None,
            next_id: 1,
        }
    }
}

struct BridgeInner<P: PayloadProjection> {
    source: EventSource,
    hook: Arc<dyn EventHook>,
    projection: P,
    state: Mutex<BridgeState<P::Args>>,
    /// Serializes dispatch per source. Reentrant, so a subscriber that
    /// provokes a nested synchronous emission does not deadlock.
    dispatch_gate: ReentrantMutex<()>,
    disposed: DisposeFlag,
    dispatched_events: AtomicU64,
    dropped_payloads: AtomicU64,
    callback_panics: AtomicU64,
}

impl<P: PayloadProjection> BridgeInner<P> {
    fn dispatch(&self, payload: RawPayload) {
        let _gate = self.dispatch_gate.lock();

        let snapshot: Vec<Subscriber<P::Args>> = self.state.lock().subscribers.clone();
        if snapshot.is_empty() {
            return;
        }

        let args = match self.projection.project(payload) {
            Ok(args) => args,
            Err(error) => {
                self.dropped_payloads.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    source = %self.source,
                    %error,
                    "dropping native event the projection could not translate"
                );
                return;
            }
        };

        self.dispatched_events.fetch_add(1, Ordering::Relaxed);
        for subscriber in &snapshot {
            let callback = &subscriber.callback;
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                callback(&args);
            }));
            if outcome.is_err() {
                self.callback_panics.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    source = %self.source,
                    subscription = %subscriber.id,
                    "subscriber panicked during dispatch"
                );
            }
        }
    }
}

impl<P: PayloadProjection> Drop for BridgeInner<P> {
    fn drop(&mut self) {
        if !self.disposed.begin() {
            return;
        }
        let state = self.state.get_mut();
        state.subscribers.clear();
        if let Some(token) = state.registration.take() {
            registry::global().unregister(token);
            if let Err(error) = self.hook.unsubscribe(&self.source) {
                tracing::warn!(
                    source = %self.source,
                    %error,
                    "native unsubscribe failed while dropping bridge; subscription leaked"
                );
            }
        }
    }
}

/// Routes registry dispatches to a bridge without keeping it alive.
///
/// Holding the bridge weakly means a bridge that was dropped without a
/// proper dispose cannot be resurrected by a late callback; the callback
/// resolves, fails to upgrade, and is dropped.
struct BridgeDispatcher<P: PayloadProjection> {
    inner: Weak<BridgeInner<P>>,
}

impl<P: PayloadProjection> DispatchTarget for BridgeDispatcher<P> {
    fn dispatch(&self, payload: RawPayload) {
        match self.inner.upgrade() {
            Some(inner) => inner.dispatch(payload),
            None => tracing::trace!("dropping native callback for a bridge that no longer exists"),
        }
    }
}

/// Bridges one native event source to an ordered set of managed
/// subscribers. See the module docs for the lifecycle rules.
pub struct EventBridge<P: PayloadProjection> {
    inner: Arc<BridgeInner<P>>,
}

impl<P: PayloadProjection> EventBridge<P> {
    /// Builds an inactive bridge for `source`. No native call happens until
    /// the first subscriber arrives.
    pub fn new(source: EventSource, hook: Arc<dyn EventHook>, projection: P) -> Self {
        EventBridge {
            inner: Arc::new(BridgeInner {
                source,
                hook,
                projection,
                state: Mutex::new(BridgeState::new()),
                dispatch_gate: ReentrantMutex::new(()),
                disposed: DisposeFlag::new(),
                dispatched_events: AtomicU64::new(0),
                dropped_payloads: AtomicU64::new(0),
                callback_panics: AtomicU64::new(0),
            }),
        }
    }

    /// Adds a subscriber. The first subscriber establishes the native
    /// subscription; a native refusal leaves the bridge exactly as it was.
    ///
    /// Duplicate callbacks are distinct subscriptions with distinct ids.
    pub fn subscribe<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(&P::Args) + Send + Sync + 'static,
    {
        let inner = &self.inner;
        if inner.disposed.is_disposed() {
            return Err(BridgeError::Disposed {
                origin: inner.source.clone(),
            });
        }

        let mut state = inner.state.lock();
        if inner.disposed.is_disposed() {
            return Err(BridgeError::Disposed {
                origin: inner.source.clone(),
            });
        }

        if state.subscribers.is_empty() {
            let dispatcher: Arc<dyn DispatchTarget> = Arc::new(BridgeDispatcher {
                inner: Arc::downgrade(inner),
            });
            let token = registry::global().register(dispatcher);
            let key = token.key();
            if let Err(cause) =
                inner
                    .hook
                    .subscribe(&inner.source, registry::dispatch_trampoline, key)
            {
                registry::global().unregister(token);
                tracing::warn!(
                    source = %inner.source,
                    error = %cause,
                    "native subscribe failed; bridge stays inactive"
                );
                return Err(BridgeError::NativeSubscription {
                    origin: inner.source.clone(),
                    cause,
                });
            }
            state.registration = Some(token);
            tracing::debug!(source = %inner.source, %key, "native subscription established");
        }

        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.subscribers.push(Subscriber {
            id,
            callback: Arc::new(callback),
        });
        tracing::debug!(
            source = %inner.source,
            subscription = %id,
            subscribers = state.subscribers.len(),
            "subscriber added"
        );
        Ok(id)
    }

    /// Removes the subscription with `id`. Unknown or already-removed ids
    /// are a no-op. Removing the last subscriber releases the native
    /// subscription; if that release fails the bridge still ends Inactive
    /// and the error is returned.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        let inner = &self.inner;
        let mut state = inner.state.lock();
        let Some(index) = state.subscribers.iter().position(|s| s.id == id) else {
            return Ok(());
        };
        state.subscribers.remove(index);
        let remaining = state.subscribers.len();
        tracing::debug!(
            source = %inner.source,
            subscription = %id,
            subscribers = remaining,
            "subscriber removed"
        );

        if remaining == 0 {
            if let Some(token) = state.registration.take() {
                let key = token.key();
                // Registry entry first: a callback firing from here on
                // resolves nothing and dies at the trampoline.
                registry::global().unregister(token);
                if let Err(cause) = inner.hook.unsubscribe(&inner.source) {
                    tracing::warn!(
                        source = %inner.source,
                        error = %cause,
                        "native unsubscribe failed; subscription leaked"
                    );
                    return Err(BridgeError::NativeSubscription {
                        origin: inner.source.clone(),
                        cause,
                    });
                }
                tracing::debug!(source = %inner.source, %key, "native subscription released");
            }
        }
        Ok(())
    }

    /// Tears the bridge down: drops all subscribers, removes the registry
    /// entry, then releases the native subscription. Idempotent. After this
    /// returns, no callback can reach a subscriber of this bridge again;
    /// a dispatch already past resolution may still finish.
    pub fn dispose(&self) -> Result<()> {
        let inner = &self.inner;
        if !inner.disposed.begin() {
            return Ok(());
        }

        let (token, dropped) = {
            let mut state = inner.state.lock();
            let dropped = state.subscribers.len();
            state.subscribers.clear();
            (state.registration.take(), dropped)
        };
        if dropped > 0 {
            tracing::debug!(source = %inner.source, dropped, "dropping subscribers at dispose");
        }

        if let Some(token) = token {
            registry::global().unregister(token);
            if let Err(cause) = inner.hook.unsubscribe(&inner.source) {
                tracing::warn!(
                    source = %inner.source,
                    error = %cause,
                    "native unsubscribe failed during dispose; subscription leaked"
                );
                return Err(BridgeError::NativeSubscription {
                    origin: inner.source.clone(),
                    cause,
                });
            }
        }
        tracing::debug!(source = %inner.source, "event bridge disposed");
        Ok(())
    }

    pub fn source(&self) -> &EventSource {
        &self.inner.source
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().subscribers.len()
    }

    /// Whether the native subscription is currently established.
    pub fn is_active(&self) -> bool {
        self.inner.state.lock().registration.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.is_disposed()
    }

    pub fn stats(&self) -> BridgeStats {
        let state = self.inner.state.lock();
        BridgeStats {
            subscribers: state.subscribers.len(),
            active: state.registration.is_some(),
            dispatched_events: self.inner.dispatched_events.load(Ordering::Relaxed),
            dropped_payloads: self.inner.dropped_payloads.load(Ordering::Relaxed),
            callback_panics: self.inner.callback_panics.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectionError;
    use crate::handle::NativeHandle;
    use crate::registry::{Trampoline, TrampolineKey};
    use crate::source::EventKind;
    use crate::status::{NativeCallError, NativeStatus};
    use crate::testing::{NoopProjection, RecordingHook};
    use std::ffi::c_void;
    use std::sync::Mutex as StdMutex;

    fn source(addr: usize) -> EventSource {
        EventSource::new(NativeHandle::from_raw(addr).unwrap(), EventKind::SensorData)
    }

    fn noop_bridge(addr: usize) -> (EventBridge<NoopProjection>, Arc<RecordingHook>) {
        let hook = RecordingHook::new();
        let bridge = EventBridge::new(source(addr), hook.clone() as Arc<dyn EventHook>, NoopProjection);
        (bridge, hook)
    }

    /// Projection that refuses every payload.
    struct FailingProjection;
    impl PayloadProjection for FailingProjection {
        type Args = ();
        fn project(&self, _payload: RawPayload) -> std::result::Result<(), ProjectionError> {
            Err(ProjectionError::UnexpectedShape("refused".into()))
        }
    }

    /// Projection that reads a u32 out of the payload.
    struct WordProjection;
    impl PayloadProjection for WordProjection {
        type Args = u32;
        fn project(&self, payload: RawPayload) -> std::result::Result<u32, ProjectionError> {
            // SAFETY: tests always emit a pointer to a live u32.
            unsafe { payload.cast::<u32>() }
                .copied()
                .ok_or(ProjectionError::NullPayload)
        }
    }

    // ==================== Activation edges ====================

    #[test]
    fn test_first_subscribe_establishes_native_subscription() {
        let (bridge, hook) = noop_bridge(0x10);
        assert!(!bridge.is_active());

        bridge.subscribe(|_| {}).unwrap();
        assert!(bridge.is_active());
        assert_eq!(bridge.subscriber_count(), 1);
        assert_eq!(hook.subscribe_count(), 1);
    }

    #[test]
    fn test_second_subscribe_reuses_native_subscription() {
        let (bridge, hook) = noop_bridge(0x11);
        bridge.subscribe(|_| {}).unwrap();
        bridge.subscribe(|_| {}).unwrap();

        assert_eq!(bridge.subscriber_count(), 2);
        assert_eq!(hook.subscribe_count(), 1);
        assert_eq!(hook.calls(), vec!["subscribe:0x11/sensor-data"]);
    }

    #[test]
    fn test_last_unsubscribe_releases_native_subscription() {
        let (bridge, hook) = noop_bridge(0x12);
        let a = bridge.subscribe(|_| {}).unwrap();
        let b = bridge.subscribe(|_| {}).unwrap();

        bridge.unsubscribe(a).unwrap();
        assert!(bridge.is_active());
        assert_eq!(hook.unsubscribe_count(), 0);

        bridge.unsubscribe(b).unwrap();
        assert!(!bridge.is_active());
        assert_eq!(bridge.subscriber_count(), 0);
        assert_eq!(hook.unsubscribe_count(), 1);
    }

    #[test]
    fn test_unsubscribe_unknown_id_is_noop() {
        let (bridge, hook) = noop_bridge(0x13);
        let id = bridge.subscribe(|_| {}).unwrap();
        bridge.unsubscribe(id).unwrap();

        // A second removal of the same id and a fabricated id both no-op.
        bridge.unsubscribe(id).unwrap();
        assert_eq!(hook.unsubscribe_count(), 1);
        assert_eq!(bridge.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_ids_are_unique_per_bridge() {
        let (bridge, _hook) = noop_bridge(0x14);
        let a = bridge.subscribe(|_| {}).unwrap();
        let b = bridge.subscribe(|_| {}).unwrap();
        bridge.unsubscribe(a).unwrap();
        let c = bridge.subscribe(|_| {}).unwrap();

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    // ==================== Rollback ====================

    #[test]
    fn test_failed_native_subscribe_rolls_back() {
        let (bridge, hook) = noop_bridge(0x15);
        hook.fail_next_subscribe(NativeStatus::TRY_AGAIN);

        let err = bridge.subscribe(|_| {}).unwrap_err();
        match err {
            BridgeError::NativeSubscription { cause, .. } => {
                assert_eq!(cause.status(), NativeStatus::TRY_AGAIN);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(bridge.subscriber_count(), 0);
        assert!(!bridge.is_active());
        assert_eq!(hook.installed_count(), 0);

        // The failure was transient; a retry succeeds cleanly.
        bridge.subscribe(|_| {}).unwrap();
        assert!(bridge.is_active());
        assert_eq!(bridge.subscriber_count(), 1);
    }

    #[test]
    fn test_failed_native_unsubscribe_still_deactivates() {
        let (bridge, hook) = noop_bridge(0x16);
        let id = bridge.subscribe(|_| {}).unwrap();
        hook.fail_next_unsubscribe(NativeStatus::IO_ERROR);

        let err = bridge.unsubscribe(id).unwrap_err();
        assert!(matches!(err, BridgeError::NativeSubscription { .. }));
        assert_eq!(bridge.subscriber_count(), 0);
        assert!(!bridge.is_active());
    }

    // ==================== Dispatch ====================

    #[test]
    fn test_dispatch_runs_in_subscription_order() {
        let (bridge, hook) = noop_bridge(0x20);
        let order = Arc::new(StdMutex::new(Vec::new()));

        for label in ["a", "b", "c"] {
            let order = Arc::clone(&order);
            bridge.subscribe(move |_| order.lock().unwrap().push(label)).unwrap();
        }

        assert!(hook.emit(bridge.source(), std::ptr::null()));
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dispatch_delivers_projected_value() {
        let hook = RecordingHook::new();
        let bridge = EventBridge::new(source(0x21), hook.clone() as Arc<dyn EventHook>, WordProjection);
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bridge.subscribe(move |value: &u32| sink.lock().unwrap().push(*value)).unwrap();

        let word = 7u32;
        hook.emit(bridge.source(), &word as *const u32 as *const c_void);
        assert_eq!(*seen.lock().unwrap(), vec![7]);
        assert_eq!(bridge.stats().dispatched_events, 1);
    }

    #[test]
    fn test_self_unsubscribe_mid_dispatch_lets_later_subscribers_run() {
        let (bridge, hook) = noop_bridge(0x22);
        let bridge = Arc::new(bridge);
        let order = Arc::new(StdMutex::new(Vec::new()));

        let o = Arc::clone(&order);
        bridge.subscribe(move |_| o.lock().unwrap().push("a")).unwrap();

        let o = Arc::clone(&order);
        let self_id = Arc::new(StdMutex::new(None));
        let slot = Arc::clone(&self_id);
        let bridge_for_b = Arc::clone(&bridge);
        let b = bridge
            .subscribe(move |_| {
                o.lock().unwrap().push("b");
                if let Some(id) = *slot.lock().unwrap() {
                    bridge_for_b.unsubscribe(id).unwrap();
                }
            })
            .unwrap();
        *self_id.lock().unwrap() = Some(b);

        let o = Arc::clone(&order);
        bridge.subscribe(move |_| o.lock().unwrap().push("c")).unwrap();

        hook.emit(bridge.source(), std::ptr::null());
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(bridge.subscriber_count(), 2);

        // The removal is visible from the next dispatch on.
        hook.emit(bridge.source(), std::ptr::null());
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c", "a", "c"]);
    }

    #[test]
    fn test_subscribe_mid_dispatch_joins_next_dispatch() {
        let (bridge, hook) = noop_bridge(0x23);
        let bridge = Arc::new(bridge);
        let order = Arc::new(StdMutex::new(Vec::new()));

        let o = Arc::clone(&order);
        let bridge_for_a = Arc::clone(&bridge);
        let recruited = Arc::new(StdMutex::new(false));
        let recruited_flag = Arc::clone(&recruited);
        bridge
            .subscribe(move |_| {
                o.lock().unwrap().push("a");
                let mut done = recruited_flag.lock().unwrap();
                if !*done {
                    *done = true;
                    let o2 = Arc::clone(&o);
                    bridge_for_a.subscribe(move |_| o2.lock().unwrap().push("d")).unwrap();
                }
            })
            .unwrap();

        let o = Arc::clone(&order);
        bridge.subscribe(move |_| o.lock().unwrap().push("b")).unwrap();

        hook.emit(bridge.source(), std::ptr::null());
        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
        assert_eq!(bridge.subscriber_count(), 3);

        hook.emit(bridge.source(), std::ptr::null());
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "a", "b", "d"]);
    }

    #[test]
    fn test_panicking_subscriber_does_not_stop_dispatch() {
        let (bridge, hook) = noop_bridge(0x24);
        let order = Arc::new(StdMutex::new(Vec::new()));

        let o = Arc::clone(&order);
        bridge.subscribe(move |_| o.lock().unwrap().push("a")).unwrap();
        bridge.subscribe(|_: &()| panic!("boom")).unwrap();
        let o = Arc::clone(&order);
        bridge.subscribe(move |_| o.lock().unwrap().push("c")).unwrap();

        hook.emit(bridge.source(), std::ptr::null());
        assert_eq!(*order.lock().unwrap(), vec!["a", "c"]);
        assert_eq!(bridge.stats().callback_panics, 1);
        assert_eq!(bridge.subscriber_count(), 3);
    }

    #[test]
    fn test_projection_failure_drops_the_event() {
        let hook = RecordingHook::new();
        let bridge =
            EventBridge::new(source(0x25), hook.clone() as Arc<dyn EventHook>, FailingProjection);
        let hits = Arc::new(StdMutex::new(0));
        let sink = Arc::clone(&hits);
        bridge.subscribe(move |_| *sink.lock().unwrap() += 1).unwrap();

        hook.emit(bridge.source(), std::ptr::null());
        assert_eq!(*hits.lock().unwrap(), 0);

        let stats = bridge.stats();
        assert_eq!(stats.dropped_payloads, 1);
        assert_eq!(stats.dispatched_events, 0);
    }

    // ==================== Disposal ====================

    #[test]
    fn test_dispose_is_idempotent() {
        let (bridge, hook) = noop_bridge(0x30);
        bridge.subscribe(|_| {}).unwrap();
        bridge.subscribe(|_| {}).unwrap();

        bridge.dispose().unwrap();
        bridge.dispose().unwrap();

        assert!(bridge.is_disposed());
        assert_eq!(bridge.subscriber_count(), 0);
        assert!(!bridge.is_active());
        assert_eq!(hook.unsubscribe_count(), 1);
    }

    #[test]
    fn test_dispose_of_inactive_bridge_skips_native_release() {
        let (bridge, hook) = noop_bridge(0x31);
        bridge.dispose().unwrap();
        assert_eq!(hook.unsubscribe_count(), 0);
        assert_eq!(hook.calls().len(), 0);
    }

    #[test]
    fn test_subscribe_after_dispose_is_rejected() {
        let (bridge, hook) = noop_bridge(0x32);
        bridge.dispose().unwrap();

        let err = bridge.subscribe(|_| {}).unwrap_err();
        assert!(matches!(err, BridgeError::Disposed { .. }));
        assert_eq!(hook.subscribe_count(), 0);

        // Unsubscribe stays a harmless no-op.
        bridge.unsubscribe(SubscriptionId(99)).unwrap();
    }

    #[test]
    fn test_no_delivery_after_dispose() {
        let (bridge, hook) = noop_bridge(0x33);
        let hits = Arc::new(StdMutex::new(0));
        let sink = Arc::clone(&hits);
        bridge.subscribe(move |_| *sink.lock().unwrap() += 1).unwrap();

        hook.emit(bridge.source(), std::ptr::null());
        assert_eq!(*hits.lock().unwrap(), 1);

        bridge.dispose().unwrap();
        // The hook still owns a trampoline only until dispose reaches it;
        // replaying the old key must resolve nothing.
        hook.emit(bridge.source(), std::ptr::null());
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn test_failed_dispose_still_ends_inactive() {
        let (bridge, hook) = noop_bridge(0x34);
        bridge.subscribe(|_| {}).unwrap();
        hook.fail_next_unsubscribe(NativeStatus::OPERATION_FAILED);

        let err = bridge.dispose().unwrap_err();
        assert!(matches!(err, BridgeError::NativeSubscription { .. }));
        assert!(bridge.is_disposed());
        assert_eq!(bridge.subscriber_count(), 0);
        assert!(!bridge.is_active());
    }

    #[test]
    fn test_drop_releases_native_subscription() {
        let hook = RecordingHook::new();
        {
            let bridge =
                EventBridge::new(source(0x35), hook.clone() as Arc<dyn EventHook>, NoopProjection);
            bridge.subscribe(|_| {}).unwrap();
            assert_eq!(hook.installed_count(), 1);
        }
        assert_eq!(hook.unsubscribe_count(), 1);
        assert_eq!(hook.installed_count(), 0);
    }

    #[test]
    fn test_teardown_unregisters_before_native_release() {
        /// Replays one event from inside the native unsubscribe, emulating a
        /// callback that was already queued when teardown started.
        struct ReplayingHook {
            inner: Arc<RecordingHook>,
        }

        impl EventHook for ReplayingHook {
            fn subscribe(
                &self,
                source: &EventSource,
                trampoline: Trampoline,
                context: TrampolineKey,
            ) -> std::result::Result<(), NativeCallError> {
                self.inner.subscribe(source, trampoline, context)
            }

            fn unsubscribe(&self, source: &EventSource) -> std::result::Result<(), NativeCallError> {
                self.inner.emit(source, std::ptr::null());
                self.inner.unsubscribe(source)
            }
        }

        let recording = RecordingHook::new();
        let hook = Arc::new(ReplayingHook {
            inner: Arc::clone(&recording),
        });
        let bridge = EventBridge::new(source(0x36), hook as Arc<dyn EventHook>, NoopProjection);

        let hits = Arc::new(StdMutex::new(0));
        let sink = Arc::clone(&hits);
        let id = bridge.subscribe(move |_| *sink.lock().unwrap() += 1).unwrap();

        recording.emit(bridge.source(), std::ptr::null());
        assert_eq!(*hits.lock().unwrap(), 1);

        // The registry entry is gone before the native unsubscribe runs, so
        // the replayed event cannot reach the subscriber.
        bridge.unsubscribe(id).unwrap();
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    // ==================== Observability ====================

    #[test]
    fn test_stats_reflect_bridge_state() {
        let (bridge, hook) = noop_bridge(0x40);
        let id = bridge.subscribe(|_| {}).unwrap();
        hook.emit(bridge.source(), std::ptr::null());

        let stats = bridge.stats();
        assert_eq!(
            stats,
            BridgeStats {
                subscribers: 1,
                active: true,
                dispatched_events: 1,
                dropped_payloads: 0,
                callback_panics: 0,
            }
        );

        bridge.unsubscribe(id).unwrap();
        let stats = bridge.stats();
        assert_eq!(stats.subscribers, 0);
        assert!(!stats.active);
    }
}
