//! # vireo-bridge - Native Event Bridging for the Vireo SDK
//!
//! Core plumbing that turns flat native callbacks into managed, ordered,
//! reference-counted event subscriptions. Every stateful native
//! subscription in the SDK — sensor streams, widget smart signals — goes
//! through one [`EventBridge`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vireo_bridge::{EventBridge, EventKind, EventSource, NativeHandle};
//!
//! let source = EventSource::new(widget_handle, EventKind::Smart("selected".into()));
//! let bridge = EventBridge::new(source, hook, projection);
//!
//! // First subscriber establishes the native subscription.
//! let id = bridge.subscribe(|item| println!("selected: {item:?}"))?;
//!
//! // Last unsubscribe releases it again.
//! bridge.unsubscribe(id)?;
//! # Ok::<(), vireo_bridge::BridgeError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! managed subscribers (ordered, ref-counted)
//!     ↓ subscribe / unsubscribe
//! EventBridge (one per EventSource, 0→1 / 1→0 activation edges)
//!     ↓ EventHook (native subscribe/unsubscribe boundary)
//! native runtime
//!     ↓ dispatch_trampoline(payload, context)
//! CallbackRegistry (context key → dispatch target)
//!     ↓ PayloadProjection (raw payload → managed value, once per event)
//! managed subscribers, in subscription order
//! ```
//!
//! ## Guarantees
//!
//! - **Exactly one native subscription** per source while subscribers
//!   exist, even under racing subscribe/unsubscribe/dispose.
//! - **Teardown order**: the registry entry is removed strictly before the
//!   native resource is released, so no callback can observe a freed
//!   resource.
//! - **Dispatch isolation**: projection failures and subscriber panics are
//!   contained and counted; nothing unwinds into the native frame.

pub use bridge::{BridgeStats, EventBridge, SubscriptionId};
pub use dispose::DisposeFlag;
pub use error::{BridgeError, ProjectionError, Result};
pub use handle::NativeHandle;
pub use hook::EventHook;
pub use payload::RawPayload;
pub use projection::PayloadProjection;
pub use registry::{
    dispatch_trampoline, CallbackRegistry, DispatchTarget, RegistrationToken, Trampoline,
    TrampolineKey,
};
pub use source::{EventKind, EventSource, SmartName};
pub use status::{NativeCallError, NativeStatus};

mod bridge;
mod dispose;
mod error;
mod handle;
mod hook;
mod payload;
mod projection;
pub mod registry;
mod source;
mod status;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
