//! # Vireo SDK - Managed Bindings for Native Platform Services
//!
//! Object-oriented wrappers over the Vireo platform's C entry points:
//! sensors, widget smart signals, and the event plumbing underneath them.
//! The bindings are deliberately thin; the engineering lives in the event
//! core, which turns flat native callbacks into managed, ordered,
//! reference-counted subscriptions with deterministic teardown.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vireo_sdk::{OrientationSensor, SdkError};
//!
//! fn main() -> Result<(), SdkError> {
//!     let sensor = OrientationSensor::new(runtime)?;
//!
//!     // First subscriber acquires the native listener; last one releases it.
//!     let id = sensor.on_data(|data| {
//!         println!("azimuth {:.1}° pitch {:.1}° roll {:.1}°", data.azimuth, data.pitch, data.roll);
//!     })?;
//!
//!     // Cached last reading, refreshed once per delivered event.
//!     let _ = sensor.azimuth();
//!
//!     sensor.unsubscribe_data(id)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! vireo-sdk (facade, unified SdkError)
//!     ↓
//! vireo-sensor                vireo-ui
//! (OrientationSensor,         (Layout, List,
//!  AccelerometerSensor,        SmartEvent per signal)
//!  ListenerLifecycle)
//!     ↓                           ↓
//! vireo-bridge (EventBridge, CallbackRegistry, trampoline)
//!     ↓
//! native runtime (SensorRuntime / WidgetRuntime boundaries)
//! ```
//!
//! ## Guarantees
//!
//! - **Reference-counted activation**: one native subscription per event
//!   source while subscribers exist, no matter how callers race.
//! - **Ordered, isolated dispatch**: subscribers run in subscription order
//!   on the native delivery thread; a panicking subscriber or malformed
//!   payload never disturbs the others or the native stack.
//! - **Deterministic teardown**: dispose unregisters dispatch before
//!   releasing native resources, so no callback can observe a freed handle;
//!   dropping an undisposed wrapper performs the same teardown best-effort.

pub use error::{Result, SdkError};

// The event core, for binding further native services.
pub use vireo_bridge::{
    BridgeError, BridgeStats, CallbackRegistry, DisposeFlag, EventBridge, EventHook, EventKind,
    EventSource, NativeCallError, NativeHandle, NativeStatus, PayloadProjection, ProjectionError,
    RawPayload, SmartName, SubscriptionId, Trampoline, TrampolineKey,
};

// Sensors.
pub use vireo_sensor::{
    AccelerometerData, AccelerometerSensor, AccuracyChange, ListenerLifecycle, OrientationData,
    OrientationSensor, SensorAccuracy, SensorError, SensorKind, SensorOptions, SensorRuntime,
    SensorSample,
};

// Widgets.
pub use vireo_ui::{
    EmptyProjection, ItemEvent, ItemProjection, Layout, List, SmartEvent, UiError, WidgetRuntime,
};

mod error;
