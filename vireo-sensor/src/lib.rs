//! # vireo-sensor - Managed Sensor Bindings for the Vireo SDK
//!
//! Typed wrappers for the platform's sensors, built on the
//! [`vireo_bridge`] event core. Each sensor instance owns two event bridges
//! (data samples, accuracy changes) that share one native listener handle:
//!
//! ```text
//! OrientationSensor / AccelerometerSensor
//!     ↓ on_data / on_accuracy_changed
//! EventBridge (data) ─┐         ┌─ EventBridge (accuracy)
//!                     ↓         ↓
//!            ListenerLifecycle (EventHook)
//!                     ↓
//!        SensorRuntime (native boundary)
//! ```
//!
//! The listener is acquired when the first of either bridge goes active and
//! released when the last goes inactive; disposal tears both bridges down
//! and then force-releases whatever is still held.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vireo_sensor::{OrientationSensor, SensorRuntime};
//!
//! let sensor = OrientationSensor::new(runtime)?;
//! sensor.on_data(|data| {
//!     println!("azimuth {:.1} pitch {:.1} roll {:.1}", data.azimuth, data.pitch, data.roll);
//! })?;
//! # Ok::<(), vireo_sensor::SensorError>(())
//! ```

pub use accelerometer::{AccelerometerData, AccelerometerSensor};
pub use error::{Result, SensorError};
pub use lifecycle::ListenerLifecycle;
pub use orientation::{OrientationData, OrientationSensor};
pub use runtime::SensorRuntime;
pub use sensor::{count, is_supported, SensorOptions};
pub use types::{
    AccuracyChange, RawAccuracyEvent, RawSensorEvent, SensorAccuracy, SensorKind, SensorSample,
    MAX_VALUE_COUNT,
};

mod accelerometer;
mod error;
mod lifecycle;
mod orientation;
mod runtime;
mod sensor;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
