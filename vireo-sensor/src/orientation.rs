//! The orientation sensor wrapper.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vireo_bridge::SubscriptionId;

use crate::error::Result;
use crate::runtime::SensorRuntime;
use crate::sensor::{self, SensorCore, SensorOptions};
use crate::types::{AccuracyChange, SensorKind, SensorSample};

/// One orientation reading, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientationData {
    pub azimuth: f32,
    pub pitch: f32,
    pub roll: f32,
    /// Time since boot at which the reading was taken.
    pub timestamp: Duration,
}

impl OrientationData {
    fn from_sample(sample: &SensorSample) -> Self {
        OrientationData {
            azimuth: sample.values[0],
            pitch: sample.values[1],
            roll: sample.values[2],
            timestamp: sample.timestamp,
        }
    }
}

/// Managed wrapper around one physical orientation sensor.
///
/// Construction resolves the device handle and fails permanently with
/// [`SensorError::NotSupported`](crate::SensorError::NotSupported) when the
/// device has no orientation sensor. The native listener is acquired when
/// the first data or accuracy subscriber arrives and released when the last
/// one leaves; [`dispose`](Self::dispose) tears everything down eagerly.
///
/// ```rust,ignore
/// let sensor = OrientationSensor::new(runtime)?;
/// let id = sensor.on_data(|data| {
///     println!("azimuth {:.1}°", data.azimuth);
/// })?;
/// // ...
/// sensor.unsubscribe_data(id)?;
/// ```
pub struct OrientationSensor {
    core: SensorCore,
}

impl OrientationSensor {
    pub const KIND: SensorKind = SensorKind::Orientation;

    /// Orientation events carry azimuth, pitch, and roll; shorter payloads
    /// are malformed and dropped at projection.
    const MIN_VALUES: usize = 3;

    pub fn new(runtime: Arc<dyn SensorRuntime>) -> Result<Self> {
        Self::with_options(runtime, SensorOptions::default())
    }

    pub fn with_index(runtime: Arc<dyn SensorRuntime>, index: usize) -> Result<Self> {
        Self::with_options(
            runtime,
            SensorOptions {
                index,
                ..SensorOptions::default()
            },
        )
    }

    pub fn with_options(runtime: Arc<dyn SensorRuntime>, options: SensorOptions) -> Result<Self> {
        Ok(OrientationSensor {
            core: SensorCore::new(runtime, Self::KIND, Self::MIN_VALUES, options)?,
        })
    }

    /// Whether the device carries an orientation sensor at all.
    pub fn is_supported(runtime: &dyn SensorRuntime) -> Result<bool> {
        sensor::is_supported(runtime, Self::KIND)
    }

    /// How many orientation sensors the device carries.
    pub fn count(runtime: &dyn SensorRuntime) -> Result<usize> {
        sensor::count(runtime, Self::KIND)
    }

    /// Subscribes to orientation readings. The first subscriber (counting
    /// accuracy subscribers) acquires the native listener.
    pub fn on_data<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(OrientationData) + Send + Sync + 'static,
    {
        self.core
            .on_data(move |sample| callback(OrientationData::from_sample(sample)))
    }

    pub fn unsubscribe_data(&self, id: SubscriptionId) -> Result<()> {
        self.core.unsubscribe_data(id)
    }

    /// Subscribes to accuracy-change notifications.
    pub fn on_accuracy_changed<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(AccuracyChange) + Send + Sync + 'static,
    {
        self.core.on_accuracy_changed(move |change| callback(*change))
    }

    pub fn unsubscribe_accuracy(&self, id: SubscriptionId) -> Result<()> {
        self.core.unsubscribe_accuracy(id)
    }

    /// Last delivered azimuth, if any event has arrived yet.
    pub fn azimuth(&self) -> Option<f32> {
        self.reading().map(|data| data.azimuth)
    }

    pub fn pitch(&self) -> Option<f32> {
        self.reading().map(|data| data.pitch)
    }

    pub fn roll(&self) -> Option<f32> {
        self.reading().map(|data| data.roll)
    }

    /// Last delivered reading, refreshed once per event regardless of the
    /// subscriber count.
    pub fn reading(&self) -> Option<OrientationData> {
        self.core
            .reading()
            .map(|sample| OrientationData::from_sample(&sample))
    }

    pub fn interval(&self) -> Duration {
        self.core.interval()
    }

    /// Changes the delivery interval; takes effect immediately when the
    /// listener is live. Zero intervals are rejected.
    pub fn set_interval(&self, interval: Duration) -> Result<()> {
        self.core.set_interval(interval)
    }

    /// Whether the native listener is currently acquired.
    pub fn is_listening(&self) -> bool {
        self.core.is_listening()
    }

    pub fn kind(&self) -> SensorKind {
        self.core.kind()
    }

    pub fn index(&self) -> usize {
        self.core.index()
    }

    pub fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }

    /// Tears down both subscriptions and the listener. Idempotent; dropping
    /// an undisposed sensor performs the same teardown best-effort.
    pub fn dispose(&self) -> Result<()> {
        self.core.dispose()
    }
}

impl std::fmt::Debug for OrientationSensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrientationSensor")
            .field("kind", &Self::KIND)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
