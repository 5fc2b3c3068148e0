//! The accelerometer wrapper.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vireo_bridge::SubscriptionId;

use crate::error::Result;
use crate::runtime::SensorRuntime;
use crate::sensor::{self, SensorCore, SensorOptions};
use crate::types::{AccuracyChange, SensorKind, SensorSample};

/// One acceleration reading, in m/s² per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccelerometerData {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub timestamp: Duration,
}

impl AccelerometerData {
    fn from_sample(sample: &SensorSample) -> Self {
        AccelerometerData {
            x: sample.values[0],
            y: sample.values[1],
            z: sample.values[2],
            timestamp: sample.timestamp,
        }
    }
}

/// Managed wrapper around one physical accelerometer. Same lifecycle as
/// [`OrientationSensor`](crate::OrientationSensor): handle resolved at
/// construction, listener acquired on first subscription, released on the
/// last, all torn down by [`dispose`](Self::dispose).
pub struct AccelerometerSensor {
    core: SensorCore,
}

impl AccelerometerSensor {
    pub const KIND: SensorKind = SensorKind::Accelerometer;

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
        Ok(AccelerometerSensor {
            core: SensorCore::new(runtime, Self::KIND, Self::MIN_VALUES, options)?,
        })
    }

    pub fn is_supported(runtime: &dyn SensorRuntime) -> Result<bool> {
        sensor::is_supported(runtime, Self::KIND)
    }

    pub fn count(runtime: &dyn SensorRuntime) -> Result<usize> {
        sensor::count(runtime, Self::KIND)
    }

    pub fn on_data<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(AccelerometerData) + Send + Sync + 'static,
    {
        self.core
            .on_data(move |sample| callback(AccelerometerData::from_sample(sample)))
    }

    pub fn unsubscribe_data(&self, id: SubscriptionId) -> Result<()> {
        self.core.unsubscribe_data(id)
    }

    pub fn on_accuracy_changed<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(AccuracyChange) + Send + Sync + 'static,
    {
        self.core.on_accuracy_changed(move |change| callback(*change))
    }

    pub fn unsubscribe_accuracy(&self, id: SubscriptionId) -> Result<()> {
        self.core.unsubscribe_accuracy(id)
    }

    pub fn reading(&self) -> Option<AccelerometerData> {
        self.core
            .reading()
            .map(|sample| AccelerometerData::from_sample(&sample))
    }

    pub fn interval(&self) -> Duration {
        self.core.interval()
    }

    pub fn set_interval(&self, interval: Duration) -> Result<()> {
        self.core.set_interval(interval)
    }

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

    pub fn dispose(&self) -> Result<()> {
        self.core.dispose()
    }
}
