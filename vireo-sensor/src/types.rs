//! Sensor data types and the raw native event layouts.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The sensor families the platform exposes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensorKind {
    Orientation,
    Accelerometer,
    Gyroscope,
    Magnetometer,
    Light,
    Proximity,
    Pressure,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorKind::Orientation => "orientation",
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Gyroscope => "gyroscope",
            SensorKind::Magnetometer => "magnetometer",
            SensorKind::Light => "light",
            SensorKind::Proximity => "proximity",
            SensorKind::Pressure => "pressure",
        };
        f.write_str(name)
    }
}

/// How much the platform trusts a sensor's current readings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensorAccuracy {
    Undefined,
    Bad,
    Normal,
    Good,
    VeryGood,
}

impl SensorAccuracy {
    /// Decodes the accuracy value native events carry. Unknown codes map to
    /// `Undefined` rather than failing the whole event.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => SensorAccuracy::Bad,
            1 => SensorAccuracy::Normal,
            2 => SensorAccuracy::Good,
            3 => SensorAccuracy::VeryGood,
            _ => SensorAccuracy::Undefined,
        }
    }
}

impl fmt::Display for SensorAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorAccuracy::Undefined => "undefined",
            SensorAccuracy::Bad => "bad",
            SensorAccuracy::Normal => "normal",
            SensorAccuracy::Good => "good",
            SensorAccuracy::VeryGood => "very-good",
        };
        f.write_str(name)
    }
}

/// Maximum value slots a native sensor event carries.
pub const MAX_VALUE_COUNT: usize = 16;

/// Wire layout of a native sensor data event. The native side delivers a
/// pointer to one of these for the duration of the callback.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct RawSensorEvent {
    /// Microseconds since boot.
    pub timestamp_us: u64,
    pub accuracy: i32,
    /// How many slots of `values` the event actually fills.
    pub value_count: u32,
    pub values: [f32; MAX_VALUE_COUNT],
}

/// Wire layout of a native accuracy-change event.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct RawAccuracyEvent {
    pub timestamp_us: u64,
    pub accuracy: i32,
}

/// One delivered sensor reading, already copied out of the native frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Time since boot at which the reading was taken.
    pub timestamp: Duration,
    pub accuracy: SensorAccuracy,
    pub values: Vec<f32>,
}

impl SensorSample {
    /// Copies a raw event out of its callback frame. `value_count` is
    /// clamped to the layout's capacity; validating it against what a
    /// particular sensor needs is the projection's job.
    pub fn from_raw(raw: &RawSensorEvent) -> Self {
        let count = (raw.value_count as usize).min(MAX_VALUE_COUNT);
        SensorSample {
            timestamp: Duration::from_micros(raw.timestamp_us),
            accuracy: SensorAccuracy::from_raw(raw.accuracy),
            values: raw.values[..count].to_vec(),
        }
    }
}

/// An accuracy-change notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyChange {
    pub timestamp: Duration,
    pub accuracy: SensorAccuracy,
}

impl AccuracyChange {
    pub fn from_raw(raw: &RawAccuracyEvent) -> Self {
        AccuracyChange {
            timestamp: Duration::from_micros(raw.timestamp_us),
            accuracy: SensorAccuracy::from_raw(raw.accuracy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_event(values: &[f32], timestamp_us: u64) -> RawSensorEvent {
        let mut slots = [0.0f32; MAX_VALUE_COUNT];
        slots[..values.len()].copy_from_slice(values);
        RawSensorEvent {
            timestamp_us,
            accuracy: 2,
            value_count: values.len() as u32,
            values: slots,
        }
    }

    #[test]
    fn test_sample_copies_only_filled_slots() {
        let sample = SensorSample::from_raw(&raw_event(&[1.0, 2.0, 3.0], 100));
        assert_eq!(sample.values, vec![1.0, 2.0, 3.0]);
        assert_eq!(sample.timestamp, Duration::from_micros(100));
        assert_eq!(sample.accuracy, SensorAccuracy::Good);
    }

    #[test]
    fn test_sample_clamps_overlong_count() {
        let mut raw = raw_event(&[0.5; MAX_VALUE_COUNT], 7);
        raw.value_count = 99;
        let sample = SensorSample::from_raw(&raw);
        assert_eq!(sample.values.len(), MAX_VALUE_COUNT);
    }

    #[test]
    fn test_accuracy_decoding() {
        assert_eq!(SensorAccuracy::from_raw(0), SensorAccuracy::Bad);
        assert_eq!(SensorAccuracy::from_raw(1), SensorAccuracy::Normal);
        assert_eq!(SensorAccuracy::from_raw(2), SensorAccuracy::Good);
        assert_eq!(SensorAccuracy::from_raw(3), SensorAccuracy::VeryGood);
        assert_eq!(SensorAccuracy::from_raw(-1), SensorAccuracy::Undefined);
        assert_eq!(SensorAccuracy::from_raw(42), SensorAccuracy::Undefined);
    }

    #[test]
    fn test_accuracy_change_from_raw() {
        let change = AccuracyChange::from_raw(&RawAccuracyEvent {
            timestamp_us: 250,
            accuracy: 1,
        });
        assert_eq!(change.timestamp, Duration::from_micros(250));
        assert_eq!(change.accuracy, SensorAccuracy::Normal);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(SensorKind::Orientation.to_string(), "orientation");
        assert_eq!(SensorAccuracy::VeryGood.to_string(), "very-good");
    }
}
