//! Shared plumbing behind the typed sensor wrappers.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use vireo_bridge::{
    DisposeFlag, EventBridge, EventHook, EventKind, EventSource, NativeCallError, NativeStatus,
    PayloadProjection, ProjectionError, RawPayload, SubscriptionId,
};

use crate::error::{Result, SensorError};
use crate::lifecycle::ListenerLifecycle;
use crate::runtime::SensorRuntime;
use crate::types::{AccuracyChange, RawAccuracyEvent, RawSensorEvent, SensorKind, SensorSample};

/// Construction-time sensor configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorOptions {
    /// Which physical sensor of the kind to bind, for devices with more
    /// than one.
    pub index: usize,
    /// Data delivery interval. Must be nonzero.
    pub interval: Duration,
}

impl Default for SensorOptions {
    fn default() -> Self {
        SensorOptions {
            index: 0,
            interval: Duration::from_millis(100),
        }
    }
}

/// Projects raw data events into [`SensorSample`]s and refreshes the
/// wrapper's cached last reading, once per delivered event.
struct SampleProjection {
    min_values: usize,
    cache: Arc<RwLock<Option<SensorSample>>>,
}

impl PayloadProjection for SampleProjection {
    type Args = SensorSample;

    fn project(&self, payload: RawPayload) -> std::result::Result<SensorSample, ProjectionError> {
        // SAFETY: the native side delivers a RawSensorEvent pointer for
        // sensor-data sources; it stays valid for the callback frame the
        // projection runs in.
        let raw = unsafe { payload.cast::<RawSensorEvent>() }.ok_or(ProjectionError::NullPayload)?;
        if (raw.value_count as usize) < self.min_values {
            return Err(ProjectionError::UnexpectedShape(format!(
                "{} values, expected at least {}",
                raw.value_count, self.min_values
            )));
        }
        let sample = SensorSample::from_raw(raw);
        *self.cache.write() = Some(sample.clone());
        Ok(sample)
    }
}

struct AccuracyProjection;

impl PayloadProjection for AccuracyProjection {
    type Args = AccuracyChange;

    fn project(&self, payload: RawPayload) -> std::result::Result<AccuracyChange, ProjectionError> {
        // SAFETY: accuracy sources deliver a RawAccuracyEvent pointer valid
        // for the callback frame.
        let raw =
            unsafe { payload.cast::<RawAccuracyEvent>() }.ok_or(ProjectionError::NullPayload)?;
        Ok(AccuracyChange::from_raw(raw))
    }
}

/// Everything the typed sensor wrappers share: the resolved device handle,
/// the listener lifecycle, the two event bridges, and the cached reading.
///
/// Construction resolves the device handle eagerly, so "no such sensor"
/// surfaces here and not at the first subscription. The listener itself is
/// acquired on demand by the lifecycle.
pub(crate) struct SensorCore {
    kind: SensorKind,
    index: usize,
    lifecycle: Arc<ListenerLifecycle>,
    data: EventBridge<SampleProjection>,
    accuracy: EventBridge<AccuracyProjection>,
    cache: Arc<RwLock<Option<SensorSample>>>,
    disposed: DisposeFlag,
}

impl SensorCore {
    pub(crate) fn new(
        runtime: Arc<dyn SensorRuntime>,
        kind: SensorKind,
        min_values: usize,
        options: SensorOptions,
    ) -> Result<Self> {
        if options.interval.is_zero() {
            return Err(SensorError::Native {
                kind,
                cause: NativeCallError::new("set_interval", NativeStatus::INVALID_PARAMETER),
            });
        }

        let supported = runtime
            .is_supported(kind)
            .map_err(|cause| SensorError::from_native(kind, cause))?;
        if !supported {
            return Err(SensorError::NotSupported { kind });
        }
        let sensor = runtime
            .default_sensor(kind, options.index)
            .map_err(|cause| SensorError::from_native(kind, cause))?;

        let lifecycle = Arc::new(ListenerLifecycle::new(
            runtime,
            kind,
            sensor,
            options.interval,
        ));
        let hook: Arc<dyn EventHook> = Arc::clone(&lifecycle) as Arc<dyn EventHook>;
        let cache = Arc::new(RwLock::new(None));

        let data = EventBridge::new(
            EventSource::new(sensor, EventKind::SensorData),
            Arc::clone(&hook),
            SampleProjection {
                min_values,
                cache: Arc::clone(&cache),
            },
        );
        let accuracy = EventBridge::new(
            EventSource::new(sensor, EventKind::SensorAccuracy),
            hook,
            AccuracyProjection,
        );

        tracing::info!(%kind, index = options.index, %sensor, "sensor bound");
        Ok(SensorCore {
            kind,
            index: options.index,
            lifecycle,
            data,
            accuracy,
            cache,
            disposed: DisposeFlag::new(),
        })
    }

    pub(crate) fn on_data<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(&SensorSample) + Send + Sync + 'static,
    {
        self.ensure_live()?;
        self.data
            .subscribe(callback)
            .map_err(|error| SensorError::from_bridge(self.kind, error))
    }

    pub(crate) fn unsubscribe_data(&self, id: SubscriptionId) -> Result<()> {
        self.data
            .unsubscribe(id)
            .map_err(|error| SensorError::from_bridge(self.kind, error))
    }

    pub(crate) fn on_accuracy_changed<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(&AccuracyChange) + Send + Sync + 'static,
    {
        self.ensure_live()?;
        self.accuracy
            .subscribe(callback)
            .map_err(|error| SensorError::from_bridge(self.kind, error))
    }

    pub(crate) fn unsubscribe_accuracy(&self, id: SubscriptionId) -> Result<()> {
        self.accuracy
            .unsubscribe(id)
            .map_err(|error| SensorError::from_bridge(self.kind, error))
    }

    pub(crate) fn interval(&self) -> Duration {
        self.lifecycle.interval()
    }

    pub(crate) fn set_interval(&self, interval: Duration) -> Result<()> {
        self.ensure_live()?;
        if interval.is_zero() {
            return Err(SensorError::Native {
                kind: self.kind,
                cause: NativeCallError::new("set_interval", NativeStatus::INVALID_PARAMETER),
            });
        }
        self.lifecycle
            .set_interval(interval)
            .map_err(|cause| SensorError::from_native(self.kind, cause))
    }

    pub(crate) fn reading(&self) -> Option<SensorSample> {
        self.cache.read().clone()
    }

    pub(crate) fn is_listening(&self) -> bool {
        self.lifecycle.is_acquired()
    }

    pub(crate) fn kind(&self) -> SensorKind {
        self.kind
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.is_disposed()
    }

    /// Disposes both bridges, then force-releases the listener. Idempotent;
    /// every step runs even when an earlier one failed, and the first
    /// failure is the one reported.
    pub(crate) fn dispose(&self) -> Result<()> {
        if !self.disposed.begin() {
            return Ok(());
        }

        let mut first_error = None;
        for outcome in [self.data.dispose(), self.accuracy.dispose()] {
            if let Err(error) = outcome {
                first_error.get_or_insert(SensorError::from_bridge(self.kind, error));
            }
        }
        if let Err(cause) = self.lifecycle.force_release() {
            first_error.get_or_insert(SensorError::from_native(self.kind, cause));
        }

        tracing::info!(kind = %self.kind, index = self.index, "sensor disposed");
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.disposed.is_disposed() {
            return Err(SensorError::Disposed { kind: self.kind });
        }
        Ok(())
    }
}

impl Drop for SensorCore {
    fn drop(&mut self) {
        if self.disposed.is_disposed() {
            return;
        }
        if let Err(error) = self.dispose() {
            tracing::warn!(kind = %self.kind, %error, "sensor teardown failed during drop");
        }
    }
}

/// Whether the device carries any sensor of `kind`.
pub fn is_supported(runtime: &dyn SensorRuntime, kind: SensorKind) -> Result<bool> {
    runtime
        .is_supported(kind)
        .map_err(|cause| SensorError::from_native(kind, cause))
}

/// How many sensors of `kind` the device carries.
pub fn count(runtime: &dyn SensorRuntime, kind: SensorKind) -> Result<usize> {
    runtime
        .sensor_count(kind)
        .map_err(|cause| SensorError::from_native(kind, cause))
}
