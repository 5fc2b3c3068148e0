//! Error types for the sensor crate.

use vireo_bridge::{BridgeError, NativeCallError, NativeStatus};

use crate::types::SensorKind;

/// Errors surfaced by sensor construction and subscription operations.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// The device has no such sensor. Permanent for the life of the
    /// process; retrying cannot help.
    #[error("{kind} sensor is not supported on this device")]
    NotSupported { kind: SensorKind },

    /// The listener could not be acquired for a transient reason. The
    /// caller may retry the operation.
    #[error("{kind} listener unavailable ({status}); retry may succeed")]
    ListenerUnavailable {
        kind: SensorKind,
        status: NativeStatus,
    },

    /// The sensor was disposed; no further operations are accepted.
    #[error("{kind} sensor is disposed")]
    Disposed { kind: SensorKind },

    /// Any other native failure.
    #[error("{kind} sensor operation failed: {cause}")]
    Native {
        kind: SensorKind,
        #[source]
        cause: NativeCallError,
    },
}

impl SensorError {
    /// Classifies a failed native call. `NOT_SUPPORTED` is a permanent
    /// device limitation, `TRY_AGAIN`/`IO_ERROR` are worth retrying, and
    /// everything else passes through as a plain native failure.
    pub fn from_native(kind: SensorKind, cause: NativeCallError) -> Self {
        match cause.status() {
            NativeStatus::NOT_SUPPORTED => SensorError::NotSupported { kind },
            NativeStatus::TRY_AGAIN | NativeStatus::IO_ERROR => SensorError::ListenerUnavailable {
                kind,
                status: cause.status(),
            },
            _ => SensorError::Native { kind, cause },
        }
    }

    /// Maps a bridge failure onto the sensor taxonomy.
    pub fn from_bridge(kind: SensorKind, error: BridgeError) -> Self {
        match error {
            BridgeError::NativeSubscription { cause, .. } => Self::from_native(kind, cause),
            BridgeError::Disposed { .. } => SensorError::Disposed { kind },
        }
    }

    /// Whether retrying the failed operation can possibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, SensorError::ListenerUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, SensorError>;
