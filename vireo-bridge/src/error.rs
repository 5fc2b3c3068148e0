//! Error types for the bridging core.

use crate::source::EventSource;
use crate::status::NativeCallError;

/// Errors surfaced by [`EventBridge`](crate::EventBridge) operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The native runtime refused to install or remove the callback. On the
    /// subscribe path the bridge state is rolled back; on teardown paths the
    /// bridge still ends Inactive and the leak is logged.
    #[error("native subscription failed for {origin}: {cause}")]
    NativeSubscription {
        origin: EventSource,
        #[source]
        cause: NativeCallError,
    },

    /// The bridge was disposed; no new subscriptions are accepted.
    #[error("event bridge for {origin} is disposed")]
    Disposed { origin: EventSource },
}

impl BridgeError {
    /// The source the failing bridge serves.
    pub fn origin(&self) -> &EventSource {
        match self {
            BridgeError::NativeSubscription { origin, .. } => origin,
            BridgeError::Disposed { origin } => origin,
        }
    }

    /// The native failure behind this error, when there is one.
    pub fn native_cause(&self) -> Option<&NativeCallError> {
        match self {
            BridgeError::NativeSubscription { cause, .. } => Some(cause),
            BridgeError::Disposed { .. } => None,
        }
    }
}

/// Why a native payload could not be translated to a managed event value.
///
/// Projection failures never reach subscribers; the event is dropped and the
/// failure is reported through the diagnostic channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("native payload was null")]
    NullPayload,

    #[error("native payload had unexpected shape: {0}")]
    UnexpectedShape(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
