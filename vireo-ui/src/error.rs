//! Error types for the widget event layer.

use vireo_bridge::{BridgeError, EventSource, NativeCallError};

/// Errors surfaced by smart-signal operations.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    /// The widget toolkit refused to connect or disconnect the signal.
    #[error("smart signal operation failed for {source}: {cause}")]
    Signal {
        source: EventSource,
        #[source]
        cause: NativeCallError,
    },

    /// The event (or its owning widget wrapper) was disposed.
    #[error("smart signal {origin} is disposed")]
    Disposed { origin: EventSource },
}

impl From<BridgeError> for UiError {
    fn from(error: BridgeError) -> Self {
        match error {
            BridgeError::NativeSubscription { origin, cause } => UiError::Signal {
                source: origin,
                cause,
            },
            BridgeError::Disposed { origin } => UiError::Disposed { origin },
        }
    }
}

pub type Result<T> = std::result::Result<T, UiError>;
