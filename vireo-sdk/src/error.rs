//! Unified error type over the SDK's layers.

use vireo_bridge::BridgeError;
use vireo_sensor::SensorError;
use vireo_ui::UiError;

/// Any failure the SDK surface can produce, for callers that handle the
/// layers uniformly. Each layer's own error type stays available for
/// callers that want the distinctions (retryability, in particular, lives
/// on [`SensorError::is_transient`]).
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Sensor(#[from] SensorError),

    #[error(transparent)]
    Ui(#[from] UiError),
}

pub type Result<T> = std::result::Result<T, SdkError>;
