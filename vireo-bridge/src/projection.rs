//! Payload projection, the typed half of the native boundary.

use crate::error::ProjectionError;
use crate::payload::RawPayload;

/// Translates raw native payloads into managed event values.
///
/// Each event kind has one projection, chosen when its bridge is built, and
/// the projection runs exactly once per delivered event no matter how many
/// subscribers are attached. Implementations do the unsafe reading of the
/// payload they know the layout of and copy out everything they return; the
/// payload pointer dies with the callback frame.
///
/// A projection may refresh caches owned by its wrapper (last-known sensor
/// reading, for example) before the value fans out. It must not call back
/// into the bridge that owns it.
pub trait PayloadProjection: Send + Sync + 'static {
    /// The managed event value subscribers receive.
    type Args: Clone + Send + 'static;

    fn project(&self, payload: RawPayload) -> Result<Self::Args, ProjectionError>;
}
