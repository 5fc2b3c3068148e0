//! The native subscribe/unsubscribe boundary.

use crate::registry::{Trampoline, TrampolineKey};
use crate::source::EventSource;
use crate::status::NativeCallError;

/// Owns the native registration entry points for a family of sources.
///
/// A hook is what an [`EventBridge`](crate::EventBridge) calls on its
/// activation edges: `subscribe` on 0→1, `unsubscribe` on 1→0 and disposal.
/// Production implementations wrap the platform's C registration calls;
/// test implementations record the trampoline and replay events through it.
///
/// Contract for implementations:
///
/// * `subscribe` installs `trampoline` with `context` as the callback for
///   `source`, and must not invoke the trampoline synchronously from inside
///   the call. The bridge holds its state lock across the activation edge;
///   deliveries start from the native side's own threads afterwards.
/// * `unsubscribe` must tolerate sources it no longer tracks and report
///   failure through the status rather than panicking.
pub trait EventHook: Send + Sync {
    fn subscribe(
        &self,
        source: &EventSource,
        trampoline: Trampoline,
        context: TrampolineKey,
    ) -> Result<(), NativeCallError>;

    fn unsubscribe(&self, source: &EventSource) -> Result<(), NativeCallError>;
}
