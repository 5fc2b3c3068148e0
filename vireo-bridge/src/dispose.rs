//! One-shot teardown latch.

use std::sync::atomic::{AtomicBool, Ordering};

/// Gate that lets teardown run exactly once.
///
/// `begin` flips the latch and returns `true` for a single caller; everyone
/// else sees a teardown already started or finished and must back off. The
/// latch is set before teardown work begins, so `is_disposed` also answers
/// "should new work be refused".
#[derive(Debug, Default)]
pub struct DisposeFlag(AtomicBool);

impl DisposeFlag {
    pub fn new() -> Self {
        DisposeFlag(AtomicBool::new(false))
    }

    /// Claims the teardown. Returns `true` exactly once.
    pub fn begin(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_disposed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
