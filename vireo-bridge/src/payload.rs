//! Borrowed views of native event payloads.

use std::ffi::c_void;
use std::fmt;

use crate::handle::NativeHandle;

/// The opaque payload pointer a native callback delivers.
///
/// The pointer is only valid for the duration of the callback that produced
/// it. Projections read it synchronously and copy out whatever they keep;
/// the type is deliberately not `Send`, so a payload cannot leak onto
/// another thread.
#[derive(Clone, Copy)]
pub struct RawPayload {
    ptr: *const c_void,
}

impl RawPayload {
    pub fn new(ptr: *const c_void) -> Self {
        RawPayload { ptr }
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    pub fn as_ptr(&self) -> *const c_void {
        self.ptr
    }

    /// Reinterprets the payload as a reference to `T`. Returns `None` for a
    /// null payload.
    ///
    /// # Safety
    ///
    /// The caller must know that the native side really delivered a `T` for
    /// this event kind: the pointer must be properly aligned for `T` and
    /// point to an initialized value that outlives the callback frame.
    pub unsafe fn cast<T>(&self) -> Option<&T> {
        (self.ptr as *const T).as_ref()
    }

    /// Treats the payload pointer itself as an object handle.
    ///
    /// Widget item signals deliver the item handle as the payload pointer
    /// rather than as a struct to dereference. Returns `None` when the
    /// payload is null.
    pub fn as_handle(&self) -> Option<NativeHandle> {
        NativeHandle::from_raw(self.ptr as usize)
    }
}

impl fmt::Debug for RawPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawPayload({:#x})", self.ptr as usize)
    }
}
