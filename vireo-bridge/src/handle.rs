//! Opaque handles to native objects.

use std::ffi::c_void;
use std::fmt;
use std::num::NonZeroUsize;

/// Reference to an object owned by the native side.
///
/// A handle is nothing but the object's address. Two handles refer to the
/// same object exactly when they compare equal; no other meaning is read
/// into the value, and the handle never owns what it points to. Whichever
/// wrapper acquired the underlying resource is responsible for releasing it.
///
/// Handles are never null. Constructors return `None` for a null address so
/// the rest of the crate can rely on that.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(NonZeroUsize);

impl NativeHandle {
    /// Wraps a raw native pointer, rejecting null.
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonZeroUsize::new(ptr as usize).map(Self)
    }

    /// Wraps a raw address, rejecting zero.
    ///
    /// Mainly useful for fakes that fabricate handles without allocating.
    pub fn from_raw(addr: usize) -> Option<Self> {
        NonZeroUsize::new(addr).map(Self)
    }

    /// The handle as a raw pointer, for crossing back into native calls.
    pub fn as_ptr(self) -> *mut c_void {
        self.0.get() as *mut c_void
    }

    /// The handle as a raw address.
    pub fn as_raw(self) -> usize {
        self.0.get()
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeHandle({:#x})", self.0.get())
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0.get())
    }
}
