//! Status codes returned by native entry points.

use std::fmt;

/// Result code of a native call. Zero is success, failures are negative
/// errno-flavored codes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeStatus(i32);

impl NativeStatus {
    pub const OK: NativeStatus = NativeStatus(0);
    pub const OPERATION_FAILED: NativeStatus = NativeStatus(-1);
    pub const IO_ERROR: NativeStatus = NativeStatus(-5);
    pub const TRY_AGAIN: NativeStatus = NativeStatus(-11);
    pub const OUT_OF_MEMORY: NativeStatus = NativeStatus(-12);
    pub const PERMISSION_DENIED: NativeStatus = NativeStatus(-13);
    pub const INVALID_PARAMETER: NativeStatus = NativeStatus(-22);
    pub const NOT_SUPPORTED: NativeStatus = NativeStatus(-95);

    pub fn new(code: i32) -> Self {
        NativeStatus(code)
    }

    pub fn code(self) -> i32 {
        self.0
    }

    pub fn is_ok(self) -> bool {
        self.0 == 0
    }

    fn name(self) -> &'static str {
        match self {
            Self::OK => "ok",
            Self::OPERATION_FAILED => "operation-failed",
            Self::IO_ERROR => "io-error",
            Self::TRY_AGAIN => "try-again",
            Self::OUT_OF_MEMORY => "out-of-memory",
            Self::PERMISSION_DENIED => "permission-denied",
            Self::INVALID_PARAMETER => "invalid-parameter",
            Self::NOT_SUPPORTED => "not-supported",
            _ => "unknown",
        }
    }
}

impl fmt::Debug for NativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeStatus({}, {})", self.name(), self.0)
    }
}

impl fmt::Display for NativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

/// A native entry point reported a failure status.
///
/// `operation` names the entry point the way the boundary trait spells it,
/// which keeps log lines greppable against the collaborator implementations.
#[derive(Debug, Clone, thiserror::Error)]
#[error("native call `{operation}` failed: {status}")]
pub struct NativeCallError {
    operation: &'static str,
    status: NativeStatus,
}

impl NativeCallError {
    pub fn new(operation: &'static str, status: NativeStatus) -> Self {
        NativeCallError { operation, status }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn status(&self) -> NativeStatus {
        self.status
    }
}
