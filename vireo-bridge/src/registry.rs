//! Process-wide callback registry.
//!
//! Native callback APIs take a flat function pointer plus one opaque context
//! value. The registry is the table that gives that context value a meaning:
//! every active native subscription registers a [`DispatchTarget`] and gets
//! back a [`TrampolineKey`], and the key is what crosses the boundary as the
//! context. When the native side fires, [`dispatch_trampoline`] decodes the
//! key, resolves the target, and dispatches.
//!
//! Keys are allocated from an atomic counter and never reused. A native
//! callback that fires late, after its subscription was torn down, presents
//! a key that no longer resolves and is dropped with a trace log. That is
//! the entire staleness story; there is no generation counter to keep in
//! sync.
//!
//! Resolution clones the target's `Arc` and releases all registry locks
//! before the caller dispatches, so a slow subscriber never blocks
//! registrations, and targets may register or unregister others from inside
//! their own dispatch.
//!
//! # Example
//!
//! ```rust,ignore
//! let token = registry::global().register(target);
//! native.subscribe(handle, registry::dispatch_trampoline, token.key().as_context())?;
//! // ... later, strictly before releasing the native resource:
//! registry::global().unregister(token);
//! ```

use std::ffi::c_void;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::payload::RawPayload;

/// The C-ABI shape of every native callback the bridge installs.
pub type Trampoline = unsafe extern "C" fn(payload: *const c_void, context: *mut c_void);

/// A dispatch endpoint native callbacks are routed to.
pub trait DispatchTarget: Send + Sync {
    /// Handles one native payload. Runs on whatever thread the native side
    /// delivers on; implementations contain their own failures.
    fn dispatch(&self, payload: RawPayload);
}

/// Key a native callback presents to find its managed target.
///
/// The key doubles as the opaque context pointer in native registration
/// calls. Key zero is never allocated, so a null context can never resolve.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TrampolineKey(u64);

impl TrampolineKey {
    /// The key encoded as the native context pointer.
    pub fn as_context(self) -> *mut c_void {
        self.0 as usize as *mut c_void
    }

    /// Decodes a key from the context pointer a native callback delivered.
    pub fn from_context(context: *mut c_void) -> Self {
        TrampolineKey(context as usize as u64)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TrampolineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key-{}", self.0)
    }
}

/// Proof of a live registration. Redeemed exactly once by
/// [`CallbackRegistry::unregister`]; the type is deliberately not `Copy` so
/// a registration cannot be torn down twice.
#[derive(Debug)]
pub struct RegistrationToken {
    key: TrampolineKey,
}

impl RegistrationToken {
    pub fn key(&self) -> TrampolineKey {
        self.key
    }
}

/// Table from trampoline keys to dispatch targets.
///
/// The process-wide instance behind [`global`] is the one native callbacks
/// resolve against; separate instances are only useful to unit tests.
pub struct CallbackRegistry {
    targets: DashMap<TrampolineKey, Arc<dyn DispatchTarget>>,
    next_key: AtomicU64,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        CallbackRegistry {
            targets: DashMap::new(),
            // Key 0 is reserved so a null context never resolves.
            next_key: AtomicU64::new(1),
        }
    }

    /// Registers a dispatch target and returns the token holding its fresh
    /// key. Safe to call from inside a dispatch.
    pub fn register(&self, target: Arc<dyn DispatchTarget>) -> RegistrationToken {
        let key = TrampolineKey(self.next_key.fetch_add(1, Ordering::Relaxed));
        self.targets.insert(key, target);
        tracing::trace!(%key, registered = self.targets.len(), "registered dispatch target");
        RegistrationToken { key }
    }

    /// Looks up the target for `key`, cloning it out so no registry lock is
    /// held while the caller dispatches.
    pub fn resolve(&self, key: TrampolineKey) -> Option<Arc<dyn DispatchTarget>> {
        self.targets.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    /// Removes the registration behind `token`. Returns `false` if it was
    /// already gone, which only happens if the registry was cleared out from
    /// under the token's owner.
    pub fn unregister(&self, token: RegistrationToken) -> bool {
        let removed = self.targets.remove(&token.key).is_some();
        tracing::trace!(key = %token.key, removed, "unregistered dispatch target");
        removed
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The registry every native subscription in the process goes through.
pub fn global() -> &'static CallbackRegistry {
    static REGISTRY: OnceLock<CallbackRegistry> = OnceLock::new();
    REGISTRY.get_or_init(CallbackRegistry::new)
}

/// The one C-ABI entry point handed to native registration calls.
///
/// Decodes the key from `context`, resolves it against the global registry,
/// and dispatches. Unknown keys are stale callbacks and are dropped with a
/// trace log. A panic escaping the target is caught and reported here;
/// nothing ever unwinds into the native frame.
///
/// # Safety
///
/// `payload` must follow the payload contract of the event kind the native
/// side is delivering for; it is passed through untouched. `context` must be
/// a value previously produced by [`TrampolineKey::as_context`] (or null,
/// which resolves to nothing).
pub unsafe extern "C" fn dispatch_trampoline(payload: *const c_void, context: *mut c_void) {
    let key = TrampolineKey::from_context(context);
    let Some(target) = global().resolve(key) else {
        tracing::trace!(%key, "dropping native callback with no registered target");
        return;
    };

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        target.dispatch(RawPayload::new(payload));
    }));
    if outcome.is_err() {
        tracing::error!(%key, "panic escaped a dispatch target; suppressed at the native boundary");
    }
}
