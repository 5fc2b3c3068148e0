//! Layout widget wrapper: platform notification signals.

use std::sync::Arc;

use vireo_bridge::{DisposeFlag, NativeHandle, SubscriptionId};

use crate::error::Result;
use crate::events::EmptyProjection;
use crate::runtime::WidgetRuntime;
use crate::smart::SmartEvent;

/// Wrapper over an existing native layout widget, exposing the toolkit's
/// language and theme change notifications. Widget construction and the
/// widget tree stay native-side; this adopts a handle it does not own.
pub struct Layout {
    handle: NativeHandle,
    language_changed: SmartEvent<EmptyProjection>,
    theme_changed: SmartEvent<EmptyProjection>,
    disposed: DisposeFlag,
}

impl Layout {
    pub const LANGUAGE_CHANGED: &'static str = "language,changed";
    pub const THEME_CHANGED: &'static str = "theme,changed";

    pub fn from_handle(handle: NativeHandle, runtime: Arc<dyn WidgetRuntime>) -> Self {
        Layout {
            handle,
            language_changed: SmartEvent::new(
                handle,
                Self::LANGUAGE_CHANGED,
                Arc::clone(&runtime),
                EmptyProjection,
            ),
            theme_changed: SmartEvent::new(
                handle,
                Self::THEME_CHANGED,
                runtime,
                EmptyProjection,
            ),
            disposed: DisposeFlag::new(),
        }
    }

    /// Notifies when the system language changes.
    pub fn on_language_changed<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.language_changed.subscribe(move |_| callback())
    }

    pub fn unsubscribe_language_changed(&self, id: SubscriptionId) -> Result<()> {
        self.language_changed.unsubscribe(id)
    }

    /// Notifies when the system theme changes.
    pub fn on_theme_changed<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.theme_changed.subscribe(move |_| callback())
    }

    pub fn unsubscribe_theme_changed(&self, id: SubscriptionId) -> Result<()> {
        self.theme_changed.unsubscribe(id)
    }

    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.is_disposed()
    }

    /// Disconnects both signals. Idempotent; every signal is torn down even
    /// when an earlier one fails, and the first failure is reported.
    pub fn dispose(&self) -> Result<()> {
        if !self.disposed.begin() {
            return Ok(());
        }
        let mut first_error = None;
        for outcome in [self.language_changed.dispose(), self.theme_changed.dispose()] {
            if let Err(error) = outcome {
                first_error.get_or_insert(error);
            }
        }
        tracing::debug!(widget = %self.handle, "layout wrapper disposed");
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Drop for Layout {
    fn drop(&mut self) {
        if self.disposed.is_disposed() {
            return;
        }
        if let Err(error) = self.dispose() {
            tracing::warn!(widget = %self.handle, %error, "layout teardown failed during drop");
        }
    }
}
