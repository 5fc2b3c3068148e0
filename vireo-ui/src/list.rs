//! List widget wrapper: item smart signals.

use std::sync::Arc;

use vireo_bridge::{DisposeFlag, NativeHandle, SubscriptionId};

use crate::error::Result;
use crate::events::{ItemEvent, ItemProjection};
use crate::runtime::WidgetRuntime;
use crate::smart::SmartEvent;

/// Wrapper over an existing native list widget, exposing its item signals.
/// Each signal is bridged independently: two subscribers to `selected` cost
/// one native connect, and `selected` going quiet does not disturb
/// `activated`.
pub struct List {
    handle: NativeHandle,
    selected: SmartEvent<ItemProjection>,
    unselected: SmartEvent<ItemProjection>,
    double_clicked: SmartEvent<ItemProjection>,
    long_pressed: SmartEvent<ItemProjection>,
    activated: SmartEvent<ItemProjection>,
    disposed: DisposeFlag,
}

impl List {
    pub const SELECTED: &'static str = "selected";
    pub const UNSELECTED: &'static str = "unselected";
    pub const DOUBLE_CLICKED: &'static str = "clicked,double";
    pub const LONG_PRESSED: &'static str = "longpressed";
    pub const ACTIVATED: &'static str = "activated";

    pub fn from_handle(handle: NativeHandle, runtime: Arc<dyn WidgetRuntime>) -> Self {
        let event = |signal: &'static str| {
            SmartEvent::new(handle, signal, Arc::clone(&runtime), ItemProjection)
        };
        List {
            handle,
            selected: event(Self::SELECTED),
            unselected: event(Self::UNSELECTED),
            double_clicked: event(Self::DOUBLE_CLICKED),
            long_pressed: event(Self::LONG_PRESSED),
            activated: event(Self::ACTIVATED),
            disposed: DisposeFlag::new(),
        }
    }

    pub fn on_item_selected<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(ItemEvent) + Send + Sync + 'static,
    {
        self.selected.subscribe(move |item| callback(*item))
    }

    pub fn unsubscribe_item_selected(&self, id: SubscriptionId) -> Result<()> {
        self.selected.unsubscribe(id)
    }

    pub fn on_item_unselected<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(ItemEvent) + Send + Sync + 'static,
    {
        self.unselected.subscribe(move |item| callback(*item))
    }

    pub fn unsubscribe_item_unselected(&self, id: SubscriptionId) -> Result<()> {
        self.unselected.unsubscribe(id)
    }

    pub fn on_item_double_clicked<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(ItemEvent) + Send + Sync + 'static,
    {
        self.double_clicked.subscribe(move |item| callback(*item))
    }

    pub fn unsubscribe_item_double_clicked(&self, id: SubscriptionId) -> Result<()> {
        self.double_clicked.unsubscribe(id)
    }

    pub fn on_item_long_pressed<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(ItemEvent) + Send + Sync + 'static,
    {
        self.long_pressed.subscribe(move |item| callback(*item))
    }

    pub fn unsubscribe_item_long_pressed(&self, id: SubscriptionId) -> Result<()> {
        self.long_pressed.unsubscribe(id)
    }

    pub fn on_item_activated<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(ItemEvent) + Send + Sync + 'static,
    {
        self.activated.subscribe(move |item| callback(*item))
    }

    pub fn unsubscribe_item_activated(&self, id: SubscriptionId) -> Result<()> {
        self.activated.unsubscribe(id)
    }

    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.is_disposed()
    }

    /// Disconnects every item signal. Idempotent; all five are torn down
    /// even when one fails, and the first failure is reported.
    pub fn dispose(&self) -> Result<()> {
        if !self.disposed.begin() {
            return Ok(());
        }
        let mut first_error = None;
        for outcome in [
            self.selected.dispose(),
            self.unselected.dispose(),
            self.double_clicked.dispose(),
            self.long_pressed.dispose(),
            self.activated.dispose(),
        ] {
            if let Err(error) = outcome {
                first_error.get_or_insert(error);
            }
        }
        tracing::debug!(widget = %self.handle, "list wrapper disposed");
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Drop for List {
    fn drop(&mut self) {
        if self.disposed.is_disposed() {
            return;
        }
        if let Err(error) = self.dispose() {
            tracing::warn!(widget = %self.handle, %error, "list teardown failed during drop");
        }
    }
}
