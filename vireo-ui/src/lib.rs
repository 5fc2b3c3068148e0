//! # vireo-ui - Smart-Signal Bridging for Widget Wrappers
//!
//! Widget wrappers over the platform's toolkit, exposing its smart signals
//! as managed events through the [`vireo_bridge`] core. Each named signal
//! on each widget is one [`SmartEvent`]: the first subscriber connects the
//! native signal, the last unsubscribe disconnects it.
//!
//! ```text
//! Layout / List (adopt existing widget handles)
//!     ↓ on_* / unsubscribe_*
//! SmartEvent (one per signal, typed by projection)
//!     ↓ EventBridge + SignalHook
//! WidgetRuntime (toolkit connect/disconnect boundary)
//! ```
//!
//! Signal payloads come in two shapes: notification signals carry nothing
//! ([`EmptyProjection`]) and item signals carry the item handle as the
//! payload pointer itself ([`ItemProjection`]).

pub use error::{Result, UiError};
pub use events::{EmptyProjection, ItemEvent, ItemProjection};
pub use layout::Layout;
pub use list::List;
pub use runtime::WidgetRuntime;
pub use smart::SmartEvent;

mod error;
mod events;
mod layout;
mod list;
mod runtime;
mod smart;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
