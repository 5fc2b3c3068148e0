//! Identities of native event origins.

use std::borrow::Cow;
use std::fmt;

use crate::handle::NativeHandle;

/// Name of a widget smart signal, e.g. `"selected"` or `"language,changed"`.
///
/// Signal names are almost always string literals, so the type borrows
/// statically where it can and owns the name otherwise.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SmartName(Cow<'static, str>);

impl SmartName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for SmartName {
    fn from(name: &'static str) -> Self {
        SmartName(Cow::Borrowed(name))
    }
}

impl From<String> for SmartName {
    fn from(name: String) -> Self {
        SmartName(Cow::Owned(name))
    }
}

impl fmt::Display for SmartName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What flavor of native event a source emits.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum EventKind {
    /// Data samples from a sensor listener.
    SensorData,
    /// Accuracy changes from a sensor listener.
    SensorAccuracy,
    /// A named smart signal on a widget.
    Smart(SmartName),
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::SensorData => f.write_str("sensor-data"),
            EventKind::SensorAccuracy => f.write_str("sensor-accuracy"),
            EventKind::Smart(name) => write!(f, "smart:{}", name),
        }
    }
}

/// A native origin of events: one handle, one event kind.
///
/// Immutable once created. Sources are cheap to clone and hash, and every
/// bridge, hook call, and log line identifies itself with one.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct EventSource {
    handle: NativeHandle,
    kind: EventKind,
}

impl EventSource {
    pub fn new(handle: NativeHandle, kind: EventKind) -> Self {
        EventSource { handle, kind }
    }

    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.handle, self.kind)
    }
}
