//! Hotplug event semantics
//!
//! Maps raw X11 event fields (XInput2 device types and hierarchy change
//! masks, RandR connection states) onto the small vocabulary the user
//! script is invoked with, and suppresses duplicate notifications.

pub mod classify;
pub mod dedup;
pub mod hierarchy;

pub use classify::{classify, classify_change, classify_device, ChangeAction, Classification, DeviceUse};
pub use dedup::DedupFilter;
pub use hierarchy::{walk_hierarchy, DeviceChange};

use std::fmt;

/// RandR output connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputState {
    Connected = 0,
    Disconnected = 1,
    Unknown = 2,
}

impl OutputState {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => OutputState::Connected,
            1 => OutputState::Disconnected,
            _ => OutputState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputState::Connected => "connected",
            OutputState::Disconnected => "disconnected",
            OutputState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OutputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
