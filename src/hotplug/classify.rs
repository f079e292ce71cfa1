//! Device and change classification
//!
//! XInput2 reports a device's role as a small integer and hierarchy changes
//! as a bitmask. Both are mapped onto enums here; the change lookup keeps
//! the first-match-wins ordering of the mask table, so one raw flags value
//! can be matched and drained one bit at a time by repeated calls.

use std::fmt;

/// Device use categories (XInput2 device types, exact values)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum DeviceUse {
    MasterPointer = 1,
    MasterKeyboard = 2,
    SlavePointer = 3,
    SlaveKeyboard = 4,
    FloatingSlave = 5,
}

impl DeviceUse {
    /// Exact-match lookup over the device-type table.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(DeviceUse::MasterPointer),
            2 => Some(DeviceUse::MasterKeyboard),
            3 => Some(DeviceUse::SlavePointer),
            4 => Some(DeviceUse::SlaveKeyboard),
            5 => Some(DeviceUse::FloatingSlave),
            _ => None,
        }
    }

    /// Label passed to the user script as the event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceUse::MasterPointer => "master-pointer",
            DeviceUse::MasterKeyboard => "master-keyboard",
            DeviceUse::SlavePointer => "pointer",
            DeviceUse::SlaveKeyboard => "keyboard",
            DeviceUse::FloatingSlave => "floating-slave",
        }
    }

    pub fn is_slave(&self) -> bool {
        matches!(self, DeviceUse::SlavePointer | DeviceUse::SlaveKeyboard)
    }
}

impl fmt::Display for DeviceUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hierarchy change bits (XInput2 hierarchy mask values)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ChangeAction {
    MasterAdded = 1 << 0,
    MasterRemoved = 1 << 1,
    SlaveAdded = 1 << 2,
    SlaveRemoved = 1 << 3,
    SlaveAttached = 1 << 4,
    SlaveDetached = 1 << 5,
    Enabled = 1 << 6,
    Disabled = 1 << 7,
}

/// Table order matters: lookups take the first match.
const CHANGE_TABLE: [ChangeAction; 8] = [
    ChangeAction::MasterAdded,
    ChangeAction::MasterRemoved,
    ChangeAction::SlaveAdded,
    ChangeAction::SlaveRemoved,
    ChangeAction::SlaveAttached,
    ChangeAction::SlaveDetached,
    ChangeAction::Enabled,
    ChangeAction::Disabled,
];

impl ChangeAction {
    pub fn bit(&self) -> u32 {
        *self as u32
    }

    /// Label passed to the user script as the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::MasterAdded => "master-added",
            ChangeAction::MasterRemoved => "master-removed",
            ChangeAction::SlaveAdded => "slave-added",
            ChangeAction::SlaveRemoved => "slave-removed",
            ChangeAction::SlaveAttached => "slave-attached",
            ChangeAction::SlaveDetached => "slave-detached",
            ChangeAction::Enabled => "connected",
            ChangeAction::Disabled => "disconnected",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying one (device type, change flags) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Device role; unknown type values leave this None
    pub device_use: Option<DeviceUse>,
    /// First change bit matched in table order
    pub action: ChangeAction,
    /// Whether the caller should invoke the script for this match
    pub actionable: bool,
}

/// Exact-match device lookup; same contract as [`DeviceUse::from_u16`].
pub fn classify_device(device_type: u16) -> Option<DeviceUse> {
    DeviceUse::from_u16(device_type)
}

/// Change lookup. `strict` requires exact equality with one table entry;
/// otherwise the first entry whose bit is contained in `flags` wins.
pub fn classify_change(flags: u32, strict: bool) -> Option<ChangeAction> {
    CHANGE_TABLE.iter().copied().find(|action| {
        if strict {
            action.bit() == flags
        } else {
            action.bit() & flags != 0
        }
    })
}

/// Classify a device's pending change flags.
///
/// Returns None only when no change bit matches, which ends the caller's
/// walk over this device. A match on a non-slave device, or on anything but
/// a lone enabled/disabled bit, is reported with `actionable == false`:
/// the caller logs it and keeps draining the remaining bits.
pub fn classify(device_type: u16, change_flags: u32) -> Option<Classification> {
    let device_use = classify_device(device_type);
    let action = classify_change(change_flags, false)?;

    let slave = device_use.map(|u| u.is_slave()).unwrap_or(false);
    let lone_toggle = change_flags == ChangeAction::Enabled.bit()
        || change_flags == ChangeAction::Disabled.bit();

    Some(Classification {
        device_use,
        action,
        actionable: slave && lone_toggle,
    })
}
