//! Hierarchy event walker
//!
//! One XInput2 hierarchy notification carries a record per affected device,
//! each with a bitmask of simultaneously-signalled changes. The walker
//! peels off one change bit at a time, classifying and (when actionable)
//! invoking the user script once per bit.

use super::classify::classify;
use crate::exec::ScriptRunner;

/// The change-bit space is 8 bits wide; the bound only matters if the
/// server hands us flags we can never fully drain.
const MAX_FLAG_ITERATIONS: u32 = 16;

/// One per-device record out of a hierarchy change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceChange {
    pub device_id: u32,
    /// Raw device type value, matched against the use table
    pub use_category: u16,
    /// Simultaneously-signalled change bits
    pub change_flags: u32,
}

/// Process every device record of a hierarchy notification.
///
/// `lookup_name` resolves a device id to its display name; a failed lookup
/// aborts that device's walk only, never the batch. Matched bits are
/// subtracted whether or not they were actionable, so mixed flag sets
/// always drain.
pub fn walk_hierarchy<F>(records: &[DeviceChange], mut lookup_name: F, runner: &mut dyn ScriptRunner)
where
    F: FnMut(u32) -> Option<String>,
{
    for record in records {
        let mut flags = record.change_flags;
        let mut budget = MAX_FLAG_ITERATIONS;

        while flags != 0 && budget > 0 {
            let name = match lookup_name(record.device_id) {
                Some(name) => name,
                None => {
                    log::debug!("No name for device {}, skipping", record.device_id);
                    break;
                }
            };

            let classification = match classify(record.use_category, flags) {
                Some(c) => c,
                None => break,
            };

            if classification.actionable {
                let kind = classification
                    .device_use
                    .map(|u| u.as_str())
                    .unwrap_or_default();
                runner.invoke(
                    kind,
                    &record.device_id.to_string(),
                    classification.action.as_str(),
                    &name,
                );
            } else {
                log::debug!(
                    "Skipping device {} type {} change {} name {}",
                    record.device_id,
                    classification
                        .device_use
                        .map(|u| u.as_str())
                        .unwrap_or(""),
                    classification.action,
                    name
                );
            }

            flags -= classification.action.bit();
            budget -= 1;
        }
    }
}
