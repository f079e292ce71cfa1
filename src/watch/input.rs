//! XInput2 hierarchy handling
//!
//! Subscribes to hierarchy-changed events for all devices and translates
//! the per-device flag records into the walker's input, resolving device
//! names through XIQueryDevice.

use super::WatchError;
use crate::exec::ScriptRunner;
use crate::hotplug::{walk_hierarchy, DeviceChange};
use std::collections::HashMap;
use x11rb::connection::Connection;
use x11rb::protocol::xinput::{self, ConnectionExt as _, EventMask, XIEventMask};
use x11rb::protocol::xproto::Window;

/// XIAllDevices
const ALL_DEVICES: u16 = 0;

pub(super) fn init(conn: &impl Connection, root: Window) -> Result<(), WatchError> {
    // Announce XI2 support before selecting XI2 events
    let version = conn.xinput_xi_query_version(2, 0)?.reply()?;
    log::debug!(
        "X Input version {}.{}",
        version.major_version,
        version.minor_version
    );

    conn.xinput_xi_select_events(
        root,
        &[EventMask {
            deviceid: ALL_DEVICES,
            mask: vec![XIEventMask::HIERARCHY.into()],
        }],
    )?
    .check()?;

    Ok(())
}

/// Handle one hierarchy-changed notification.
pub(super) fn handle_hierarchy(
    conn: &impl Connection,
    ev: &xinput::HierarchyEvent,
    runner: &mut dyn ScriptRunner,
) -> Result<(), WatchError> {
    let records: Vec<DeviceChange> = ev
        .infos
        .iter()
        .map(|info| DeviceChange {
            device_id: u32::from(info.deviceid),
            use_category: u16::from(info.type_),
            change_flags: u32::from(info.flags),
        })
        .collect();

    let names = device_names(conn)?;
    walk_hierarchy(&records, |id| names.get(&id).cloned(), runner);

    Ok(())
}

/// Snapshot of the device directory, id -> display name. A device that
/// vanished between the event and the query simply resolves to nothing.
fn device_names(conn: &impl Connection) -> Result<HashMap<u32, String>, WatchError> {
    let reply = conn.xinput_xi_query_device(ALL_DEVICES)?.reply()?;

    Ok(reply
        .infos
        .iter()
        .map(|dev| {
            (
                u32::from(dev.deviceid),
                String::from_utf8_lossy(&dev.name).into_owned(),
            )
        })
        .collect())
}
