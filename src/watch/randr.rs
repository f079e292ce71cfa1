//! RandR output handling
//!
//! Subscribes to OutputChange notifications, maps them to
//! `"<output> <connected|disconnected|unknown>"` messages, deduplicates,
//! and fetches/decodes the output's EDID property so the script receives
//! the monitor model as its detail argument.

use super::WatchError;
use crate::edid::{self, MonitorInfo, SignalInput};
use crate::exec::ScriptRunner;
use crate::hotplug::{DedupFilter, OutputState};
use x11rb::connection::Connection;
use x11rb::protocol::randr::{self, ConnectionExt as _, NotifyMask, Output};
use x11rb::protocol::xproto::{Atom, AtomEnum, Window};

pub(super) fn init(conn: &impl Connection, root: Window) -> Result<(), WatchError> {
    conn.randr_select_input(root, NotifyMask::OUTPUT_CHANGE)?
        .check()?;
    Ok(())
}

/// Handle one RandR notify event.
pub(super) fn handle_notify(
    conn: &impl Connection,
    edid_atom: Atom,
    ev: &randr::NotifyEvent,
    dedup: &mut DedupFilter,
    runner: &mut dyn ScriptRunner,
) -> Result<(), WatchError> {
    if ev.sub_code != randr::Notify::OUTPUT_CHANGE {
        return Ok(());
    }
    let change = ev.u.as_oc();

    let info = conn
        .randr_get_output_info(change.output, change.config_timestamp)?
        .reply()?;
    let name = String::from_utf8_lossy(&info.name).into_owned();
    let state = OutputState::from_u8(u8::from(info.connection));

    let msg = format!("{} {}", name, state);
    if !dedup.should_emit(&msg) {
        log::debug!("Same message as last time, time {}, skipping ...", info.timestamp);
        return Ok(());
    }

    log::debug!("Event: {}", msg);
    log::debug!("Time: {}", info.timestamp);
    if info.crtc == 0 {
        log::debug!("Size: {}mm x {}mm", info.mm_width, info.mm_height);
    } else if let Ok(crtc) = conn
        .randr_get_crtc_info(info.crtc, change.config_timestamp)?
        .reply()
    {
        log::debug!("CRTC: {}", info.crtc);
        log::debug!("Size: {}x{}", crtc.width, crtc.height);
    }

    // Only a freshly connected output has EDID worth reading
    let detail = if state == OutputState::Connected {
        monitor_model(conn, edid_atom, change.output).unwrap_or_default()
    } else {
        String::new()
    };

    runner.invoke("display", &name, state.as_str(), &detail);
    Ok(())
}

/// Decoded product name of an output's monitor, when it has usable EDID.
fn monitor_model(conn: &impl Connection, edid_atom: Atom, output: Output) -> Option<String> {
    let info = fetch_edid(conn, edid_atom, output)?;
    log::debug!(
        "MODEL: {} S/N: {} EXTRA: {}",
        info.product_name,
        info.serial_number,
        info.extra_string
    );
    Some(info.product_name)
}

/// Fetch and decode the EDID property of an output. Any failure along the
/// way is logged and collapses to None; a monitor without readable EDID is
/// still a valid hotplug event.
fn fetch_edid(conn: &impl Connection, edid_atom: Atom, output: Output) -> Option<MonitorInfo> {
    let reply = conn
        .randr_get_output_property(
            output,
            edid_atom,
            AtomEnum::ANY,
            0,
            edid::EDID_BLOCK_SIZE as u32,
            false,
            false,
        )
        .ok()?
        .reply()
        .ok()?;

    if reply.data.len() < edid::EDID_BLOCK_SIZE {
        log::info!(
            "Not enough EDID data found.  Need at least {} bytes, got {} bytes",
            edid::EDID_BLOCK_SIZE,
            reply.data.len()
        );
        return None;
    }

    match edid::decode(&reply.data) {
        Ok(info) => Some(info),
        Err(err) => {
            log::info!("Failed decoding EDID data: {}", err);
            None
        }
    }
}

/// Probe mode: walk every connected output and print its EDID report.
pub(super) fn probe(conn: &impl Connection, root: Window, edid_atom: Atom) -> Result<(), WatchError> {
    let res = conn.randr_get_screen_resources(root)?.reply()?;

    for &output in &res.outputs {
        let output_info = conn
            .randr_get_output_info(output, res.config_timestamp)?
            .reply()?;
        if output_info.connection != randr::Connection::CONNECTED {
            continue;
        }

        let name = String::from_utf8_lossy(&output_info.name).into_owned();
        match fetch_edid(conn, edid_atom, output) {
            Some(info) => print_report(&name, &info),
            None => println!("No EDID info for output {}", name),
        }
    }

    Ok(())
}

fn print_report(output: &str, info: &MonitorInfo) {
    println!("{}", output);
    println!("  Model       : {}", info.product_name);
    println!("  Serial Nr.  : {}", info.serial_number);
    if let Some(vendor) = &info.vendor {
        println!("  Vendor      : {}", vendor);
    }
    println!("  Width       : {}", info.width_mm);
    println!("  Height      : {}", info.height_mm);
    if let Some(ratio) = info.aspect_ratio {
        println!("  Aspect Ratio: {:.2}", ratio);
    }
    if let Some(gamma) = info.gamma {
        println!("  Gamma       : {:.2}", gamma);
    }
    if let Some(year) = info.production_year {
        println!("  Prod. Year  : {}", year);
    }
    if let Some(week) = info.production_week {
        println!("  Prod. Week  : {}", week);
    }
    if let Some(year) = info.model_year {
        println!("  Model Year  : {}", year);
    }
    println!("  Extra       : {}", info.extra_string);
    println!("  DPMS");
    println!("    Standby   : {}", info.standby);
    println!("    Suspend   : {}", info.suspend);
    println!("    Active Off: {}", info.active_off);
    match info.input {
        SignalInput::Digital {
            interface,
            rgb444,
            ycrcb444,
            ycrcb422,
        } => {
            println!("  Interface   : {}", interface);
            println!("  Display Type (digital)");
            println!("    RGB 4:4:4   : {}", rgb444);
            println!("    YCrCb 4:4:4 : {}", ycrcb444);
            println!("    YCrCb 4:2:2 : {}", ycrcb422);
        }
        SignalInput::Analog { color_type } => {
            println!("  Display Type (analog)");
            println!("    {}", color_type);
        }
    }
    println!("  EDID Version: {}.{}", info.major_version, info.minor_version);
}
