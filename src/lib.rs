/// xhotplugd - X11 hotplug daemon
///
/// Watches RandR output changes and XInput2 device hierarchy changes and
/// invokes a user script with a description of each change. The EDID
/// decoder and the event classification layer are pure and testable; the
/// X11 plumbing lives in `watch`.

pub mod edid;
pub mod exec;
pub mod hotplug;
pub mod watch;

pub use edid::{decode, DecodeError, MonitorInfo};
pub use hotplug::{classify, ChangeAction, DedupFilter, DeviceUse, OutputState};

/// Daemon version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
