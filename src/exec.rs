//! User script invocation
//!
//! Every semantic hotplug event ends in one fire-and-forget script call:
//! `<script> <kind> <subject> <action> <detail>`. Nothing is read back from
//! the child; SIGCHLD is set to be ignored so exited children are reaped by
//! the kernel without a wait loop.

use std::path::PathBuf;
use std::process::Command;

/// Seam between event handling and process spawning; test code substitutes
/// a recording implementation.
pub trait ScriptRunner {
    fn invoke(&mut self, kind: &str, subject: &str, action: &str, detail: &str);
}

/// Spawns the configured user script
#[derive(Debug, Clone)]
pub struct ScriptExec {
    script: PathBuf,
}

impl ScriptExec {
    pub fn new(script: PathBuf) -> Self {
        ScriptExec { script }
    }

    /// Stop waiting on children; must run once before the first invoke.
    #[cfg(unix)]
    pub fn init() {
        use nix::sys::signal::{signal, SigHandler, Signal};

        // SAFETY: replacing the SIGCHLD disposition with SIG_IGN touches no
        // Rust-managed state and is done before any child exists.
        if let Err(err) = unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) } {
            log::warn!("Failed to ignore SIGCHLD, children may linger: {}", err);
        }
    }
}

impl ScriptRunner for ScriptExec {
    fn invoke(&mut self, kind: &str, subject: &str, action: &str, detail: &str) {
        log::debug!(
            "Calling {} {} {} {} {}",
            self.script.display(),
            kind,
            subject,
            action,
            detail
        );

        match Command::new(&self.script)
            .args([kind, subject, action, detail])
            .spawn()
        {
            Ok(child) => log::debug!("Started {} as PID {}", self.script.display(), child.id()),
            Err(err) => log::error!("Failed calling {}: {}", self.script.display(), err),
        }
    }
}
