//! X11 event watching
//!
//! Owns the X server connection and the blocking event loop, dispatching
//! RandR output-change notifications and XInput2 hierarchy notifications to
//! their handlers. Startup failures here are fatal; failures while handling
//! a single event are logged and the event is dropped.

pub mod input;
pub mod randr;

use crate::exec::ScriptRunner;
use crate::hotplug::DedupFilter;
use std::fmt;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Atom, ConnectionExt as _, Window};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

/// Errors from the X11 layer
#[derive(Debug)]
pub enum WatchError {
    Connect(x11rb::errors::ConnectError),
    Connection(x11rb::errors::ConnectionError),
    Reply(x11rb::errors::ReplyError),
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchError::Connect(e) => write!(f, "cannot open display: {}", e),
            WatchError::Connection(e) => write!(f, "X11 connection error: {}", e),
            WatchError::Reply(e) => write!(f, "X11 request failed: {}", e),
        }
    }
}

impl std::error::Error for WatchError {}

impl From<x11rb::errors::ConnectError> for WatchError {
    fn from(e: x11rb::errors::ConnectError) -> Self {
        WatchError::Connect(e)
    }
}

impl From<x11rb::errors::ConnectionError> for WatchError {
    fn from(e: x11rb::errors::ConnectionError) -> Self {
        WatchError::Connection(e)
    }
}

impl From<x11rb::errors::ReplyError> for WatchError {
    fn from(e: x11rb::errors::ReplyError) -> Self {
        WatchError::Reply(e)
    }
}

/// X11 watcher: connection plus the little state the handlers need
pub struct Watcher {
    conn: RustConnection,
    root: Window,
    edid_atom: Atom,
    dedup: DedupFilter,
}

impl Watcher {
    /// Connect to the display named by `DISPLAY` and subscribe to RandR
    /// output changes and XInput2 hierarchy changes on the root window.
    pub fn open() -> Result<Self, WatchError> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let root = conn.setup().roots[screen_num].root;

        randr::init(&conn, root)?;
        input::init(&conn, root)?;

        let edid_atom = conn.intern_atom(false, b"EDID")?.reply()?.atom;
        conn.flush()?;

        Ok(Watcher {
            conn,
            root,
            edid_atom,
            dedup: DedupFilter::new(),
        })
    }

    /// Block on the event stream forever, invoking `runner` for each
    /// semantic change. Returns only when the connection dies.
    pub fn run(&mut self, runner: &mut dyn ScriptRunner) -> Result<(), WatchError> {
        loop {
            let event = self.conn.wait_for_event()?;
            match event {
                Event::RandrNotify(ev) => {
                    if let Err(err) = randr::handle_notify(
                        &self.conn,
                        self.edid_atom,
                        &ev,
                        &mut self.dedup,
                        runner,
                    ) {
                        log::error!("Dropping output event: {}", err);
                    }
                }
                Event::XinputHierarchy(ev) => {
                    if let Err(err) = input::handle_hierarchy(&self.conn, &ev, runner) {
                        log::error!("Dropping hierarchy event: {}", err);
                    }
                }
                other => log::trace!("Ignoring event: {:?}", other),
            }
        }
    }

    /// One-shot probe mode: report EDID details of every connected output.
    pub fn probe(&self) -> Result<(), WatchError> {
        randr::probe(&self.conn, self.root, self.edid_atom)
    }
}
