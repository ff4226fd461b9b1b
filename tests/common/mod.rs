//! Shared harness for the integration tests: a recording display backend
//! and helpers for loading WAT guests and inspecting their memory.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use doomhost::display::{Display, HostEvent};
use doomhost::video::RgbFrame;
use doomhost::{GameHost, HostContext, HostError, WadList};

/// Everything the recording backend observed, plus the event queue the next
/// poll will drain.
#[derive(Default)]
pub struct DisplayState {
    pub opened: Vec<(u32, u32, String)>,
    pub frames: Vec<RgbFrame>,
    pub queued: Vec<HostEvent>,
    pub closed: bool,
}

pub type DisplayHandle = Rc<RefCell<DisplayState>>;

/// Display backend that records instead of rendering. Tests keep the
/// returned handle to queue input events and inspect what was presented.
pub struct RecordingDisplay {
    state: DisplayHandle,
}

impl RecordingDisplay {
    pub fn new() -> (Self, DisplayHandle) {
        let state = DisplayHandle::default();
        let display = Self {
            state: Rc::clone(&state),
        };
        (display, state)
    }
}

impl Display for RecordingDisplay {
    fn open(&mut self, width: u32, height: u32, title: &str) -> anyhow::Result<()> {
        self.state
            .borrow_mut()
            .opened
            .push((width, height, title.to_string()));
        Ok(())
    }

    fn present(&mut self, frame: &RgbFrame) -> anyhow::Result<()> {
        self.state.borrow_mut().frames.push(frame.clone());
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.state.borrow_mut().queued)
    }

    fn close(&mut self) {
        self.state.borrow_mut().closed = true;
    }
}

/// Load a WAT guest against a recording display.
pub fn load_guest(wat: &str, wads: Vec<PathBuf>, save_root: PathBuf) -> (GameHost, DisplayHandle) {
    let (display, handle) = RecordingDisplay::new();
    let ctx = HostContext::new(WadList::new(wads), save_root, Box::new(display));
    let host = GameHost::load(wat.as_bytes(), ctx).expect("guest should load");
    (host, handle)
}

/// Load a WAT guest and hand back the result, for tests exercising startup
/// failures.
pub fn try_load_guest(wat: &str) -> Result<GameHost, HostError> {
    let (display, _handle) = RecordingDisplay::new();
    let ctx = HostContext::new(
        WadList::default(),
        PathBuf::from(".savegame-test"),
        Box::new(display),
    );
    GameHost::load(wat.as_bytes(), ctx)
}

/// Per-test scratch directory under the system temp dir.
pub fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("doomhost-it-{tag}-{}", std::process::id()))
}

pub fn read_guest(host: &mut GameHost, offset: usize, len: usize) -> Vec<u8> {
    let memory = host
        .instance()
        .get_memory(host.store_mut(), "memory")
        .expect("guest exports memory");
    memory.data(host.store())[offset..offset + len].to_vec()
}

pub fn read_guest_i32(host: &mut GameHost, offset: usize) -> i32 {
    let bytes = read_guest(host, offset, 4);
    i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

pub fn read_guest_i64(host: &mut GameHost, offset: usize) -> i64 {
    let bytes = read_guest(host, offset, 8);
    i64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}
