//! Host-side state shared with the import bindings.
//!
//! One [`HostContext`] is constructed at startup and lives in the wasmtime
//! `Store`; every binding that needs the WAD list, the save directory, the
//! display, or the clock receives it by reference. There is no global
//! mutable state.

use std::path::PathBuf;
use std::time::Instant;

use crate::display::Display;
use crate::video::FrameSize;
use crate::wad::WadList;

/// Window title reported to the display backend on `loading.onGameInit`.
pub const WINDOW_TITLE: &str = "DOOM";

pub struct HostContext {
    /// Ordered WAD files to feed the guest; read-only after startup.
    pub wads: WadList,
    /// Directory holding save-game slots; created lazily on first write.
    pub save_root: PathBuf,
    /// Presentation and input backend.
    pub display: Box<dyn Display>,
    /// Framebuffer dimensions, fixed once by `loading.onGameInit`.
    pub frame: Option<FrameSize>,
    epoch: Instant,
}

impl HostContext {
    pub fn new(wads: WadList, save_root: PathBuf, display: Box<dyn Display>) -> Self {
        Self {
            wads,
            save_root,
            display,
            frame: None,
            epoch: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the context was created.
    ///
    /// Backed by a monotonic clock, so the value never decreases — the only
    /// requirement `runtimeControl.timeInMilliseconds` places on the host.
    pub fn elapsed_millis(&self) -> i64 {
        self.epoch.elapsed().as_millis() as i64
    }
}
