//! Display seam: the bridge presents frames and polls input through this
//! trait; the concrete backend (a desktop window, a test recorder) is an
//! external collaborator.

pub mod window;

use crate::video::RgbFrame;

pub use window::WindowDisplay;

/// Host keys the input translator knows a guest key label for.
///
/// Backends map only these keys; anything else reaches the translator as a
/// bare character (or nothing), which drives the Unicode fallback.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HostKey {
    Left,
    Right,
    Up,
    Down,
    Comma,
    Period,
    LeftCtrl,
    RightCtrl,
    Space,
    LeftShift,
    RightShift,
    Tab,
    Escape,
    Enter,
    Backspace,
    LeftAlt,
    RightAlt,
}

/// An input event observed by the display backend.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    /// The user asked to quit. The only event that terminates the main loop.
    Quit,
    /// A key edge. `key` is set when the backend recognizes a mapped host
    /// key; `character` is the printable character the event produced, if
    /// any.
    Key {
        pressed: bool,
        key: Option<HostKey>,
        character: Option<char>,
    },
}

/// Presentation and input backend.
///
/// Calls are blocking and strictly single-threaded; `present` is invoked
/// inline from the guest's `ui.drawFrame` import.
pub trait Display {
    /// Open the display at the fixed frame dimensions. Called once, from
    /// `loading.onGameInit`.
    fn open(&mut self, width: u32, height: u32, title: &str) -> anyhow::Result<()>;

    /// Present one converted frame and flip.
    fn present(&mut self, frame: &RgbFrame) -> anyhow::Result<()>;

    /// Drain all pending input events.
    fn poll_events(&mut self) -> Vec<HostEvent>;

    /// Release display resources. Called when the main loop terminates.
    fn close(&mut self) {}
}
