//! Desktop window backend built on `minifb`.
//!
//! Presents the converted RGB frame as a packed 0RGB pixel buffer and
//! translates minifb key polling into [`HostEvent`]s. Closing the window is
//! the quit signal.

use anyhow::anyhow;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use super::{Display, HostEvent, HostKey};
use crate::video::RgbFrame;

#[derive(Default)]
pub struct WindowDisplay {
    window: Option<Window>,
}

impl WindowDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for WindowDisplay {
    fn open(&mut self, width: u32, height: u32, title: &str) -> anyhow::Result<()> {
        let window = Window::new(
            title,
            width as usize,
            height as usize,
            WindowOptions::default(),
        )
        .map_err(|e| anyhow!("failed to open {width}x{height} window: {e}"))?;
        self.window = Some(window);
        Ok(())
    }

    fn present(&mut self, frame: &RgbFrame) -> anyhow::Result<()> {
        let window = self
            .window
            .as_mut()
            .ok_or_else(|| anyhow!("present called before the window was opened"))?;

        let width = frame.width() as usize;
        let height = frame.height() as usize;

        // minifb wants row-major packed 0RGB.
        let mut buffer = vec![0u32; width * height];
        for row in 0..height {
            for col in 0..width {
                let (r, g, b) = frame.rgb_at(col as u32, row as u32);
                buffer[row * width + col] =
                    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32);
            }
        }

        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| anyhow!("failed to present frame: {e}"))
    }

    fn poll_events(&mut self) -> Vec<HostEvent> {
        let Some(window) = self.window.as_mut() else {
            return Vec::new();
        };
        if !window.is_open() {
            return vec![HostEvent::Quit];
        }

        // Key state was refreshed by the last `update_with_buffer`; the guest
        // presents every tick, so polling here observes the current frame's
        // edges.
        let mut events = Vec::new();
        for key in window.get_keys_pressed(KeyRepeat::No) {
            events.push(HostEvent::Key {
                pressed: true,
                key: map_key(key),
                character: key_character(key),
            });
        }
        for key in window.get_keys_released() {
            events.push(HostEvent::Key {
                pressed: false,
                key: map_key(key),
                character: key_character(key),
            });
        }
        events
    }

    fn close(&mut self) {
        self.window = None;
    }
}

/// Map a minifb key onto the translator's host-key vocabulary.
fn map_key(key: Key) -> Option<HostKey> {
    match key {
        Key::Left => Some(HostKey::Left),
        Key::Right => Some(HostKey::Right),
        Key::Up => Some(HostKey::Up),
        Key::Down => Some(HostKey::Down),
        Key::Comma => Some(HostKey::Comma),
        Key::Period => Some(HostKey::Period),
        Key::LeftCtrl => Some(HostKey::LeftCtrl),
        Key::RightCtrl => Some(HostKey::RightCtrl),
        Key::Space => Some(HostKey::Space),
        Key::LeftShift => Some(HostKey::LeftShift),
        Key::RightShift => Some(HostKey::RightShift),
        Key::Tab => Some(HostKey::Tab),
        Key::Escape => Some(HostKey::Escape),
        Key::Enter => Some(HostKey::Enter),
        Key::Backspace => Some(HostKey::Backspace),
        Key::LeftAlt => Some(HostKey::LeftAlt),
        Key::RightAlt => Some(HostKey::RightAlt),
        _ => None,
    }
}

/// The unmodified printable character a key produces, if any. Drives the
/// Unicode fallback for keys without a guest label.
fn key_character(key: Key) -> Option<char> {
    let c = match key {
        Key::A => 'a',
        Key::B => 'b',
        Key::C => 'c',
        Key::D => 'd',
        Key::E => 'e',
        Key::F => 'f',
        Key::G => 'g',
        Key::H => 'h',
        Key::I => 'i',
        Key::J => 'j',
        Key::K => 'k',
        Key::L => 'l',
        Key::M => 'm',
        Key::N => 'n',
        Key::O => 'o',
        Key::P => 'p',
        Key::Q => 'q',
        Key::R => 'r',
        Key::S => 's',
        Key::T => 't',
        Key::U => 'u',
        Key::V => 'v',
        Key::W => 'w',
        Key::X => 'x',
        Key::Y => 'y',
        Key::Z => 'z',
        Key::Key0 => '0',
        Key::Key1 => '1',
        Key::Key2 => '2',
        Key::Key3 => '3',
        Key::Key4 => '4',
        Key::Key5 => '5',
        Key::Key6 => '6',
        Key::Key7 => '7',
        Key::Key8 => '8',
        Key::Key9 => '9',
        Key::Minus => '-',
        Key::Equal => '=',
        Key::Slash => '/',
        Key::Backslash => '\\',
        Key::Semicolon => ';',
        Key::Apostrophe => '\'',
        Key::LeftBracket => '[',
        Key::RightBracket => ']',
        Key::Backquote => '`',
        Key::Comma => ',',
        Key::Period => '.',
        Key::Space => ' ',
        _ => return None,
    };
    Some(c)
}
