//! Input translation: host key events to guest key codes.
//!
//! Resolution is two-stage. A static table maps recognized host keys to
//! guest key *labels* (the names of i32 globals the guest exports); the
//! label's current exported value is read at each lookup, never cached,
//! because the table maps to label strings rather than numbers. Keys
//! without a table entry fall back to the Unicode code point of the
//! character the event produced. If neither resolution succeeds, the event
//! is dropped.

use wasmtime::{Instance, Store};

use crate::context::HostContext;
use crate::display::HostKey;
use crate::error::HostError;

/// Guest key label for a recognized host key.
///
/// Mirrors DOOM's control scheme: arrows to move, comma/period to strafe,
/// ctrl to fire, space to use, shift to run.
pub fn label_for(key: HostKey) -> &'static str {
    match key {
        HostKey::Left => "KEY_LEFTARROW",
        HostKey::Right => "KEY_RIGHTARROW",
        HostKey::Up => "KEY_UPARROW",
        HostKey::Down => "KEY_DOWNARROW",
        HostKey::Comma => "KEY_STRAFE_L",
        HostKey::Period => "KEY_STRAFE_R",
        HostKey::LeftCtrl | HostKey::RightCtrl => "KEY_FIRE",
        HostKey::Space => "KEY_USE",
        HostKey::LeftShift | HostKey::RightShift => "KEY_SHIFT",
        HostKey::Tab => "KEY_TAB",
        HostKey::Escape => "KEY_ESCAPE",
        HostKey::Enter => "KEY_ENTER",
        HostKey::Backspace => "KEY_BACKSPACE",
        HostKey::LeftAlt | HostKey::RightAlt => "KEY_ALT",
    }
}

/// Resolve a host key event to a guest key code.
///
/// Returns `Ok(None)` when the event cannot be resolved and must be dropped.
/// A mapped key whose label the guest does not export is logged and dropped;
/// the table describes the host's vocabulary, not a guest obligation.
pub fn resolve(
    instance: &Instance,
    store: &mut Store<HostContext>,
    key: Option<HostKey>,
    character: Option<char>,
) -> Result<Option<i32>, HostError> {
    if let Some(key) = key {
        let label = label_for(key);
        let Some(global) = instance.get_global(&mut *store, label) else {
            log::warn!("guest exports no `{label}` key constant; dropping event");
            return Ok(None);
        };
        let Some(code) = global.get(&mut *store).i32() else {
            log::warn!("guest `{label}` export is not an i32; dropping event");
            return Ok(None);
        };
        return Ok(Some(code));
    }

    Ok(character.map(|c| c as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::HostKey;

    #[test]
    fn both_ctrls_fire_and_both_shifts_run() {
        assert_eq!(label_for(HostKey::LeftCtrl), "KEY_FIRE");
        assert_eq!(label_for(HostKey::RightCtrl), "KEY_FIRE");
        assert_eq!(label_for(HostKey::LeftShift), label_for(HostKey::RightShift));
    }

    #[test]
    fn strafe_keys_map_to_distinct_labels() {
        assert_ne!(label_for(HostKey::Comma), label_for(HostKey::Period));
    }
}
