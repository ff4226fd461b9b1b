//! Guest console output.
//!
//! The guest reports info and error messages as UTF-8 byte ranges in its own
//! memory. Info goes to stdout and errors to stderr, keeping guest traffic
//! separate from the host's own diagnostics (which use the `log` channel).

use crate::error::HostError;
use crate::memory::GuestMemory;

/// Implementation of `console.onInfoMessage`.
pub fn on_info_message(
    view: &GuestMemory<'_>,
    message_offset: u32,
    length: u32,
) -> Result<(), HostError> {
    let message = view.read_utf8(message_offset, length)?;
    println!("{message}");
    Ok(())
}

/// Implementation of `console.onErrorMessage`.
pub fn on_error_message(
    view: &GuestMemory<'_>,
    message_offset: u32,
    length: u32,
) -> Result<(), HostError> {
    let message = view.read_utf8(message_offset, length)?;
    eprintln!("{message}");
    Ok(())
}
