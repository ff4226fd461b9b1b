//! Save-game persistence.
//!
//! Each slot id maps to one file under the save root via a pure function:
//! `doomsav{id}.dsg`. A slot is absent until first written, its size query
//! then returns 0; writes create parent directories lazily and overwrite in
//! place. File contents are an opaque blob owned by the guest's save format.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HostError;
use crate::memory::GuestMemory;

/// Deterministic, collision-free path for a slot id.
pub fn slot_path(save_root: &Path, slot: i32) -> PathBuf {
    save_root.join(format!("doomsav{slot}.dsg"))
}

/// Implementation of `gameSaving.sizeOfSaveGame`.
///
/// Returns the backing file's byte length, or 0 if the slot was never
/// written. Never errors: absence is a normal answer, not a failure.
pub fn size_of(save_root: &Path, slot: i32) -> i32 {
    fs::metadata(slot_path(save_root, slot))
        .map(|m| m.len() as i32)
        .unwrap_or(0)
}

/// Implementation of `gameSaving.readSaveGame`.
///
/// Copies the slot's full contents into guest memory at `dest_offset` and
/// returns the number of bytes written. The guest reserved capacity based on
/// a prior size query; this function does not re-verify it. A slot that
/// fails to open here is surfaced as a failure, not silently defaulted.
pub fn read_into(
    view: &mut GuestMemory<'_>,
    save_root: &Path,
    slot: i32,
    dest_offset: u32,
) -> Result<i32, HostError> {
    let bytes = fs::read(slot_path(save_root, slot))
        .map_err(|source| HostError::SaveRead { slot, source })?;
    view.write_bytes(dest_offset, &bytes)?;
    Ok(bytes.len() as i32)
}

/// Implementation of `gameSaving.writeSaveGame`.
///
/// Reads exactly `length` bytes from guest memory, creates missing parent
/// directories, creates or truncates the backing file, and returns the
/// number of bytes persisted.
pub fn write_from(
    view: &GuestMemory<'_>,
    save_root: &Path,
    slot: i32,
    data_offset: u32,
    length: u32,
) -> Result<i32, HostError> {
    let bytes = view.read_bytes(data_offset, length)?;

    let path = slot_path(save_root, slot);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| HostError::SaveWrite { slot, source })?;
    }
    fs::write(&path, bytes).map_err(|source| HostError::SaveWrite { slot, source })?;

    Ok(bytes.len() as i32)
}
