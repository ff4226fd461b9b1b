//! WAD asset loading: the two-phase size-report / copy protocol.
//!
//! Phase one (`loading.wadSizes`) writes two little-endian i32 values into
//! guest memory: the number of WAD files and their combined byte length.
//! A reported count of 0 is a sentinel meaning "no custom WADs; load the
//! built-in shareware WAD instead" — it is also the fallback when any
//! configured file cannot be sized.
//!
//! Phase two (`loading.readWads`, only called when the reported count is
//! nonzero) copies each WAD's bytes end-to-end into a guest-specified
//! destination, in list order, and writes each WAD's byte length into a
//! parallel i32 array. The destination receives exactly the previously
//! reported total, no more, no less.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HostError;
use crate::memory::GuestMemory;

/// Ordered list of WAD file paths. Order is load order and is preserved
/// end-to-end from size report through copy.
#[derive(Clone, Debug, Default)]
pub struct WadList {
    paths: Vec<PathBuf>,
}

impl WadList {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Count and combined byte length of all WADs, from file metadata.
    fn sizes(&self) -> std::io::Result<(i32, i64)> {
        let mut total: i64 = 0;
        for path in &self.paths {
            total += fs::metadata(path)?.len() as i64;
        }
        Ok((self.paths.len() as i32, total))
    }

    fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }
}

/// Implementation of `loading.wadSizes`.
///
/// A sizing failure is recoverable: it logs a diagnostic and reports the
/// 0/0 sentinel so the guest falls back to its built-in asset.
pub fn report_sizes(
    view: &mut GuestMemory<'_>,
    wads: &WadList,
    count_offset: u32,
    total_bytes_offset: u32,
) -> Result<(), HostError> {
    let (count, total) = match wads.sizes() {
        Ok((count, total)) if total <= i32::MAX as i64 => (count, total as i32),
        Ok((_, total)) => {
            log::warn!("combined WAD size {total} exceeds the 32-bit protocol limit; loading the shareware WAD instead");
            (0, 0)
        }
        Err(err) => {
            log::warn!("failed to size a WAD file: {err}; loading the shareware WAD instead");
            (0, 0)
        }
    };

    view.write_i32(count_offset, count)?;
    view.write_i32(total_bytes_offset, total)?;
    Ok(())
}

/// Implementation of `loading.readWads`.
///
/// A read failure here is fatal: sizes were already reported, and the
/// promised total byte count can no longer be delivered.
pub fn copy_wads(
    view: &mut GuestMemory<'_>,
    wads: &WadList,
    data_dest_offset: u32,
    length_array_offset: u32,
) -> Result<(), HostError> {
    let mut data_cursor = data_dest_offset;
    let mut length_cursor = length_array_offset;

    for path in wads.iter() {
        let bytes = fs::read(path).map_err(|source| HostError::WadRead {
            path: path.clone(),
            source,
        })?;

        view.write_bytes(data_cursor, &bytes)?;
        view.write_i32(length_cursor, bytes.len() as i32)?;

        data_cursor += bytes.len() as u32;
        length_cursor += 4;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::GuestMemory;
    use std::io::Write;

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("doomhost-wad-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents).unwrap();
        path
    }

    #[test]
    fn sizes_report_count_and_exact_total() {
        let dir = temp_root("sizes");
        let a = write_file(&dir, "a.wad", b"alpha");
        let b = write_file(&dir, "b.wad", b"bravo-bravo");
        let wads = WadList::new(vec![a, b]);

        let mut mem = vec![0u8; 64];
        let mut view = GuestMemory::new(&mut mem);
        report_sizes(&mut view, &wads, 0, 4).unwrap();

        assert_eq!(view.read_i32(0).unwrap(), 2);
        assert_eq!(view.read_i32(4).unwrap(), (5 + 11) as i32);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn inaccessible_wad_falls_back_to_sentinel() {
        let dir = temp_root("missing");
        let a = write_file(&dir, "a.wad", b"alpha");
        let wads = WadList::new(vec![a, dir.join("no-such.wad")]);

        let mut mem = vec![7u8; 64];
        let mut view = GuestMemory::new(&mut mem);
        report_sizes(&mut view, &wads, 0, 4).unwrap();

        assert_eq!(view.read_i32(0).unwrap(), 0);
        assert_eq!(view.read_i32(4).unwrap(), 0);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn copy_preserves_order_and_lengths() {
        let dir = temp_root("copy");
        let a = write_file(&dir, "a.wad", b"first");
        let b = write_file(&dir, "b.wad", b"the-second");
        let wads = WadList::new(vec![a, b]);

        let mut mem = vec![0u8; 256];
        let mut view = GuestMemory::new(&mut mem);
        copy_wads(&mut view, &wads, 64, 8).unwrap();

        assert_eq!(view.read_i32(8).unwrap(), 5);
        assert_eq!(view.read_i32(12).unwrap(), 10);
        assert_eq!(view.read_bytes(64, 15).unwrap(), b"firstthe-second");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn copy_of_missing_wad_is_fatal() {
        let wads = WadList::new(vec![PathBuf::from("/no/such/file.wad")]);
        let mut mem = vec![0u8; 64];
        let mut view = GuestMemory::new(&mut mem);
        assert!(matches!(
            copy_wads(&mut view, &wads, 0, 32),
            Err(HostError::WadRead { .. })
        ));
    }
}
