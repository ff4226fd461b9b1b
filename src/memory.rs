//! Bounds-checked access to the guest's linear memory.
//!
//! A [`GuestMemory`] is a transient view over the guest's exported memory,
//! valid only for the duration of the host call that obtained it. The guest
//! exclusively owns the underlying storage and may resize it between calls,
//! so no component retains a view.
//!
//! Every operation validates `[offset, offset + len)` against the memory size
//! before touching it; out-of-range requests surface [`HostError::OutOfBounds`]
//! instead of truncating or wrapping. Multi-byte integers are written
//! little-endian, matching the guest's byte order.

use std::borrow::Cow;
use std::ops::Range;

use crate::error::HostError;

/// Transient, bounds-checked view into the guest's linear memory.
pub struct GuestMemory<'a> {
    data: &'a mut [u8],
}

impl<'a> GuestMemory<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data }
    }

    /// Size of the guest's linear memory, in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn checked_range(&self, offset: u32, len: usize) -> Result<Range<usize>, HostError> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(HostError::OutOfBounds {
            offset: offset as u64,
            len: len as u64,
            size: self.data.len(),
        })?;
        if end > self.data.len() {
            return Err(HostError::OutOfBounds {
                offset: offset as u64,
                len: len as u64,
                size: self.data.len(),
            });
        }
        Ok(start..end)
    }

    /// Read `len` bytes starting at `offset`.
    pub fn read_bytes(&self, offset: u32, len: u32) -> Result<&[u8], HostError> {
        let range = self.checked_range(offset, len as usize)?;
        Ok(&self.data[range])
    }

    /// Read `len` bytes starting at `offset` and decode them as UTF-8.
    ///
    /// Invalid sequences are replaced rather than rejected; the guest's
    /// console messages are diagnostic text, not a wire format.
    pub fn read_utf8(&self, offset: u32, len: u32) -> Result<Cow<'_, str>, HostError> {
        Ok(String::from_utf8_lossy(self.read_bytes(offset, len)?))
    }

    /// Write `bytes` into guest memory starting at `offset`.
    pub fn write_bytes(&mut self, offset: u32, bytes: &[u8]) -> Result<(), HostError> {
        let range = self.checked_range(offset, bytes.len())?;
        self.data[range].copy_from_slice(bytes);
        Ok(())
    }

    /// Write a little-endian `i32` at `offset`.
    pub fn write_i32(&mut self, offset: u32, value: i32) -> Result<(), HostError> {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    /// Read a little-endian `i32` at `offset`.
    pub fn read_i32(&self, offset: u32) -> Result<i32, HostError> {
        let bytes = self.read_bytes(offset, 4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_bytes_basic() {
        let mut data = vec![10u8, 20, 30, 40, 50];
        let view = GuestMemory::new(&mut data);
        assert_eq!(view.read_bytes(1, 3).unwrap(), &[20, 30, 40]);
    }

    #[test]
    fn read_bytes_out_of_range() {
        let mut data = vec![0u8; 4];
        let view = GuestMemory::new(&mut data);
        assert!(matches!(
            view.read_bytes(2, 3),
            Err(HostError::OutOfBounds { .. })
        ));
        assert!(matches!(
            view.read_bytes(u32::MAX, 2),
            Err(HostError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn write_bytes_rejects_overflowing_range() {
        let mut data = vec![0u8; 4];
        let mut view = GuestMemory::new(&mut data);
        assert!(view.write_bytes(3, &[1, 2]).is_err());
        // Nothing written on failure.
        assert_eq!(data, vec![0u8; 4]);
    }

    #[test]
    fn i32_round_trip_is_little_endian() {
        let mut data = vec![0u8; 8];
        let mut view = GuestMemory::new(&mut data);
        view.write_i32(2, 0x1234_5678).unwrap();
        assert_eq!(view.read_i32(2).unwrap(), 0x1234_5678);
        assert_eq!(&data[2..6], &[0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn utf8_read_is_lossy() {
        let mut data = b"ok\xFFok".to_vec();
        let view = GuestMemory::new(&mut data);
        let text = view.read_utf8(0, 5).unwrap();
        assert!(text.starts_with("ok"));
        assert!(text.ends_with("ok"));
    }
}
