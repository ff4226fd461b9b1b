//! Frame presentation: BGRA guest pixels to a host-displayable RGB image.
//!
//! The guest's framebuffer is a raw chunk of contiguous bytes, 4 per pixel,
//! ordered row-major from the top-left pixel. Each 32-bit pixel is logically
//! ARGB, but WebAssembly stores multi-byte values little-endian, so the byte
//! order from low to high is BGRA.
//!
//! Conversion is a pure layout reinterpretation plus channel surgery:
//! reshape the flat byte sequence to a column-major (column, row, channel)
//! arrangement, drop the alpha channel, and reverse the remaining channels to
//! RGB. Deterministic and lossless apart from the intentional alpha drop.

use crate::context::HostContext;
use crate::error::HostError;
use crate::memory::GuestMemory;

/// Framebuffer dimensions, fixed once by `loading.onGameInit`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    /// Validate guest-reported dimensions. Rejects non-positive sizes and
    /// buffers whose byte length would not fit the 32-bit address space.
    pub fn new(width: i32, height: i32) -> Result<Self, HostError> {
        if width <= 0 || height <= 0 {
            return Err(HostError::InvalidDimensions { width, height });
        }
        let bytes = width as u64 * height as u64 * 4;
        if bytes > u32::MAX as u64 {
            return Err(HostError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width: width as u32,
            height: height as u32,
        })
    }

    /// Exact byte length of one frame: `width * height * 4`.
    pub fn byte_len(&self) -> u32 {
        self.width * self.height * 4
    }
}

/// A converted frame: RGB triples in column-major (column, row, channel)
/// order, alpha discarded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RgbFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbFrame {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The (R, G, B) triple at a given column and row.
    pub fn rgb_at(&self, col: u32, row: u32) -> (u8, u8, u8) {
        let idx = ((col as usize * self.height as usize) + row as usize) * 3;
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Raw column-major RGB bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Convert one frame of row-major BGRA bytes into an [`RgbFrame`].
///
/// `bytes` must be exactly `size.byte_len()` long; the callers read it
/// through a bounds-checked view of that exact length.
pub fn convert_bgra(size: FrameSize, bytes: &[u8]) -> RgbFrame {
    let width = size.width as usize;
    let height = size.height as usize;
    debug_assert_eq!(bytes.len(), width * height * 4);

    let mut data = vec![0u8; width * height * 3];
    for col in 0..width {
        for row in 0..height {
            let src = (row * width + col) * 4;
            let dst = (col * height + row) * 3;
            data[dst] = bytes[src + 2]; // R
            data[dst + 1] = bytes[src + 1]; // G
            data[dst + 2] = bytes[src]; // B
        }
    }

    RgbFrame {
        width: size.width,
        height: size.height,
        data,
    }
}

/// Implementation of `ui.drawFrame`: read exactly one frame's bytes from
/// guest memory, convert, and hand the result to the display backend, which
/// presents and flips.
pub fn present_frame(
    view: &GuestMemory<'_>,
    ctx: &mut HostContext,
    buffer_offset: u32,
) -> Result<(), HostError> {
    let size = ctx.frame.ok_or(HostError::FrameNotConfigured)?;
    let bytes = view.read_bytes(buffer_offset, size.byte_len())?;
    let frame = convert_bgra(size, bytes);
    ctx.display.present(&frame).map_err(HostError::Display)
}
