//! Error taxonomy for the host bridge.

use std::io;
use std::path::PathBuf;

use crate::loader::LoadError;

/// Top-level error type for the bridge.
///
/// Startup-fatal conditions (missing import, signature mismatch, module load
/// failure) and boundary violations (out-of-range guest memory access) abort
/// the process. Asset sizing failures never appear here; they degrade to the
/// "no custom WADs" sentinel inside the loading callbacks.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The guest declares an import no host binding is registered for.
    #[error("guest imports `{qualified}` but the host registry has no binding for it")]
    MissingImport { qualified: String },

    /// The guest's declared import type does not match the registered binding.
    #[error("import `{qualified}` signature mismatch: guest declares {declared}, host provides {provided}")]
    SignatureMismatch {
        qualified: String,
        declared: String,
        provided: String,
    },

    /// The guest declares a non-function import (memory/global/table).
    #[error("import `{qualified}` is not a function import")]
    NonFunctionImport { qualified: String },

    /// A host implementation asked for a guest memory range that is out of
    /// bounds. Contract breach: the guest's declared buffer sizes did not
    /// match actual usage.
    #[error("guest memory access out of range: offset {offset}, len {len}, memory size {size}")]
    OutOfBounds { offset: u64, len: u64, size: usize },

    /// A required guest export (entry point or `memory`) is absent.
    #[error("guest does not export `{name}`")]
    MissingExport { name: String },

    /// The guest module failed to load or compile.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// An untyped host trampoline received a mistyped argument. Unreachable
    /// when the binder's signature check passed.
    #[error("host argument {index} missing or mistyped")]
    BadArgument { index: usize },

    /// `ui.drawFrame` was called before `loading.onGameInit` fixed the
    /// framebuffer dimensions.
    #[error("frame dimensions not configured; `loading.onGameInit` must run before `ui.drawFrame`")]
    FrameNotConfigured,

    /// `loading.onGameInit` was called again after dimensions were fixed.
    #[error("frame dimensions already configured; they are fixed for the process lifetime")]
    FrameAlreadyConfigured,

    /// The guest reported unusable framebuffer dimensions.
    #[error("invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// A WAD file could not be read after its size was already reported.
    /// Fatal: the previously reported total byte count can no longer be
    /// honored.
    #[error("failed to read WAD `{path}`: {source}")]
    WadRead { path: PathBuf, source: io::Error },

    /// A save slot whose size was reported as present failed to open.
    #[error("failed to read save slot {slot}: {source}")]
    SaveRead { slot: i32, source: io::Error },

    /// A save slot could not be persisted.
    #[error("failed to write save slot {slot}: {source}")]
    SaveWrite { slot: i32, source: io::Error },

    /// The display backend failed to open or present.
    #[error("display error: {0}")]
    Display(anyhow::Error),

    /// Wasmtime instantiation or guest call error (including traps raised by
    /// host bindings).
    #[error(transparent)]
    Wasmtime(#[from] anyhow::Error),
}
