//! Host bridge for a DOOM engine compiled to WebAssembly.
//!
//! The guest owns the simulation; this crate owns everything with a side
//! effect. It compiles the guest (binary Wasm or WAT text), binds the
//! guest's declared imports positionally against an explicit registry of
//! host functions, and drives the tick/input loop against a windowed
//! display. Host state lives in a [`context::HostContext`] carried by the
//! wasmtime store; there is no global mutable state.

pub mod abi;
pub mod console;
pub mod context;
pub mod display;
pub mod error;
pub mod host;
pub mod input;
pub mod loader;
pub mod memory;
pub mod runtime;
pub mod save;
pub mod video;
pub mod wad;

pub use context::HostContext;
pub use error::HostError;
pub use host::{GameHost, Phase};
pub use wad::WadList;
