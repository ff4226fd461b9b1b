//! The ABI contract between the host bridge and the guest game module.
//!
//! ## High-level model
//! The guest is a game engine compiled to WebAssembly. It owns its linear
//! memory and its simulation; the host supplies everything with a side
//! effect, as named imports:
//!
//! - `loading.onGameInit(width: i32, height: i32)`
//! - `loading.wadSizes(countOffset: i32, totalBytesOffset: i32)`
//! - `loading.readWads(dataDestOffset: i32, lengthArrayOffset: i32)`
//! - `runtimeControl.timeInMilliseconds() -> i64`
//! - `ui.drawFrame(bufferOffset: i32)`
//! - `gameSaving.sizeOfSaveGame(slotId: i32) -> i32`
//! - `gameSaving.readSaveGame(slotId: i32, destOffset: i32) -> i32`
//! - `gameSaving.writeSaveGame(slotId: i32, dataOffset: i32, length: i32) -> i32`
//! - `console.onInfoMessage(msgOffset: i32, length: i32)`
//! - `console.onErrorMessage(msgOffset: i32, length: i32)`
//!
//! ## Exports (host -> guest) required
//! - `initGame()` — one-time initialization; triggers the two-phase WAD
//!   protocol via imports.
//! - `tickGame()` — advance the simulation by one tick.
//! - `reportKeyDown(i32)` / `reportKeyUp(i32)` — edge-triggered key events.
//! - `memory` — the linear memory every offset above indexes into.
//!
//! The guest additionally exports one i32 global per recognized key label
//! (`KEY_LEFTARROW`, `KEY_FIRE`, ...); the input translator reads those at
//! each lookup rather than caching them.

use wasmtime::{AsContextMut, Instance, TypedFunc};

use crate::error::HostError;

/// Name of the guest's exported linear memory.
pub const MEMORY_EXPORT: &str = "memory";

/// Deterministic qualified name for an import: `module` + `.` + `name`.
///
/// The import registry is keyed by this exact concatenation; binder
/// correctness depends on it holding for every import.
pub fn qualified_name(module: &str, name: &str) -> String {
    format!("{module}.{name}")
}

/// Guest export names (entry points).
pub mod guest_exports {
    /// One-time initialization, called before the main loop.
    pub const INIT_GAME: &str = "initGame";
    /// Advance the simulation by one tick.
    pub const TICK_GAME: &str = "tickGame";
    /// Edge-triggered key press, carrying a resolved guest key code.
    pub const REPORT_KEY_DOWN: &str = "reportKeyDown";
    /// Edge-triggered key release.
    pub const REPORT_KEY_UP: &str = "reportKeyUp";
}

/// Qualified names of the host imports the guest may declare.
pub mod host_imports {
    pub const ON_GAME_INIT: &str = "loading.onGameInit";
    pub const WAD_SIZES: &str = "loading.wadSizes";
    pub const READ_WADS: &str = "loading.readWads";
    pub const TIME_IN_MILLISECONDS: &str = "runtimeControl.timeInMilliseconds";
    pub const DRAW_FRAME: &str = "ui.drawFrame";
    pub const SIZE_OF_SAVE_GAME: &str = "gameSaving.sizeOfSaveGame";
    pub const READ_SAVE_GAME: &str = "gameSaving.readSaveGame";
    pub const WRITE_SAVE_GAME: &str = "gameSaving.writeSaveGame";
    pub const ON_INFO_MESSAGE: &str = "console.onInfoMessage";
    pub const ON_ERROR_MESSAGE: &str = "console.onErrorMessage";
}

/// The guest's entry points, resolved once after instantiation.
pub struct GuestEntrypoints {
    pub init: TypedFunc<(), ()>,
    pub tick: TypedFunc<(), ()>,
    pub key_down: TypedFunc<i32, ()>,
    pub key_up: TypedFunc<i32, ()>,
}

impl GuestEntrypoints {
    /// Resolve and type-check all required entry points.
    ///
    /// A missing or mistyped export is startup-fatal.
    pub fn resolve(
        instance: &Instance,
        mut store: impl AsContextMut,
    ) -> Result<Self, HostError> {
        fn required<P, R>(
            instance: &Instance,
            store: &mut impl AsContextMut,
            name: &str,
        ) -> Result<TypedFunc<P, R>, HostError>
        where
            P: wasmtime::WasmParams,
            R: wasmtime::WasmResults,
        {
            instance
                .get_typed_func::<P, R>(store.as_context_mut(), name)
                .map_err(|_| HostError::MissingExport { name: name.into() })
        }

        Ok(Self {
            init: required(instance, &mut store, guest_exports::INIT_GAME)?,
            tick: required(instance, &mut store, guest_exports::TICK_GAME)?,
            key_down: required(instance, &mut store, guest_exports::REPORT_KEY_DOWN)?,
            key_up: required(instance, &mut store, guest_exports::REPORT_KEY_UP)?,
        })
    }
}
