//! The host's import registry: every function the guest may declare,
//! registered explicitly under its qualified name with its signature and
//! memory capability.

use wasmtime::Val;

use crate::abi::host_imports;
use crate::context::{HostContext, WINDOW_TITLE};
use crate::error::HostError;
use crate::runtime::binder::{HostBinding, ImportRegistry, Scalar::*, Signature};
use crate::video::FrameSize;
use crate::{console, save, video, wad};

fn arg_i32(params: &[Val], index: usize) -> Result<i32, HostError> {
    params
        .get(index)
        .and_then(|v| v.i32())
        .ok_or(HostError::BadArgument { index })
}

/// Guest offsets are unsigned byte indexes carried in i32 slots.
fn arg_offset(params: &[Val], index: usize) -> Result<u32, HostError> {
    Ok(arg_i32(params, index)? as u32)
}

/// Build the full registry of host bindings.
///
/// Each entry states its qualified name, its exact signature, and — by
/// choosing `scalar` or `with_memory` — whether the trampoline must hand it
/// a guest memory view.
pub fn build_registry() -> ImportRegistry {
    let mut registry = ImportRegistry::default();

    registry.register(HostBinding::scalar(
        host_imports::ON_GAME_INIT,
        Signature::new(&[I32, I32], &[]),
        |ctx, params, _results| {
            let width = arg_i32(params, 0)?;
            let height = arg_i32(params, 1)?;
            if ctx.frame.is_some() {
                return Err(HostError::FrameAlreadyConfigured);
            }
            let size = FrameSize::new(width, height)?;
            ctx.display
                .open(size.width, size.height, WINDOW_TITLE)
                .map_err(HostError::Display)?;
            ctx.frame = Some(size);
            Ok(())
        },
    ));

    registry.register(HostBinding::with_memory(
        host_imports::WAD_SIZES,
        Signature::new(&[I32, I32], &[]),
        |view, ctx, params, _results| {
            let count_offset = arg_offset(params, 0)?;
            let total_offset = arg_offset(params, 1)?;
            wad::report_sizes(view, &ctx.wads, count_offset, total_offset)
        },
    ));

    registry.register(HostBinding::with_memory(
        host_imports::READ_WADS,
        Signature::new(&[I32, I32], &[]),
        |view, ctx, params, _results| {
            let data_offset = arg_offset(params, 0)?;
            let length_array_offset = arg_offset(params, 1)?;
            wad::copy_wads(view, &ctx.wads, data_offset, length_array_offset)
        },
    ));

    registry.register(HostBinding::scalar(
        host_imports::TIME_IN_MILLISECONDS,
        Signature::new(&[], &[I64]),
        |ctx, _params, results| {
            results[0] = Val::I64(ctx.elapsed_millis());
            Ok(())
        },
    ));

    registry.register(HostBinding::with_memory(
        host_imports::DRAW_FRAME,
        Signature::new(&[I32], &[]),
        |view, ctx, params, _results| {
            let buffer_offset = arg_offset(params, 0)?;
            video::present_frame(view, ctx, buffer_offset)
        },
    ));

    registry.register(HostBinding::scalar(
        host_imports::SIZE_OF_SAVE_GAME,
        Signature::new(&[I32], &[I32]),
        |ctx, params, results| {
            let slot = arg_i32(params, 0)?;
            results[0] = Val::I32(save::size_of(&ctx.save_root, slot));
            Ok(())
        },
    ));

    registry.register(HostBinding::with_memory(
        host_imports::READ_SAVE_GAME,
        Signature::new(&[I32, I32], &[I32]),
        |view, ctx, params, results| {
            let slot = arg_i32(params, 0)?;
            let dest_offset = arg_offset(params, 1)?;
            let copied = save::read_into(view, &ctx.save_root, slot, dest_offset)?;
            results[0] = Val::I32(copied);
            Ok(())
        },
    ));

    registry.register(HostBinding::with_memory(
        host_imports::WRITE_SAVE_GAME,
        Signature::new(&[I32, I32, I32], &[I32]),
        |view, ctx, params, results| {
            let slot = arg_i32(params, 0)?;
            let data_offset = arg_offset(params, 1)?;
            let length = arg_i32(params, 2)? as u32;
            let persisted = save::write_from(view, &ctx.save_root, slot, data_offset, length)?;
            results[0] = Val::I32(persisted);
            Ok(())
        },
    ));

    registry.register(HostBinding::with_memory(
        host_imports::ON_INFO_MESSAGE,
        Signature::new(&[I32, I32], &[]),
        |view, _ctx, params, _results| {
            console::on_info_message(view, arg_offset(params, 0)?, arg_offset(params, 1)?)
        },
    ));

    registry.register(HostBinding::with_memory(
        host_imports::ON_ERROR_MESSAGE,
        Signature::new(&[I32, I32], &[]),
        |view, _ctx, params, _results| {
            console::on_error_message(view, arg_offset(params, 0)?, arg_offset(params, 1)?)
        },
    ));

    registry
}
