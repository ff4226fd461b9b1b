//! Import dispatch: the registry of host bindings and the binder that
//! matches them, positionally, against the guest's declared import list.

pub mod binder;
pub mod imports;

pub use binder::{HostBinding, ImportRegistry, Scalar, Signature, bind_imports};
pub use imports::build_registry;
