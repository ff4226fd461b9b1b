//! The import dispatch binder.
//!
//! Wasmtime instantiation with an explicit extern list is positional: the
//! n-th extern satisfies the n-th declared import. The binder therefore
//! walks `module.imports()` in declared order, resolves each import's
//! qualified name (`module.name`) against an explicitly populated
//! [`ImportRegistry`], checks the declared type against the registry entry's
//! declared [`Signature`], and emits the ordered extern list.
//!
//! Each [`HostBinding`] states up front whether its implementation needs raw
//! guest memory access. Memory-capable bindings are wrapped in a trampoline
//! that resolves the guest's exported memory and passes a bounds-checked
//! [`GuestMemory`] view valid only for that call; scalar bindings receive
//! only the host context and their arguments.
//!
//! An unresolvable import or a type mismatch aborts startup; no partial
//! binding is attempted. The binder performs no I/O.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use wasmtime::{Caller, Extern, ExternType, Func, FuncType, Module, Store, Val, ValType};

use crate::abi::{self, MEMORY_EXPORT};
use crate::context::HostContext;
use crate::error::HostError;
use crate::memory::GuestMemory;

/// Scalar kinds the bridge's import signatures are built from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Scalar {
    I32,
    I64,
}

impl Scalar {
    fn val_type(self) -> ValType {
        match self {
            Scalar::I32 => ValType::I32,
            Scalar::I64 => ValType::I64,
        }
    }

    fn from_val_type(ty: &ValType) -> Option<Scalar> {
        match ty {
            ValType::I32 => Some(Scalar::I32),
            ValType::I64 => Some(Scalar::I64),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::I32 => write!(f, "i32"),
            Scalar::I64 => write!(f, "i64"),
        }
    }
}

/// Ordered parameter and result kinds of one import.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Signature {
    params: Vec<Scalar>,
    results: Vec<Scalar>,
}

impl Signature {
    pub fn new(params: &[Scalar], results: &[Scalar]) -> Self {
        Self {
            params: params.to_vec(),
            results: results.to_vec(),
        }
    }

    /// Build the wasmtime function type for this signature.
    pub fn func_type(&self, engine: &wasmtime::Engine) -> FuncType {
        FuncType::new(
            engine,
            self.params.iter().map(|s| s.val_type()),
            self.results.iter().map(|s| s.val_type()),
        )
    }

    /// Reduce a guest-declared function type to scalar kinds.
    ///
    /// `None` when the guest declares a non-scalar parameter or result; no
    /// registry entry can match such an import.
    pub fn of_func_type(ty: &FuncType) -> Option<Signature> {
        let params = ty
            .params()
            .map(|t| Scalar::from_val_type(&t))
            .collect::<Option<Vec<_>>>()?;
        let results = ty
            .results()
            .map(|t| Scalar::from_val_type(&t))
            .collect::<Option<Vec<_>>>()?;
        Some(Signature { params, results })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |items: &[Scalar]| {
            items
                .iter()
                .map(Scalar::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "({}) -> ({})", join(&self.params), join(&self.results))
    }
}

/// Host implementation operating purely on scalar arguments and results.
pub type ScalarHandler =
    dyn Fn(&mut HostContext, &[Val], &mut [Val]) -> Result<(), HostError> + Send + Sync;

/// Host implementation that additionally receives a transient view of the
/// guest's linear memory.
pub type MemoryHandler = dyn Fn(&mut GuestMemory<'_>, &mut HostContext, &[Val], &mut [Val]) -> Result<(), HostError>
    + Send
    + Sync;

enum Handler {
    Scalar(Arc<ScalarHandler>),
    Memory(Arc<MemoryHandler>),
}

/// One registered host implementation: qualified name, declared signature,
/// and an implementation whose memory-access capability is declared by
/// construction rather than inferred.
pub struct HostBinding {
    qualified: String,
    signature: Signature,
    handler: Handler,
}

impl HostBinding {
    /// Register an implementation that never touches guest memory.
    pub fn scalar(
        qualified: &str,
        signature: Signature,
        f: impl Fn(&mut HostContext, &[Val], &mut [Val]) -> Result<(), HostError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            qualified: qualified.to_string(),
            signature,
            handler: Handler::Scalar(Arc::new(f)),
        }
    }

    /// Register an implementation that reads or writes guest memory.
    pub fn with_memory(
        qualified: &str,
        signature: Signature,
        f: impl Fn(&mut GuestMemory<'_>, &mut HostContext, &[Val], &mut [Val]) -> Result<(), HostError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            qualified: qualified.to_string(),
            signature,
            handler: Handler::Memory(Arc::new(f)),
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Whether the execution engine must hand this binding a memory view.
    pub fn needs_memory(&self) -> bool {
        matches!(self.handler, Handler::Memory(_))
    }

    /// Materialize this binding as a typed wasmtime function in `store`.
    fn instantiate(&self, store: &mut Store<HostContext>) -> Func {
        let engine = store.engine().clone();
        let ty = self.signature.func_type(&engine);

        match &self.handler {
            Handler::Scalar(f) => {
                let f = Arc::clone(f);
                Func::new(
                    store,
                    ty,
                    move |mut caller: Caller<'_, HostContext>, params, results| {
                        f(caller.data_mut(), params, results).map_err(anyhow::Error::from)
                    },
                )
            }
            Handler::Memory(f) => {
                let f = Arc::clone(f);
                Func::new(
                    store,
                    ty,
                    move |mut caller: Caller<'_, HostContext>, params, results| {
                        let memory = caller
                            .get_export(MEMORY_EXPORT)
                            .and_then(|e| e.into_memory())
                            .ok_or_else(|| HostError::MissingExport {
                                name: MEMORY_EXPORT.into(),
                            })
                            .map_err(anyhow::Error::from)?;
                        // The view lives exactly as long as this call; the
                        // guest may move its memory between calls, never
                        // during one.
                        let (data, ctx) = memory.data_and_store_mut(&mut caller);
                        let mut view = GuestMemory::new(data);
                        f(&mut view, ctx, params, results).map_err(anyhow::Error::from)
                    },
                )
            }
        }
    }
}

/// Explicit mapping from qualified import name to host binding, populated by
/// registration at startup.
#[derive(Default)]
pub struct ImportRegistry {
    bindings: BTreeMap<String, HostBinding>,
}

impl ImportRegistry {
    pub fn register(&mut self, binding: HostBinding) -> &mut Self {
        self.bindings.insert(binding.qualified.clone(), binding);
        self
    }

    pub fn get(&self, qualified: &str) -> Option<&HostBinding> {
        self.bindings.get(qualified)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Produce the ordered extern list for `wasmtime::Instance::new`.
///
/// The output order exactly matches the guest's declared import order.
pub fn bind_imports(
    store: &mut Store<HostContext>,
    module: &Module,
    registry: &ImportRegistry,
) -> Result<Vec<Extern>, HostError> {
    let mut externs = Vec::new();

    for import in module.imports() {
        let qualified = abi::qualified_name(import.module(), import.name());

        let ExternType::Func(declared) = import.ty() else {
            return Err(HostError::NonFunctionImport { qualified });
        };

        let binding = registry
            .get(&qualified)
            .ok_or_else(|| HostError::MissingImport {
                qualified: qualified.clone(),
            })?;

        match Signature::of_func_type(&declared) {
            Some(sig) if sig == *binding.signature() => {}
            _ => {
                return Err(HostError::SignatureMismatch {
                    qualified,
                    declared: func_type_string(&declared),
                    provided: binding.signature().to_string(),
                });
            }
        }

        externs.push(Extern::Func(binding.instantiate(store)));
    }

    Ok(externs)
}

fn func_type_string(ty: &FuncType) -> String {
    let params = ty.params().map(|t| t.to_string()).collect::<Vec<_>>();
    let results = ty.results().map(|t| t.to_string()).collect::<Vec<_>>();
    format!("({}) -> ({})", params.join(", "), results.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_display_lists_params_and_results() {
        let sig = Signature::new(&[Scalar::I32, Scalar::I32], &[Scalar::I64]);
        assert_eq!(sig.to_string(), "(i32, i32) -> (i64)");
    }

    #[test]
    fn of_func_type_round_trips_scalars() {
        let engine = wasmtime::Engine::default();
        let sig = Signature::new(&[Scalar::I32], &[Scalar::I32]);
        let ty = sig.func_type(&engine);
        assert_eq!(Signature::of_func_type(&ty), Some(sig));
    }

    #[test]
    fn of_func_type_rejects_non_scalars() {
        let engine = wasmtime::Engine::default();
        let ty = FuncType::new(&engine, [ValType::F32], []);
        assert_eq!(Signature::of_func_type(&ty), None);
    }

    #[test]
    fn bindings_declare_their_memory_capability() {
        let scalar = HostBinding::scalar("m.a", Signature::new(&[], &[]), |_, _, _| Ok(()));
        let memory =
            HostBinding::with_memory("m.b", Signature::new(&[], &[]), |_, _, _, _| Ok(()));
        assert!(!scalar.needs_memory());
        assert!(memory.needs_memory());
    }
}
