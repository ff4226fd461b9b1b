//! Main loop driver.
//!
//! Lifecycle: load (compile, bind imports, instantiate, resolve entry
//! points), then one-time guest initialization, then the tick/input loop
//! until a quit event. Execution is fully single-threaded and synchronous;
//! every host import runs inline during the guest call that issued it.

use wasmtime::{Engine, Instance, Store};

use crate::abi::GuestEntrypoints;
use crate::context::HostContext;
use crate::display::HostEvent;
use crate::error::HostError;
use crate::runtime::{bind_imports, build_registry};
use crate::{input, loader};

/// Lifecycle phase of the main loop.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Uninitialized,
    Running,
    Terminated,
}

/// A loaded guest with its bound imports and resolved entry points.
pub struct GameHost {
    store: Store<HostContext>,
    instance: Instance,
    entry: GuestEntrypoints,
    phase: Phase,
}

impl std::fmt::Debug for GameHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameHost")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl GameHost {
    /// Compile the guest, bind its declared imports against the host
    /// registry, instantiate it, and resolve its entry points.
    ///
    /// Any failure here is startup-fatal; the loop never begins.
    pub fn load(module_bytes: &[u8], ctx: HostContext) -> Result<Self, HostError> {
        let engine = Engine::default();
        let module = loader::compile_module(&engine, module_bytes)?;
        let mut store = Store::new(&engine, ctx);

        let registry = build_registry();
        let imports = bind_imports(&mut store, &module, &registry)?;
        let instance = Instance::new(&mut store, &module, &imports)
            .map_err(anyhow::Error::from)?;

        let entry = GuestEntrypoints::resolve(&instance, &mut store)?;

        Ok(Self {
            store,
            instance,
            entry,
            phase: Phase::Uninitialized,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// One-time guest initialization. Triggers the WAD size/copy protocol
    /// and display setup through the bound imports.
    pub fn init(&mut self) -> Result<(), HostError> {
        if self.phase != Phase::Uninitialized {
            return Ok(());
        }
        self.entry.init.call(&mut self.store, ())?;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Advance the guest by one tick.
    pub fn tick(&mut self) -> Result<(), HostError> {
        self.entry.tick.call(&mut self.store, ())?;
        Ok(())
    }

    /// Drain pending host input events and forward the resolvable ones.
    ///
    /// A quit event terminates the loop and releases the display; anything
    /// the input translator cannot resolve is ignored.
    pub fn pump_events(&mut self) -> Result<(), HostError> {
        let events = self.store.data_mut().display.poll_events();
        for event in events {
            match event {
                HostEvent::Quit => {
                    self.phase = Phase::Terminated;
                    self.store.data_mut().display.close();
                    return Ok(());
                }
                HostEvent::Key {
                    pressed,
                    key,
                    character,
                } => {
                    let Some(code) =
                        input::resolve(&self.instance, &mut self.store, key, character)?
                    else {
                        continue;
                    };
                    if pressed {
                        self.entry.key_down.call(&mut self.store, code)?;
                    } else {
                        self.entry.key_up.call(&mut self.store, code)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Run until the quit event: tick, then drain input, repeatedly.
    pub fn run(&mut self) -> Result<(), HostError> {
        self.init()?;
        while self.phase == Phase::Running {
            self.tick()?;
            self.pump_events()?;
        }
        Ok(())
    }

    /// The instantiated guest. Handy for reading exported globals/memory.
    pub fn instance(&self) -> Instance {
        self.instance
    }

    pub fn store(&self) -> &Store<HostContext> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<HostContext> {
        &mut self.store
    }
}
