use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use doomhost::display::window::WindowDisplay;
use doomhost::{GameHost, HostContext, WadList};

#[derive(Parser)]
#[command(about = "Run a DOOM engine compiled to WebAssembly", version)]
struct Cli {
    /// Guest module: binary Wasm or WAT text.
    module: PathBuf,

    /// WAD file to expose to the guest; repeatable, order preserved.
    #[arg(long = "wad")]
    wads: Vec<PathBuf>,

    /// Directory save slots are persisted under.
    #[arg(long, default_value = ".savegame")]
    save_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let module_bytes = fs::read(&cli.module)
        .with_context(|| format!("reading guest module {}", cli.module.display()))?;

    let ctx = HostContext::new(
        WadList::new(cli.wads),
        cli.save_dir,
        Box::new(WindowDisplay::new()),
    );

    let mut host = GameHost::load(&module_bytes, ctx)?;
    host.run()?;
    Ok(())
}
