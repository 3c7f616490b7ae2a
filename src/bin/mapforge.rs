use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use mapforge::MapPackage;

/// Patch a base asset bundle into a finished map package.
#[derive(Parser, Debug)]
#[command(name = "mapforge", version)]
struct Cli {
    /// Base bundle to patch.
    base_bundle: PathBuf,

    /// Map data folder (songdata.json, musictrack.json, MoveSpace/, Pictos/).
    map_dir: PathBuf,

    /// Output folder for the rewritten bundle.
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let package = MapPackage::new(&cli.base_bundle, &cli.map_dir);
    let out = package
        .replace(&cli.out_dir)
        .with_context(|| format!("patch bundle '{}'", cli.base_bundle.display()))?;
    println!("Wrote {}", out.display());
    Ok(())
}
