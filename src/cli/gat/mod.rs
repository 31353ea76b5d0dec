use std::path::PathBuf;

use clap::{Args, Subcommand};
use ragnarok::open_gat;

#[derive(Debug, Args)]
pub struct GatArgs {
    #[command(subcommand)]
    pub subcommand: GatSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum GatSubcommands {
    /// Print the map dimensions.
    Info(InfoArgs),
    /// Print a single tile as JSON.
    Tile(TileArgs),
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// The path to the GAT file, e.g. "prontera.gat".
    #[arg(index = 1)]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct TileArgs {
    /// The path to the GAT file, e.g. "prontera.gat".
    #[arg(index = 1)]
    pub file: PathBuf,

    #[arg(index = 2)]
    pub x: u32,

    #[arg(index = 3)]
    pub y: u32,
}

pub fn run(args: &GatArgs) -> anyhow::Result<()> {
    match &args.subcommand {
        GatSubcommands::Info(args) => info(args),
        GatSubcommands::Tile(args) => tile(args),
    }
}

fn info(args: &InfoArgs) -> anyhow::Result<()> {
    let gat = open_gat(&args.file)?;

    println!("width: {}", gat.width());
    println!("height: {}", gat.height());

    Ok(())
}

fn tile(args: &TileArgs) -> anyhow::Result<()> {
    let gat = open_gat(&args.file)?;
    let tile = gat.get(args.x, args.y)?;

    println!("{}", serde_json::to_string_pretty(&tile)?);

    Ok(())
}
