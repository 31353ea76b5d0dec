use std::path::PathBuf;

use clap::{Args, Subcommand};
use ragnarok::open_act;

#[derive(Debug, Args)]
pub struct ActArgs {
    #[command(subcommand)]
    pub subcommand: ActSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum ActSubcommands {
    /// Print the animation set summary.
    Info(InfoArgs),
    /// Dump the whole animation set as JSON.
    Dump(InfoArgs),
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// The path to the ACT file, e.g. "cursors.act".
    #[arg(index = 1)]
    pub file: PathBuf,
}

pub fn run(args: &ActArgs) -> anyhow::Result<()> {
    match &args.subcommand {
        ActSubcommands::Info(args) => info(args),
        ActSubcommands::Dump(args) => dump(args),
    }
}

fn info(args: &InfoArgs) -> anyhow::Result<()> {
    let act = open_act(&args.file)?;

    println!("version: 0x{:X}", act.version);
    println!("animations: {}", act.animations.len());
    println!("triggers: {}", act.triggers.len());

    Ok(())
}

fn dump(args: &InfoArgs) -> anyhow::Result<()> {
    let act = open_act(&args.file)?;

    println!("{}", serde_json::to_string_pretty(&act)?);

    Ok(())
}
