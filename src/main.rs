mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ragnarok", version, about, next_line_help(false))]
pub struct Cli {
    #[command(subcommand)]
    pub subcommand: Subcommands,
}

#[derive(Subcommand)]
pub enum Subcommands {
    Act(cli::act::ActArgs),
    Gat(cli::gat::GatArgs),
    Grf(cli::grf::GrfArgs),
    Sprite(cli::sprite::SpriteArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.subcommand {
        Subcommands::Act(args) => cli::act::run(&args)?,
        Subcommands::Gat(args) => cli::gat::run(&args)?,
        Subcommands::Grf(args) => cli::grf::run(&args)?,
        Subcommands::Sprite(args) => cli::sprite::run(&args)?,
    }

    Ok(())
}
