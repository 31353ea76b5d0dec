use std::path::PathBuf;

use clap::{Args, Subcommand};
use ragnarok::open_grf;

#[derive(Debug, Args)]
pub struct GrfArgs {
    #[command(subcommand)]
    pub subcommand: GrfSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum GrfSubcommands {
    /// Print the archive header.
    Info(InfoArgs),
    /// List every file in the archive.
    List(InfoArgs),
    /// Extract one file, or the whole archive, into a directory.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// The path to the GRF archive, e.g. "data.grf".
    #[arg(index = 1)]
    pub archive: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// The path to the GRF archive, e.g. "data.grf".
    #[arg(index = 1)]
    pub archive: PathBuf,

    /// The file to extract; extracts the whole archive when omitted.
    #[arg(index = 2)]
    pub file: Option<String>,

    /// The directory to extract into.
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn run(args: &GrfArgs) -> anyhow::Result<()> {
    match &args.subcommand {
        GrfSubcommands::Info(args) => info(args),
        GrfSubcommands::List(args) => list(args),
        GrfSubcommands::Extract(args) => extract(args),
    }
}

fn info(args: &InfoArgs) -> anyhow::Result<()> {
    let archive = open_grf(&args.archive)?;

    println!("version: 0x{:04X}", archive.version());
    println!("allow encryption: {}", archive.allow_encryption());
    println!("files: {}", archive.len());

    Ok(())
}

fn list(args: &InfoArgs) -> anyhow::Result<()> {
    let mut archive = open_grf(&args.archive)?;

    for name in archive.files()? {
        println!("{name}");
    }

    Ok(())
}

fn extract(args: &ExtractArgs) -> anyhow::Result<()> {
    let mut archive = open_grf(&args.archive)?;

    let names: Vec<String> = match &args.file {
        Some(name) => vec![name.clone()],
        None => archive.files()?.map(str::to_owned).collect(),
    };

    for name in names {
        let target = archive.extract(&name, &args.output)?;
        println!("{}", target.display());
    }

    Ok(())
}
