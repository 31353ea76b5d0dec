use std::{fs, path::PathBuf};

use clap::{Args, Subcommand};
use ragnarok::open_spr;

#[derive(Debug, Args)]
pub struct SpriteArgs {
    #[command(subcommand)]
    pub subcommand: SpriteSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum SpriteSubcommands {
    /// Print the sprite version and image counts.
    Info(InfoArgs),
    /// Export every image as a PNG file.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// The path to the SPR file, e.g. "cursors.spr".
    #[arg(index = 1)]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// The path to the SPR file, e.g. "cursors.spr".
    #[arg(index = 1)]
    pub file: PathBuf,

    /// The directory to write the PNG files into.
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn run(args: &SpriteArgs) -> anyhow::Result<()> {
    match &args.subcommand {
        SpriteSubcommands::Info(args) => info(args),
        SpriteSubcommands::Export(args) => export(args),
    }
}

fn info(args: &InfoArgs) -> anyhow::Result<()> {
    let spr = open_spr(&args.file)?;

    println!("version: 0x{:X}", spr.version());
    println!("palette images: {}", spr.pal_count());
    println!("direct-color images: {}", spr.rgb_count());

    Ok(())
}

fn export(args: &ExportArgs) -> anyhow::Result<()> {
    let spr = open_spr(&args.file)?;

    let stem = args
        .file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("sprite");
    fs::create_dir_all(&args.output)?;

    for index in 0..spr.len() {
        let image = spr.get(index as isize)?;
        let target = args.output.join(format!("{stem}_{index:03}.png"));
        image.to_rgba_image().save(&target)?;
        println!("{}", target.display());
    }

    Ok(())
}
