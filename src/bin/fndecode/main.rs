mod config;
mod decoder;
mod logger;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use fndecode::decode::NamingStyle;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Decode percent-encoded filenames and copy or move the files to a directory"
)]
pub struct Args {
    /// Files to decode
    #[arg(value_hint = clap::ValueHint::FilePath)]
    paths: Vec<String>,

    /// Raw drag-and-drop payload with paths containing spaces wrapped in braces
    #[arg(long, value_name = "DATA")]
    payload: Option<String>,

    /// Output directory [default: Desktop]
    #[arg(short, long, value_hint = clap::ValueHint::DirPath, conflicts_with = "source_dir")]
    output: Option<PathBuf>,

    /// Place decoded files next to the originals
    #[arg(short, long)]
    source_dir: bool,

    /// Move files instead of copying
    #[arg(short, long = "move")]
    move_files: bool,

    /// Naming style for names that already exist
    #[arg(short, long, value_enum)]
    naming: Option<NamingStyle>,

    /// Only print changes without copying or moving files
    #[arg(short, long)]
    print: bool,

    /// Write a log file of the processed files
    #[arg(short = 'L', long)]
    log: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        fndecode::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        let config = config::Config::from_args(args)?;
        decoder::run(&config)
    }
}
