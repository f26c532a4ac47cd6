use anyhow::Result;
use clap::Parser;
use patiencediff::{diff_text, Differ};

use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "A tool for computing patience diffs between two files")]
struct Cli {
    /// The original file
    #[arg(short = 'i', long)]
    old: PathBuf,

    /// The new file
    #[arg(short, long)]
    new: PathBuf,

    /// Render context-windowed unified hunks instead of the full diff
    #[arg(short, long, default_value_t = false)]
    unified: bool,

    /// Number of context lines to keep before each change
    #[arg(long, default_value_t = 3)]
    precontext: usize,

    /// Number of context lines to keep after each change
    #[arg(long, default_value_t = 3)]
    postcontext: usize,

    /// The output file (defaults to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Header names are taken from the input paths, like git shows them.
    let src_header = cli
        .old
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("original")
        .to_string();
    let dst_header = cli
        .new
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("modified")
        .to_string();

    let differ = Differ::from_files(&cli.old, &cli.new)?
        .precontext(cli.precontext)
        .postcontext(cli.postcontext)
        .headers(src_header, dst_header);

    let result = if cli.unified {
        differ.unified()
    } else {
        diff_text(&differ.diff())
    };

    match cli.output {
        Some(path) => fs::write(path, result)?,
        None => println!("{}", result),
    }

    Ok(())
}
