// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deckprep: class-labeled training images from card artwork
//
// Entry point. Initialises logging, parses the pipeline selection, runs the
// batch, and prints the summary.

mod batch;
mod report;
mod writer;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use deckprep_core::error::Result;
use deckprep_core::{PipelineConfig, PipelineKind};

use batch::BatchDriver;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Turn card artwork into class-labeled, augmented training images"
)]
struct Cli {
    #[command(subcommand)]
    pipeline: Pipeline,
}

#[derive(Subcommand, Debug)]
enum Pipeline {
    /// Transparent species PNGs: white background, 224x224, JPEG quality 92.
    Species(RunArgs),
    /// Finished card-face JPEGs (`NNN_label.jpg`): JPEG quality 90.
    Artwork(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Directory holding the source images.
    source: PathBuf,

    /// Output root for the class folders (default: species_white or training_data).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a JSON run report with a SHA-256 per written file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Skip sources that fail to decode instead of aborting.
    #[arg(long)]
    keep_going: bool,
}

impl Pipeline {
    fn split(self) -> (PipelineKind, RunArgs) {
        match self {
            Self::Species(args) => (PipelineKind::Species, args),
            Self::Artwork(args) => (PipelineKind::Artwork, args),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Batch aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (kind, args) = cli.pipeline.split();
    let config = PipelineConfig::for_kind(kind);
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.default_output));

    tracing::info!(pipeline = %kind, source = %args.source.display(), "Deckprep starting");

    let driver = BatchDriver::new(config, &output)?.keep_going(args.keep_going);
    let report = driver.run(&args.source)?;

    if let Some(path) = &args.report {
        report.replace_at(path)?;
    }

    println!("\nDone. {} images in {}", report.total_images, output.display());
    if !report.skipped.is_empty() {
        println!("Skipped {} file(s) with no class.", report.skipped.len());
    }
    if !report.undecodable.is_empty() {
        println!("Skipped {} unreadable file(s).", report.undecodable.len());
    }
    print_next_steps(kind, &output);
    Ok(())
}

fn print_next_steps(kind: PipelineKind, output: &Path) {
    match kind {
        PipelineKind::Species => {
            println!(
                "\nNext: Upload {}/ class folders to Teachable Machine.",
                output.display()
            );
        }
        PipelineKind::Artwork => {
            println!("\nNext: Open https://teachablemachine.withgoogle.com");
            println!("  -> Image Project -> Standard Image Model");
            println!(
                "  -> Upload {}/ folders as classes (drag each class folder)",
                output.display()
            );
            println!("  -> Train -> Export as TensorFlow.js -> Download");
            println!("  -> Extract model.json and weights into model/");
        }
    }
}
