//! Texel CLI - Command-line tool for inspecting and decoding DDS textures.
//!
//! This is the main entry point for the Texel command-line application.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use texel::prelude::*;

/// Texel - DDS texture inspection and decoding tool
#[derive(Parser)]
#[command(name = "texel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dimensions and pixel format of DDS files
    Info {
        /// DDS files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Decode a DDS file to PNG (or any format implied by the output extension)
    Decode {
        /// Input DDS file
        #[arg(short, long, env = "TEXEL_INPUT")]
        input: PathBuf,

        /// Output image file
        #[arg(short, long, env = "TEXEL_OUTPUT")]
        output: PathBuf,

        /// Decode truncated compressed payloads as far as they go
        #[arg(long)]
        lenient: bool,
    },

    /// Decode every DDS file under a directory
    Batch {
        /// Input directory
        #[arg(short, long, env = "TEXEL_INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "TEXEL_OUTPUT")]
        output: PathBuf,

        /// Decode truncated compressed payloads as far as they go
        #[arg(long)]
        lenient: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { files } => {
            cmd_info(&files)?;
        }
        Commands::Decode {
            input,
            output,
            lenient,
        } => {
            cmd_decode(&input, &output, lenient)?;
        }
        Commands::Batch {
            input,
            output,
            lenient,
        } => {
            cmd_batch(&input, &output, lenient)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn decode_options(lenient: bool) -> DecodeOptions {
    DecodeOptions::default().allow_truncated_payload(lenient)
}

fn cmd_info(files: &[PathBuf]) -> Result<()> {
    for path in files {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

        match probe(BufReader::new(file)) {
            Ok(info) => {
                println!(
                    "{}: {}x{} {}",
                    path.display(),
                    info.width,
                    info.height,
                    info.color_model.name()
                );
            }
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
            }
        }
    }

    Ok(())
}

fn decode_file(input: &Path, output: &Path, lenient: bool) -> Result<(u32, u32)> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = BufReader::new(file);

    let decoder = DdsDecoder::new_with(&mut reader, decode_options(lenient))
        .context("Failed to read DDS header")?;
    tracing::debug!("{}: {:?}", input.display(), decoder.surface());
    let image = decoder.read_rgba(&mut reader).context("Failed to decode DDS data")?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    image.save(output).context("Failed to write output image")?;

    Ok(image.dimensions())
}

fn cmd_decode(input: &Path, output: &Path, lenient: bool) -> Result<()> {
    println!("Decoding: {} -> {}", input.display(), output.display());

    let start = Instant::now();
    let (width, height) = decode_file(input, output, lenient)?;

    println!("Decoded {}x{} in {:?}", width, height, start.elapsed());

    Ok(())
}

fn cmd_batch(input: &Path, output: &Path, lenient: bool) -> Result<()> {
    let files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_dds(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    println!("Decoding {} DDS files from {}...", files.len(), input.display());

    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let errors = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let relative = path.strip_prefix(input).unwrap_or(path);
        let output_path = output.join(relative).with_extension("png");

        if let Err(e) = decode_file(path, &output_path, lenient) {
            pb.suspend(|| eprintln!("Error decoding {}: {:#}", path.display(), e));
            errors.fetch_add(1, Ordering::Relaxed);
        }

        pb.inc(1);
    });

    pb.finish_with_message("Done");

    let errors = errors.into_inner();
    println!(
        "Decoded {} files in {:?} ({} errors)",
        files.len() - errors,
        start.elapsed(),
        errors
    );

    Ok(())
}

fn is_dds(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("dds"))
}
