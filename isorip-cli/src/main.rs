//! isorip CLI
//!
//! Command-line interface for reading, extracting and converting
//! ISO9660 disc images.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use isorip_core::ImageFileFormat;
use isorip_lib::ImageSession;

mod commands;
mod error;

use commands::{run_convert, run_extract, run_extract_all, run_info, run_ls};
pub(crate) use error::CliError;

#[derive(Parser)]
#[command(name = "isorip")]
#[command(about = "Read, extract and convert ISO9660 disc images", long_about = None)]
struct Cli {
    /// Source image format (iso, bin-mode1, bin-mode2-form1,
    /// bin-mode2-form2, mdf, ccd-mode1, ccd-mode2); sniffed from the
    /// file when omitted
    #[arg(short, long, global = true)]
    format: Option<ImageFileFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the volume descriptor of an image
    Info {
        /// Disc image file
        image: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List files and directories inside an image
    Ls {
        /// Disc image file
        image: PathBuf,

        /// Directory inside the image
        #[arg(default_value = "/")]
        path: String,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// List only the directory paths from the path table
        #[arg(long)]
        dirs: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract a single file from an image
    Extract {
        /// Disc image file
        image: PathBuf,

        /// Path of the file inside the image (e.g. /DOCS/README.TXT)
        file: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Extract the entire volume, recreating its directory tree
    ExtractAll {
        /// Disc image file
        image: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Convert a raw-sector dump to a plain 2048-byte ISO image
    Convert {
        /// Source image file (.bin, .mdf, .img, .cdi, .nrg)
        image: PathBuf,

        /// Destination .iso file
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { image, json } => run_info(&image, cli.format, json),
        Commands::Ls {
            image,
            path,
            recursive,
            dirs,
            json,
        } => run_ls(&image, cli.format, &path, recursive, dirs, json),
        Commands::Extract {
            image,
            file,
            output,
        } => run_extract(&image, cli.format, &file, &output),
        Commands::ExtractAll { image, output } => run_extract_all(&image, cli.format, &output),
        Commands::Convert { image, output } => run_convert(&image, cli.format, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!(
                "{} {err}",
                "Error:".if_supports_color(Stderr, |t| t.red())
            );
            ExitCode::FAILURE
        }
    }
}

/// Open a session with the explicit format when one was given,
/// otherwise sniff it.
pub(crate) fn open_session(
    image: &std::path::Path,
    format: Option<ImageFileFormat>,
) -> Result<ImageSession, CliError> {
    let session = match format {
        Some(format) => ImageSession::open(image, format)?,
        None => ImageSession::open_auto(image)?,
    };
    log::debug!("image format: {}", session.format().name());
    Ok(session)
}
