use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use isorip_core::ImageFileFormat;
use isorip_lib::{CancelToken, ExtractEvent, LocalSink, Outcome};

use crate::CliError;
use crate::open_session;

fn byte_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
        )
        .unwrap()
        .progress_chars("=> "),
    );
    bar
}

/// Run the extract command for a single file.
pub(crate) fn run_extract(
    image: &Path,
    format: Option<ImageFileFormat>,
    file: &str,
    output: &Path,
) -> Result<(), CliError> {
    let mut session = open_session(image, format)?;
    let mut sink = LocalSink;
    let cancel = CancelToken::new();

    std::fs::create_dir_all(output)?;

    let bar = byte_bar(0);
    let outcome = session.extract_file(file, output, &mut sink, &cancel, |event| {
        if let ExtractEvent::Reading {
            total_bytes,
            bytes_copied,
            ..
        } = event
        {
            bar.set_length(total_bytes);
            bar.set_position(bytes_copied);
        }
    })?;
    bar.finish_and_clear();

    report(outcome, 1);
    Ok(())
}

/// Run the extract-all command.
pub(crate) fn run_extract_all(
    image: &Path,
    format: Option<ImageFileFormat>,
    output: &Path,
) -> Result<(), CliError> {
    let mut session = open_session(image, format)?;
    let mut sink = LocalSink;
    let cancel = CancelToken::new();

    std::fs::create_dir_all(output)?;

    let file_count = session
        .entries("/", true)?
        .iter()
        .filter(|e| !e.is_directory)
        .count() as u64;

    let bar = ProgressBar::new(file_count);
    bar.set_style(
        ProgressStyle::with_template("{msg:<40} [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut finished = 0u64;
    let outcome = session.extract_all(output, &mut sink, &cancel, |event| {
        if let ExtractEvent::Reading {
            source_path,
            total_bytes,
            bytes_copied,
            ..
        } = event
        {
            bar.set_message(source_path);
            if bytes_copied == total_bytes {
                finished += 1;
                bar.set_position(finished);
            }
        }
    })?;
    bar.finish_and_clear();

    report(outcome, finished);
    Ok(())
}

fn report(outcome: Outcome, files: u64) {
    match outcome {
        Outcome::Completed => println!(
            "{} {files} file(s) extracted",
            "Done:".if_supports_color(Stdout, |t| t.green())
        ),
        Outcome::Aborted => println!(
            "{} extraction stopped after {files} file(s)",
            "Aborted:".if_supports_color(Stdout, |t| t.yellow())
        ),
    }
}
