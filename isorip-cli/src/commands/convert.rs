use std::fs::File;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use isorip_core::{ImageFileFormat, SectorGeometry, detect};
use isorip_lib::{CancelToken, ConvertEvent, ExtractError, LocalSink, Outcome, convert_to_iso};

use crate::CliError;

/// Run the convert command.
pub(crate) fn run_convert(
    image: &Path,
    format: Option<ImageFileFormat>,
    output: &Path,
) -> Result<(), CliError> {
    let geometry = resolve_geometry(image, format)?;
    log::debug!(
        "source sectors: {} bytes, user data at +{}, lead-in {} bytes",
        geometry.sector_length,
        geometry.user_data_offset,
        geometry.leading_skip
    );

    let source_len = std::fs::metadata(image)?.len();
    let target_len = (source_len / u64::from(geometry.sector_length) * 2048)
        .saturating_sub(geometry.leading_skip);

    let bar = ProgressBar::new(target_len);
    bar.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap()
            .progress_chars("=> "),
    );

    let sink = LocalSink;
    let outcome = convert_to_iso(
        image,
        &geometry,
        output,
        &sink,
        &CancelToken::new(),
        |event| {
            if let ConvertEvent::Progress { bytes_written, .. } = event {
                bar.set_position(bytes_written);
            }
        },
    )?;
    bar.finish_and_clear();

    match outcome {
        Outcome::Completed => println!(
            "{} {} written ({target_len} bytes)",
            "Done:".if_supports_color(Stdout, |t| t.green()),
            output.display()
        ),
        Outcome::Aborted => println!(
            "{} conversion stopped",
            "Aborted:".if_supports_color(Stdout, |t| t.yellow())
        ),
    }
    Ok(())
}

fn resolve_geometry(
    image: &Path,
    format: Option<ImageFileFormat>,
) -> Result<SectorGeometry, CliError> {
    let geometry = match format {
        Some(format) => format.geometry(),
        None => {
            let mut file = File::open(image)?;
            let (_, geometry) = detect::detect(image, &mut file);
            geometry
        }
    };
    if !geometry.is_known() {
        return Err(CliError::Engine(ExtractError::unknown_format(format!(
            "could not determine the sector layout of {}",
            image.display()
        ))));
    }
    Ok(geometry)
}
