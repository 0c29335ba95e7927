use std::path::Path;

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use isorip_core::ImageFileFormat;

use crate::CliError;
use crate::open_session;

/// Run the info command.
pub(crate) fn run_info(
    image: &Path,
    format: Option<ImageFileFormat>,
    json: bool,
) -> Result<(), CliError> {
    let session = open_session(image, format)?;
    let volume = session.volume();

    if json {
        println!("{}", serde_json::to_string_pretty(volume)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Image:".if_supports_color(Stdout, |t| t.bold()),
        image.display()
    );
    println!(
        "{} {}",
        "Format:".if_supports_color(Stdout, |t| t.bold()),
        session.format().name()
    );
    let geometry = session.geometry();
    println!(
        "{} {} bytes/sector, user data at +{}",
        "Sectors:".if_supports_color(Stdout, |t| t.bold()),
        geometry.sector_length,
        geometry.user_data_offset
    );
    println!();

    field("Volume", &volume.volume_identifier);
    field("System", &volume.system_identifier);
    field("Volume set", &volume.volume_set_identifier);
    field("Publisher", &volume.publisher_identifier);
    field("Preparer", &volume.data_preparer_identifier);
    field("Application", &volume.application_identifier);
    println!(
        "{:<14} {} blocks of {} bytes",
        "Space:".if_supports_color(Stdout, |t| t.bold()),
        volume.volume_space_size,
        volume.logical_block_size
    );
    date_field("Created", volume.creation_date);
    date_field("Modified", volume.modification_date);
    date_field("Expires", volume.expiration_date);
    date_field("Effective", volume.effective_date);

    Ok(())
}

fn field(label: &str, value: &str) {
    if !value.is_empty() {
        println!(
            "{:<14} {value}",
            format!("{label}:").if_supports_color(Stdout, |t| t.bold())
        );
    }
}

fn date_field(label: &str, value: Option<DateTime<Utc>>) {
    if let Some(date) = value {
        println!(
            "{:<14} {}",
            format!("{label}:").if_supports_color(Stdout, |t| t.bold()),
            date.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
}
