use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use isorip_core::ImageFileFormat;

use crate::CliError;
use crate::open_session;

/// Run the ls command.
pub(crate) fn run_ls(
    image: &Path,
    format: Option<ImageFileFormat>,
    path: &str,
    recursive: bool,
    dirs: bool,
    json: bool,
) -> Result<(), CliError> {
    let mut session = open_session(image, format)?;

    if dirs {
        let paths = session.directory_paths()?;
        if json {
            println!("{}", serde_json::to_string_pretty(&paths)?);
        } else {
            for p in paths {
                println!("{p}");
            }
        }
        return Ok(());
    }

    let entries = session.entries(path, recursive)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        let kind = if entry.is_directory { 'd' } else { '-' };
        let hidden = if entry.is_hidden { 'h' } else { '-' };
        let date = entry
            .recorded
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "                ".to_string());

        if entry.is_directory {
            println!(
                "{kind}{hidden} {:>10} {date} {}",
                "",
                entry
                    .full_path
                    .if_supports_color(Stdout, |t| t.cyan())
            );
        } else {
            println!("{kind}{hidden} {:>10} {date} {}", entry.size, entry.full_path);
        }
    }

    Ok(())
}
