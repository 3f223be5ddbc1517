//! JSON export of player records
//!
//! Records are written as a JSON array in crawl order. Each element is an
//! object with the string fields `position`, `name`, `team`, `nationality`,
//! `height`, `weight`, `age` and `overall`.

use crate::player::PlayerRecord;
use crate::ScrapeError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes player records as a JSON array
///
/// # Arguments
///
/// * `writer` - Destination (stdout, file, buffer)
/// * `players` - Records in crawl order
/// * `pretty` - Indent the output for humans
pub fn write_players_json<W: Write>(
    mut writer: W,
    players: &[PlayerRecord],
    pretty: bool,
) -> Result<(), ScrapeError> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, players)?;
    } else {
        serde_json::to_writer(&mut writer, players)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes player records as a JSON array to a file, replacing it if present
pub fn write_players_to_path(
    path: &Path,
    players: &[PlayerRecord],
    pretty: bool,
) -> Result<(), ScrapeError> {
    let file = File::create(path)?;
    write_players_json(BufWriter::new(file), players, pretty)?;
    tracing::info!("Wrote {} players to {}", players.len(), path.display());
    Ok(())
}
