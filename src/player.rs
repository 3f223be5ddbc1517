//! Player record type
//!
//! One [`PlayerRecord`] is built per qualifying row of the players table.
//! Values are passed through as the site formats them.

use serde::{Deserialize, Serialize};

/// Number of leading cells a row must carry to produce a record
pub const PLAYER_COLUMNS: usize = 8;

/// A single row of the players table
///
/// All fields hold the trimmed text of their source cell. Nothing is parsed
/// into numbers, so `height`, `weight`, `age` and `overall` keep whatever
/// formatting the site uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub position: String,
    pub name: String,
    pub team: String,
    pub nationality: String,
    pub height: String,
    pub weight: String,
    pub age: String,
    pub overall: String,
}

impl PlayerRecord {
    /// Builds a record from the cell texts of one row, in column order
    ///
    /// Returns `None` when fewer than [`PLAYER_COLUMNS`] cells are given.
    /// Extra trailing cells are ignored. Each value is trimmed of leading and
    /// trailing whitespace; whitespace inside a value, line breaks between
    /// nested elements included, is kept as served.
    ///
    /// # Example
    ///
    /// ```
    /// use pesdb_scrape::PlayerRecord;
    ///
    /// let record = PlayerRecord::from_cells(&[
    ///     "GK", "J. Doe", "FC Example", "BRA", "185", "80", "27", "84",
    /// ])
    /// .unwrap();
    /// assert_eq!(record.name, "J. Doe");
    /// assert_eq!(record.overall, "84");
    /// ```
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Option<Self> {
        if cells.len() < PLAYER_COLUMNS {
            return None;
        }

        let cell = |index: usize| cells[index].as_ref().trim().to_string();

        Some(Self {
            position: cell(0),
            name: cell(1),
            team: cell(2),
            nationality: cell(3),
            height: cell(4),
            weight: cell(5),
            age: cell(6),
            overall: cell(7),
        })
    }
}
