//! HTML parser for the players table
//!
//! This module turns a listing page into player records:
//! - Locates the players table (`table.players`)
//! - Walks its body rows (`tbody tr`)
//! - Maps the first eight cells of each row onto a [`PlayerRecord`]

use crate::player::{PlayerRecord, PLAYER_COLUMNS};
use crate::state::PageOutcome;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// CSS selector of the players table
pub const PLAYERS_TABLE: &str = "table.players";

/// CSS selector of data rows inside the players table
pub const PLAYER_ROWS: &str = "tbody tr";

/// Which cells of a row count towards the eight columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellPolicy {
    /// Only `td` cells (standard crawl)
    #[default]
    DataCells,

    /// Both `th` and `td` cells (bounded crawl)
    AnyCells,
}

impl CellPolicy {
    fn selector(&self) -> &'static Selector {
        match self {
            Self::DataCells => &*DATA_CELL_SELECTOR,
            Self::AnyCells => &*ANY_CELL_SELECTOR,
        }
    }
}

/// What the players table of one page yielded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableScan {
    /// The page has no players table
    NoTable,

    /// The players table has no body rows
    NoRows,

    /// The table had rows; rows with too few cells were skipped
    ///
    /// `records` may be empty when every row was skipped.
    Rows {
        records: Vec<PlayerRecord>,
        skipped: usize,
    },
}

impl TableScan {
    /// Maps the scan onto the crawl state machine
    pub fn outcome(&self) -> PageOutcome {
        match self {
            Self::NoTable => PageOutcome::NoTable,
            Self::NoRows => PageOutcome::NoRows,
            Self::Rows { .. } => PageOutcome::HasRows,
        }
    }

    /// Number of rows seen, skipped ones included
    pub fn row_count(&self) -> usize {
        match self {
            Self::Rows { records, skipped } => records.len() + skipped,
            _ => 0,
        }
    }

    pub fn into_records(self) -> Vec<PlayerRecord> {
        match self {
            Self::Rows { records, .. } => records,
            _ => Vec::new(),
        }
    }
}

// Parsed on first use; a failure here is a typo in a constant.
static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(PLAYERS_TABLE).expect("BUG: hardcoded CSS selector 'table.players' is invalid")
});

static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(PLAYER_ROWS).expect("BUG: hardcoded CSS selector 'tbody tr' is invalid")
});

static TABLE_ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.players tbody tr")
        .expect("BUG: hardcoded CSS selector 'table.players tbody tr' is invalid")
});

static DATA_CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("td").expect("BUG: hardcoded CSS selector 'td' is invalid")
});

static ANY_CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("th, td").expect("BUG: hardcoded CSS selector 'th, td' is invalid")
});

/// Extracts player records from a listing document
///
/// # Extraction Rules
///
/// - No `table.players` → [`TableScan::NoTable`]
/// - Table present but no `tbody tr` → [`TableScan::NoRows`]
/// - Each row is read left to right using the cells allowed by `policy`
/// - A row with fewer than eight cells is skipped without affecting its siblings
/// - Cell text is trimmed and otherwise passed through untouched
///
/// # Example
///
/// ```
/// use pesdb_scrape::crawler::{extract_players, CellPolicy, TableScan};
/// use scraper::Html;
///
/// let html = r#"<table class="players"><tbody>
///     <tr><td>GK</td><td>J. Doe</td><td>FC Example</td><td>BRA</td>
///         <td>185</td><td>80</td><td>27</td><td>84</td></tr>
/// </tbody></table>"#;
/// let scan = extract_players(&Html::parse_document(html), CellPolicy::DataCells);
/// assert_eq!(scan.into_records()[0].team, "FC Example");
/// ```
pub fn extract_players(document: &Html, policy: CellPolicy) -> TableScan {
    let cell_selector = policy.selector();

    let tables: Vec<ElementRef> = document.select(&TABLE_SELECTOR).collect();
    if tables.is_empty() {
        return TableScan::NoTable;
    }

    let rows: Vec<ElementRef> = tables
        .iter()
        .flat_map(|table| table.select(&ROW_SELECTOR))
        .collect();
    if rows.is_empty() {
        return TableScan::NoRows;
    }

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0;

    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .select(cell_selector)
            .map(|cell| cell.text().collect::<String>())
            .collect();

        match PlayerRecord::from_cells(&cells) {
            Some(record) => records.push(record),
            None => {
                tracing::debug!(
                    "Skipping row {}: {} cells, need {}",
                    index,
                    cells.len(),
                    PLAYER_COLUMNS
                );
                skipped += 1;
            }
        }
    }

    TableScan::Rows { records, skipped }
}

/// Returns true if the players table of the document has any body row
///
/// Used by the lookahead probe, which only needs to know that the next page
/// has data, not what it is.
pub fn has_player_rows(document: &Html) -> bool {
    document.select(&TABLE_ROW_SELECTOR).next().is_some()
}
