//! Roster table
//!
//! A 2-D grid of short shift labels supplied at session start. Platforms
//! take their labels from random cells.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Labels used when no roster is supplied
pub const FALLBACK_LABELS: [&str; 8] = ["", "", "7-15", "RN-Day", "RN-Night", "OFF", "Break", "15-23"];

/// Ordered table of shift labels (rows may have different lengths)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterData {
    rows: Vec<Vec<String>>,
}

impl RosterData {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Sample roster used by the "play demo" path
    pub fn demo() -> Self {
        let rows = [
            ["John", "7-15", "7-15", "OFF", "RN-Night", "RN-Night"],
            ["Sarah", "OFF", "7-15", "7-15", "7-15", "OFF"],
            ["Mike", "RN-Day", "RN-Day", "7-15", "OFF", "OFF"],
        ];
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    /// Parse pasted spreadsheet text: one row per line, comma-separated cells
    ///
    /// Blank input yields an empty roster.
    pub fn from_csv(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::default();
        }
        Self::new(
            text.lines()
                .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pick a label from a random row and a random cell within that row
    ///
    /// An empty roster draws from [`FALLBACK_LABELS`]; an empty row yields "".
    pub fn random_label<R: Rng>(&self, rng: &mut R) -> String {
        if self.rows.is_empty() {
            let i = rng.random_range(0..FALLBACK_LABELS.len());
            return FALLBACK_LABELS[i].to_string();
        }
        let row = &self.rows[rng.random_range(0..self.rows.len())];
        if row.is_empty() {
            return String::new();
        }
        row[rng.random_range(0..row.len())].clone()
    }
}
