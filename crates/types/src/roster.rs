//! Rows of the server/worker roster (`/api/v1/_servers/list_all`).
//!
//! The server emits each row as a positional array such as
//! `["dns", 1, "10.0.0.2", "main resolver", "running"]`. The first two fields
//! form the row identity; the fifth is the mutable status.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::envelope::display_cell;

/// Number of leading fields rendered as table cells.
pub const DISPLAY_FIELDS: usize = 5;

/// Index of the mutable status field.
pub const STATUS_FIELD: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("roster row needs at least two identity fields, got {0}")]
pub struct RosterRowError(pub usize);

/// Composite identity `"<field0>-<field1>"`, stable across polls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RosterKey(String);

impl RosterKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier of the row's status cell.
    pub fn status_cell_id(&self) -> String {
        format!("{}-status", self.0)
    }
}

impl fmt::Display for RosterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One roster entry with its display cells, padded to [`DISPLAY_FIELDS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    key: RosterKey,
    cells: Vec<String>,
}

impl RosterRow {
    pub fn key(&self) -> &RosterKey {
        &self.key
    }

    /// The first five fields, stringified verbatim.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn status(&self) -> &str {
        &self.cells[STATUS_FIELD]
    }
}

impl TryFrom<Vec<Value>> for RosterRow {
    type Error = RosterRowError;

    fn try_from(fields: Vec<Value>) -> Result<Self, Self::Error> {
        if fields.len() < 2 {
            return Err(RosterRowError(fields.len()));
        }
        let mut cells: Vec<String> = fields.iter().take(DISPLAY_FIELDS).map(display_cell).collect();
        cells.resize(DISPLAY_FIELDS, String::new());
        let key = RosterKey(format!("{}-{}", cells[0], cells[1]));
        Ok(Self { key, cells })
    }
}

/// `result` body of the roster endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterSnapshot {
    #[serde(default)]
    pub servers: Vec<Vec<Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_joins_first_two_fields() {
        let row = RosterRow::try_from(vec![json!("dns"), json!(1), json!("10.0.0.2"), json!("resolver"), json!("running")]).expect("row");
        assert_eq!(row.key().as_str(), "dns-1");
        assert_eq!(row.key().status_cell_id(), "dns-1-status");
        assert_eq!(row.status(), "running");
    }

    #[test]
    fn float_and_integer_ids_share_a_key() {
        let float = RosterRow::try_from(vec![json!("dns"), json!(1.0)]).expect("float id");
        let integer = RosterRow::try_from(vec![json!("dns"), json!(1)]).expect("integer id");
        assert_eq!(float.key(), integer.key());
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_truncated() {
        let short = RosterRow::try_from(vec![json!("a"), json!("b"), json!("c")]).expect("short row");
        assert_eq!(short.cells(), &["a", "b", "c", "", ""]);
        let long = RosterRow::try_from((0..8).map(|n| json!(n)).collect::<Vec<_>>()).expect("long row");
        assert_eq!(long.cells().len(), DISPLAY_FIELDS);
        assert_eq!(long.status(), "4");
    }

    #[test]
    fn rejects_rows_without_identity() {
        assert_eq!(RosterRow::try_from(vec![json!("solo")]), Err(RosterRowError(1)));
    }
}
