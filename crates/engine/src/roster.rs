//! Minimal-diff reconciliation of the server roster table.
//!
//! Each poll delivers the full row set. The reconciler keeps the rows it has
//! rendered, keyed by [`RosterKey`], and emits only what changed:
//!
//! - a new key appends a row
//! - a known key whose status differs patches that one cell
//! - a key absent from the poll removes its row
//!
//! Every stored entry carries a `seen` flag that is cleared at the start of a
//! pass; rows still unflagged after the pass are the stale ones.

use fakernet_types::roster::STATUS_FIELD;
use fakernet_types::{RosterKey, RosterRow};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::view::RenderOp;

#[derive(Debug, Clone)]
struct RosterEntry {
    cells: Vec<String>,
    seen: bool,
}

/// Rendered roster state.
#[derive(Debug, Default)]
pub struct RosterReconciler {
    entries: IndexMap<RosterKey, RosterEntry>,
}

impl RosterReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &RosterKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in the order their rows were appended.
    pub fn keys(&self) -> impl Iterator<Item = &RosterKey> {
        self.entries.keys()
    }

    /// Stored status of a known row.
    pub fn status(&self, key: &RosterKey) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|entry| entry.cells.get(STATUS_FIELD))
            .map(String::as_str)
    }

    /// Diff one poll against the rendered rows.
    pub fn reconcile(&mut self, rows: &[RosterRow]) -> Vec<RenderOp> {
        for entry in self.entries.values_mut() {
            entry.seen = false;
        }

        let mut ops = Vec::new();
        for row in rows {
            match self.entries.get_mut(row.key()) {
                None => {
                    info!(key = %row.key(), status = row.status(), "roster row added");
                    self.entries.insert(
                        row.key().clone(),
                        RosterEntry {
                            cells: row.cells().to_vec(),
                            seen: true,
                        },
                    );
                    ops.push(RenderOp::AppendRow {
                        key: row.key().clone(),
                        cells: row.cells().to_vec(),
                    });
                }
                Some(entry) => {
                    let status = &mut entry.cells[STATUS_FIELD];
                    if status.as_str() != row.status() {
                        debug!(key = %row.key(), from = %status, to = row.status(), "roster status changed");
                        *status = row.status().to_string();
                        ops.push(RenderOp::PatchStatus {
                            key: row.key().clone(),
                            status: row.status().to_string(),
                        });
                    }
                    entry.seen = true;
                }
            }
        }

        self.entries.retain(|key, entry| {
            if entry.seen {
                return true;
            }
            info!(key = %key, "roster row removed");
            ops.push(RenderOp::RemoveRow { key: key.clone() });
            false
        });
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(module: &str, id: u32, status: &str) -> RosterRow {
        RosterRow::try_from(vec![json!(module), json!(id), json!("10.0.0.2"), json!("desc"), json!(status)]).expect("row")
    }

    #[test]
    fn duplicate_key_in_one_poll_keeps_a_single_row() {
        let mut roster = RosterReconciler::new();
        let ops = roster.reconcile(&[row("dns", 1, "running"), row("dns", 1, "exited")]);
        assert_eq!(roster.len(), 1);
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[1], RenderOp::PatchStatus { ref status, .. } if status == "exited"));
    }

    #[test]
    fn empty_poll_removes_everything() {
        let mut roster = RosterReconciler::new();
        roster.reconcile(&[row("dns", 1, "running"), row("dns", 2, "running")]);
        let ops = roster.reconcile(&[]);
        assert_eq!(ops.len(), 2);
        assert!(roster.is_empty());
    }

    #[test]
    fn status_is_tracked() {
        let mut roster = RosterReconciler::new();
        roster.reconcile(&[row("dns", 1, "running")]);
        roster.reconcile(&[row("dns", 1, "exited")]);
        let key = row("dns", 1, "").key().clone();
        assert_eq!(roster.status(&key), Some("exited"));
    }
}
