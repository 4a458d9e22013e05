//! Trade store, strategy catalog, and record sink abstractions.
//!
//! The analytics layer never touches persistence directly. It loads a raw
//! table through [`TradeStore`], writes the two editable fields back through
//! the same trait, reads named strategies from a [`StrategyCatalog`], and
//! appends ingested trades to a [`RecordSink`].

pub mod csv_store;
pub mod json_catalog;
pub mod memory;

pub use csv_store::CsvTradeStore;
pub use json_catalog::JsonStrategyCatalog;
pub use memory::{MemoryStrategyCatalog, MemoryTradeStore};

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::data::normalize::canonical_cell;
use crate::data::RawTable;
use crate::domain::{EditableField, Field, StrategyEntry, TradeId, TradeRecord};

/// Errors raised by stores, catalogs, and sinks.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{source_name} unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    #[error("trade {trade_id} not found")]
    TradeNotFound { trade_id: TradeId },

    #[error("strategy '{name}' already exists")]
    StrategyExists { name: String },

    #[error("strategy '{name}' not found")]
    StrategyNotFound { name: String },

    #[error("invalid strategy name: {0:?}")]
    InvalidStrategyName(String),

    #[error("missing column: {column}")]
    MissingColumn { column: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::Unavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// The source could not be reached at all (as opposed to a rejected operation).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

/// Where trade rows live.
pub trait TradeStore: Send + Sync {
    /// Human-readable name of this store.
    fn name(&self) -> &str;

    /// Load the full trade table.
    ///
    /// An unreachable source is [`StoreError::Unavailable`]; a reachable
    /// source with no rows is an empty table.
    fn load(&self) -> Result<RawTable, StoreError>;

    /// Write one editable cell of the row whose trade id is `trade_id`.
    fn update_field(
        &mut self,
        trade_id: TradeId,
        field: EditableField,
        value: &str,
    ) -> Result<(), StoreError>;

    /// Advisory: restrict the values offered for `field` (e.g. a dropdown).
    ///
    /// Stores with no such notion accept and ignore it.
    fn set_allowed_values(
        &mut self,
        _field: EditableField,
        _values: &[String],
    ) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Named strategy rule sets, persisted independently of trades.
pub trait StrategyCatalog: Send + Sync {
    fn name(&self) -> &str;

    fn list_all(&self) -> Result<BTreeMap<String, StrategyEntry>, StoreError>;

    /// Create or replace the rule text of `name`.
    fn upsert(&mut self, name: &str, rules: &str) -> Result<(), StoreError>;

    /// Create `name`; fails with [`StoreError::StrategyExists`] if present.
    fn create(&mut self, name: &str, rules: &str) -> Result<(), StoreError>;

    /// Remove `name`; fails with [`StoreError::StrategyNotFound`] if absent.
    fn delete(&mut self, name: &str) -> Result<(), StoreError>;

    fn get(&self, name: &str) -> Result<Option<StrategyEntry>, StoreError> {
        Ok(self.list_all()?.remove(name))
    }
}

/// Destination for ingested trades.
pub trait RecordSink {
    /// Trade ids already present in the sink.
    fn existing_ids(&self) -> Result<BTreeSet<TradeId>, StoreError>;

    fn append(&mut self, record: &TradeRecord) -> Result<(), StoreError>;
}

// ─── Shared raw-table editing ───

/// Trimmed strategy name, rejecting blank tokens.
pub(crate) fn checked_strategy_name(name: &str) -> Result<String, StoreError> {
    crate::domain::clean_label(name).ok_or_else(|| StoreError::InvalidStrategyName(name.to_string()))
}

/// First column whose header maps to `field`.
pub fn find_column(table: &RawTable, field: Field) -> Option<usize> {
    table
        .headers
        .iter()
        .position(|h| Field::from_header(h) == Some(field))
}

/// Header text for a new `field` column, matching the table's labelling
/// (Japanese sheet labels or canonical names).
fn header_for(table: &RawTable, field: Field) -> String {
    let uses_labels = table
        .headers
        .iter()
        .any(|h| h.trim() == Field::TradeId.sheet_label());
    if uses_labels {
        field.sheet_label().to_string()
    } else {
        field.name().to_string()
    }
}

/// Column for `field`, appended (and every row padded) when missing.
fn ensure_column(table: &mut RawTable, field: Field) -> usize {
    if let Some(col) = find_column(table, field) {
        return col;
    }
    let header = header_for(table, field);
    table.headers.push(header);
    table.headers.len() - 1
}

/// Set `field` of the row identified by `trade_id`.
pub fn apply_field_update(
    table: &mut RawTable,
    trade_id: TradeId,
    field: EditableField,
    value: &str,
) -> Result<(), StoreError> {
    let id_col = find_column(table, Field::TradeId).ok_or_else(|| StoreError::MissingColumn {
        column: Field::TradeId.name().to_string(),
    })?;
    let row_idx = table
        .rows
        .iter()
        .position(|row| {
            row.get(id_col)
                .and_then(|cell| TradeId::parse(cell))
                .is_some_and(|id| id == trade_id)
        })
        .ok_or(StoreError::TradeNotFound { trade_id })?;

    let col = ensure_column(table, field.field());
    let row = &mut table.rows[row_idx];
    if row.len() <= col {
        row.resize(col + 1, String::new());
    }
    row[col] = value.to_string();
    Ok(())
}

/// Append `record` as a new row. Every canonical field gets a column.
pub fn append_record(table: &mut RawTable, record: &TradeRecord) {
    for field in Field::ALL {
        ensure_column(table, field);
    }
    let row = table
        .headers
        .iter()
        .map(|h| match Field::from_header(h) {
            Some(field) => canonical_cell(record, field),
            None => String::new(),
        })
        .collect();
    table.rows.push(row);
}

/// Ids of every row whose trade-id cell parses.
pub fn table_trade_ids(table: &RawTable) -> BTreeSet<TradeId> {
    let Some(col) = find_column(table, Field::TradeId) else {
        return BTreeSet::new();
    };
    table
        .rows
        .iter()
        .filter_map(|row| row.get(col).and_then(|cell| TradeId::parse(cell)))
        .collect()
}

// ─── Atomic file replacement ─────────────────────────────────────────

/// `<file name>.tmp` next to `path`.
pub fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace `path` with `contents`: write to a `.tmp` sibling, then rename
/// into place. The previous file is untouched unless the rename succeeds.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = tmp_sibling(path);
    if let Err(e) = fs::write(&tmp_path, contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        StoreError::Io(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> RawTable {
        RawTable::new(
            vec!["取引番号".into(), "損益".into()],
            vec![
                vec!["1".into(), "100".into()],
                vec!["2".into()],
            ],
        )
    }

    #[test]
    fn update_adds_missing_column_with_sheet_label() {
        let mut t = sheet();
        apply_field_update(&mut t, TradeId(2), EditableField::Strategy, "breakout").unwrap();
        assert_eq!(t.headers[2], "手法");
        assert_eq!(t.cell(1, 2), "breakout");
        assert_eq!(t.cell(0, 2), "");
    }

    #[test]
    fn update_unknown_trade_is_not_found() {
        let mut t = sheet();
        let err = apply_field_update(&mut t, TradeId(9), EditableField::ReviewComment, "x")
            .unwrap_err();
        assert!(matches!(err, StoreError::TradeNotFound { trade_id: TradeId(9) }));
    }

    #[test]
    fn update_without_id_column_is_missing_column() {
        let mut t = RawTable::with_headers(["memo"]);
        let err = apply_field_update(&mut t, TradeId(1), EditableField::Strategy, "x")
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn { .. }));
    }

    #[test]
    fn append_fills_known_columns() {
        let mut t = RawTable::with_headers(["trade_id", "memo"]);
        let rec = TradeRecord {
            trade_id: Some(TradeId(5)),
            net_profit_loss: Some(-12.5),
            ..Default::default()
        };
        append_record(&mut t, &rec);
        assert_eq!(t.headers.len(), 1 + Field::ALL.len());
        let net_col = find_column(&t, Field::NetProfitLoss).unwrap();
        assert_eq!(t.cell(0, 0), "5");
        assert_eq!(t.cell(0, 1), "");
        assert_eq!(t.cell(0, net_col), "-12.5");
        assert_eq!(table_trade_ids(&t), BTreeSet::from([TradeId(5)]));
    }

    #[test]
    fn blank_strategy_names_are_rejected() {
        assert!(checked_strategy_name(" nan ").is_err());
        assert_eq!(checked_strategy_name(" scalp ").unwrap(), "scalp");
    }

    #[test]
    fn atomic_write_replaces_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!tmp_sibling(&path).exists());
    }

    #[test]
    fn failed_rename_cleans_up_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("journal");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        assert!(matches!(write_atomic(&target, b"rows"), Err(StoreError::Io(_))));
        assert!(target.join("keep").exists());
        assert!(!tmp_sibling(&target).exists());
    }
}
