//! CSV-file trade store — the local stand-in for the journal spreadsheet.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{
    append_record, apply_field_update, table_trade_ids, write_atomic, RecordSink, StoreError,
    TradeStore,
};
use crate::data::RawTable;
use crate::domain::{EditableField, TradeId, TradeRecord};

/// Trade table kept as a single CSV file (header row first).
///
/// Allowed values pushed by the journal are kept next to it in
/// `<stem>.allowed.json`.
#[derive(Debug, Clone)]
pub struct CsvTradeStore {
    path: PathBuf,
    name: String,
}

impl CsvTradeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("csv:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn allowed_values_path(&self) -> PathBuf {
        self.path.with_extension("allowed.json")
    }

    /// Allowed values last pushed per field (empty when never pushed).
    pub fn allowed_values(&self) -> Result<BTreeMap<EditableField, Vec<String>>, StoreError> {
        match fs::read_to_string(self.allowed_values_path()) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the table; `Ok(None)` when the file does not exist.
    fn read_table(&self) -> Result<Option<RawTable>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::unavailable(&self.name, e)),
        };
        let body = bytes.strip_prefix("\u{feff}".as_bytes()).unwrap_or(&bytes);
        let table = RawTable::from_csv_reader(body)?;
        Ok(Some(table))
    }

    fn write_table(&self, table: &RawTable) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        table.write_csv(&mut buf)?;
        write_atomic(&self.path, &buf)
    }
}

impl TradeStore for CsvTradeStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<RawTable, StoreError> {
        let table = self
            .read_table()?
            .ok_or_else(|| StoreError::unavailable(&self.name, "file not found"))?;
        info!(store = %self.name, rows = table.row_count(), "loaded trade table");
        Ok(table)
    }

    fn update_field(
        &mut self,
        trade_id: TradeId,
        field: EditableField,
        value: &str,
    ) -> Result<(), StoreError> {
        let mut table = self.load()?;
        apply_field_update(&mut table, trade_id, field, value)?;
        self.write_table(&table)?;
        debug!(store = %self.name, %trade_id, %field, "updated trade cell");
        Ok(())
    }

    fn set_allowed_values(
        &mut self,
        field: EditableField,
        values: &[String],
    ) -> Result<(), StoreError> {
        let mut allowed = self.allowed_values()?;
        allowed.insert(field, values.to_vec());
        write_atomic(
            &self.allowed_values_path(),
            serde_json::to_string_pretty(&allowed)?.as_bytes(),
        )?;
        debug!(store = %self.name, %field, count = values.len(), "wrote allowed values");
        Ok(())
    }
}

impl RecordSink for CsvTradeStore {
    fn existing_ids(&self) -> Result<BTreeSet<TradeId>, StoreError> {
        Ok(self
            .read_table()?
            .map(|t| table_trade_ids(&t))
            .unwrap_or_default())
    }

    fn append(&mut self, record: &TradeRecord) -> Result<(), StoreError> {
        let mut table = self.read_table()?.unwrap_or_default();
        append_record(&mut table, record);
        self.write_table(&table)
    }
}
