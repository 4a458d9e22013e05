//! In-memory store and catalog for tests and embedding.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;

use super::{
    append_record, apply_field_update, checked_strategy_name, table_trade_ids, RecordSink,
    StoreError, StrategyCatalog, TradeStore,
};
use crate::data::RawTable;
use crate::domain::{EditableField, StrategyEntry, TradeId, TradeRecord};

#[derive(Debug, Clone, Default)]
pub struct MemoryTradeStore {
    table: RawTable,
    allowed: BTreeMap<EditableField, Vec<String>>,
    /// When set, every operation fails as unavailable with this reason.
    outage: Option<String>,
    reject_allowed_values: bool,
}

impl MemoryTradeStore {
    pub fn new(table: RawTable) -> Self {
        Self {
            table,
            ..Default::default()
        }
    }

    /// A store that cannot be reached.
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self {
            outage: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Make `set_allowed_values` fail while everything else works.
    pub fn rejecting_allowed_values(mut self) -> Self {
        self.reject_allowed_values = true;
        self
    }

    pub fn table(&self) -> &RawTable {
        &self.table
    }

    pub fn allowed_values(&self, field: EditableField) -> Option<&[String]> {
        self.allowed.get(&field).map(Vec::as_slice)
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.outage {
            Some(reason) => Err(StoreError::unavailable("memory", reason)),
            None => Ok(()),
        }
    }
}

impl TradeStore for MemoryTradeStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self) -> Result<RawTable, StoreError> {
        self.check()?;
        Ok(self.table.clone())
    }

    fn update_field(
        &mut self,
        trade_id: TradeId,
        field: EditableField,
        value: &str,
    ) -> Result<(), StoreError> {
        self.check()?;
        apply_field_update(&mut self.table, trade_id, field, value)
    }

    fn set_allowed_values(
        &mut self,
        field: EditableField,
        values: &[String],
    ) -> Result<(), StoreError> {
        self.check()?;
        if self.reject_allowed_values {
            return Err(StoreError::unavailable("memory", "allowed values rejected"));
        }
        self.allowed.insert(field, values.to_vec());
        Ok(())
    }
}

impl RecordSink for MemoryTradeStore {
    fn existing_ids(&self) -> Result<BTreeSet<TradeId>, StoreError> {
        self.check()?;
        Ok(table_trade_ids(&self.table))
    }

    fn append(&mut self, record: &TradeRecord) -> Result<(), StoreError> {
        self.check()?;
        append_record(&mut self.table, record);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStrategyCatalog {
    entries: BTreeMap<String, StrategyEntry>,
}

impl MemoryStrategyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with `(name, rules)` pairs.
    pub fn with_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let now = Utc::now();
        Self {
            entries: entries
                .into_iter()
                .map(|(n, r)| (n.to_string(), StrategyEntry::new(n, r, now)))
                .collect(),
        }
    }
}

impl StrategyCatalog for MemoryStrategyCatalog {
    fn name(&self) -> &str {
        "memory"
    }

    fn list_all(&self) -> Result<BTreeMap<String, StrategyEntry>, StoreError> {
        Ok(self.entries.clone())
    }

    fn upsert(&mut self, name: &str, rules: &str) -> Result<(), StoreError> {
        let name = checked_strategy_name(name)?;
        let now = Utc::now();
        self.entries
            .entry(name.clone())
            .and_modify(|e| e.edit(rules, now))
            .or_insert_with(|| StrategyEntry::new(name.as_str(), rules, now));
        Ok(())
    }

    fn create(&mut self, name: &str, rules: &str) -> Result<(), StoreError> {
        let name = checked_strategy_name(name)?;
        if self.entries.contains_key(&name) {
            return Err(StoreError::StrategyExists { name });
        }
        let entry = StrategyEntry::new(name.as_str(), rules, Utc::now());
        self.entries.insert(name, entry);
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        self.entries
            .remove(name.trim())
            .map(|_| ())
            .ok_or_else(|| StoreError::StrategyNotFound {
                name: name.trim().to_string(),
            })
    }
}
