//! JSON-file strategy catalog.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use super::{checked_strategy_name, write_atomic, StoreError, StrategyCatalog};
use crate::domain::StrategyEntry;

/// Strategy catalog kept as a pretty-printed JSON object keyed by name.
///
/// A missing file is an empty catalog; the file is created on first write.
#[derive(Debug, Clone)]
pub struct JsonStrategyCatalog {
    path: PathBuf,
    name: String,
}

impl JsonStrategyCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("json:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, StrategyEntry>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::unavailable(&self.name, e)),
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn write(&self, entries: &BTreeMap<String, StrategyEntry>) -> Result<(), StoreError> {
        write_atomic(&self.path, serde_json::to_string_pretty(entries)?.as_bytes())
    }
}

impl StrategyCatalog for JsonStrategyCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_all(&self) -> Result<BTreeMap<String, StrategyEntry>, StoreError> {
        let entries = self.read()?;
        info!(catalog = %self.name, strategies = entries.len(), "loaded strategy catalog");
        Ok(entries)
    }

    fn upsert(&mut self, name: &str, rules: &str) -> Result<(), StoreError> {
        let name = checked_strategy_name(name)?;
        let mut entries = self.read()?;
        let now = Utc::now();
        entries
            .entry(name.clone())
            .and_modify(|e| e.edit(rules, now))
            .or_insert_with(|| StrategyEntry::new(name.as_str(), rules, now));
        self.write(&entries)?;
        debug!(catalog = %self.name, strategy = %name, "saved strategy rules");
        Ok(())
    }

    fn create(&mut self, name: &str, rules: &str) -> Result<(), StoreError> {
        let name = checked_strategy_name(name)?;
        let mut entries = self.read()?;
        if entries.contains_key(&name) {
            return Err(StoreError::StrategyExists { name });
        }
        entries.insert(name.clone(), StrategyEntry::new(name.as_str(), rules, Utc::now()));
        self.write(&entries)?;
        debug!(catalog = %self.name, strategy = %name, "created strategy");
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        let mut entries = self.read()?;
        if entries.remove(name.trim()).is_none() {
            return Err(StoreError::StrategyNotFound {
                name: name.trim().to_string(),
            });
        }
        self.write(&entries)?;
        debug!(catalog = %self.name, strategy = name.trim(), "deleted strategy");
        Ok(())
    }
}
