//! Strategy registry — the canonical list of selectable strategy names.
//!
//! Names come from three places: the strategy breakdown's group keys, the
//! strategy tags seen on trades, and the strategy catalog. They are trimmed,
//! blank tokens are dropped, duplicates (case-sensitive) are merged, and the
//! result is sorted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use fxjournal_core::domain::clean_label;
use fxjournal_core::{StrategyEntry, TradeRecord};
use serde::{Deserialize, Serialize};

use crate::aggregate::by_strategy;

/// Where a registry name was first defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategySource {
    /// Has a catalog entry (with rules).
    Catalog,
    /// Only seen as a tag in the trade history.
    History,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    pub source: StrategySource,
    pub rules: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited_time: Option<DateTime<Utc>>,
    /// Trades tagged with this name.
    pub trade_count: usize,
}

impl RegistryEntry {
    fn from_history(name: String) -> Self {
        Self {
            name,
            source: StrategySource::History,
            rules: None,
            created_time: None,
            last_edited_time: None,
            trade_count: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl StrategyRegistry {
    /// Merge trade history with the catalog. Catalog data wins over
    /// history for the same name.
    pub fn build(trades: &[TradeRecord], catalog: &BTreeMap<String, StrategyEntry>) -> Self {
        let mut entries: BTreeMap<String, RegistryEntry> = BTreeMap::new();

        let group_keys = by_strategy(trades).into_iter().map(|g| g.key);
        let tags = trades.iter().filter_map(|t| t.strategy.as_deref().and_then(clean_label));
        for name in group_keys.chain(tags) {
            entries
                .entry(name.clone())
                .or_insert_with(|| RegistryEntry::from_history(name));
        }

        for (key, entry) in catalog {
            let Some(name) = clean_label(key) else { continue };
            let slot = entries
                .entry(name.clone())
                .or_insert_with(|| RegistryEntry::from_history(name));
            slot.source = StrategySource::Catalog;
            slot.rules = Some(entry.rules.clone());
            slot.created_time = entry.created_time;
            slot.last_edited_time = entry.last_edited_time;
        }

        for trade in trades {
            if let Some(name) = trade.strategy.as_deref().and_then(clean_label) {
                if let Some(entry) = entries.get_mut(&name) {
                    entry.trade_count += 1;
                }
            }
        }

        Self { entries }
    }

    /// Sorted, deduplicated names.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name.trim())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name.trim())
    }

    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(name: &str) -> TradeRecord {
        TradeRecord {
            strategy: Some(name.to_string()),
            net_profit_loss: Some(1.0),
            ..Default::default()
        }
    }

    fn catalog(names: &[(&str, &str)]) -> BTreeMap<String, StrategyEntry> {
        names
            .iter()
            .map(|(n, r)| (n.to_string(), StrategyEntry::new(*n, *r, Utc::now())))
            .collect()
    }

    #[test]
    fn merges_trims_dedupes_and_sorts() {
        let trades = vec![tagged(" breakout "), tagged("Breakout"), tagged("nan"), tagged("")];
        let registry = StrategyRegistry::build(&trades, &catalog(&[("range", "fade edges"), ("breakout", "")]));
        assert_eq!(registry.names(), vec!["Breakout", "breakout", "range"]);
    }

    #[test]
    fn catalog_takes_precedence() {
        let trades = vec![tagged("range"), tagged("range"), tagged("trend")];
        let registry = StrategyRegistry::build(&trades, &catalog(&[("range", "fade edges")]));

        let range = registry.get("range").unwrap();
        assert_eq!(range.source, StrategySource::Catalog);
        assert_eq!(range.rules.as_deref(), Some("fade edges"));
        assert_eq!(range.trade_count, 2);

        let trend = registry.get(" trend ").unwrap();
        assert_eq!(trend.source, StrategySource::History);
        assert_eq!(trend.rules, None);
    }

    #[test]
    fn empty_sources() {
        let registry = StrategyRegistry::build(&[], &BTreeMap::new());
        assert!(registry.is_empty());
        assert!(registry.names().is_empty());
    }

    #[test]
    fn blank_catalog_keys_are_ignored() {
        let registry = StrategyRegistry::build(&[], &catalog(&[("  ", "x"), ("None", "y")]));
        assert!(registry.is_empty());
    }
}
