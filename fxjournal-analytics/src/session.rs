//! Journal session — the explicit context object that owns the trade store,
//! the strategy catalog, and the most recently loaded snapshot.
//!
//! Analytics run against [`Snapshot`] and never touch the store. A refresh
//! builds a whole new snapshot; nothing is invalidated piecemeal.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use fxjournal_core::data::coerce;
use fxjournal_core::domain::clean_label;
use fxjournal_core::{
    EditableField, NormalizeReport, Normalizer, StoreError, StrategyCatalog, StrategyEntry,
    TradeId, TradeRecord, TradeStore,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::registry::StrategyRegistry;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{operation}: trade has no trade id")]
    MissingTradeId { operation: &'static str },

    #[error("update {field} of trade {trade_id}: {source}")]
    Update {
        trade_id: TradeId,
        field: EditableField,
        #[source]
        source: StoreError,
    },
}

/// One consistent view of the journal.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub trades: Vec<TradeRecord>,
    pub report: NormalizeReport,
    pub catalog: BTreeMap<String, StrategyEntry>,
    /// BLAKE3 hash of the raw trade table this snapshot was built from.
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn registry(&self) -> StrategyRegistry {
        StrategyRegistry::build(&self.trades, &self.catalog)
    }

    pub fn find(&self, trade_id: TradeId) -> Option<&TradeRecord> {
        self.trades.iter().find(|t| t.trade_id == Some(trade_id))
    }
}

pub struct JournalSession<S, C> {
    store: S,
    catalog: C,
    normalizer: Normalizer,
    snapshot: Snapshot,
}

impl<S: TradeStore, C: StrategyCatalog> JournalSession<S, C> {
    /// Connect and load the first snapshot.
    pub fn open(store: S, catalog: C, normalizer: Normalizer) -> Result<Self, SessionError> {
        let snapshot = load_snapshot(&store, &catalog, &normalizer)?;
        Ok(Self {
            store,
            catalog,
            normalizer,
            snapshot,
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.snapshot.trades
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access (e.g. as a record sink for imports). Call
    /// [`refresh`](Self::refresh) afterwards to see the changes.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Reload everything. Returns whether the trade table changed.
    pub fn refresh(&mut self) -> Result<bool, SessionError> {
        let fresh = load_snapshot(&self.store, &self.catalog, &self.normalizer)?;
        let changed = fresh.fingerprint != self.snapshot.fingerprint;
        self.snapshot = fresh;
        info!(changed, trades = self.snapshot.trades.len(), "refreshed journal");
        Ok(changed)
    }

    // ─── Annotation ─────────────────────────────────────────────────

    /// Write `strategy` or `review_comment` for one trade.
    ///
    /// The cached record is patched after the store accepts the write.
    pub fn annotate(
        &mut self,
        trade_id: TradeId,
        field: EditableField,
        value: &str,
    ) -> Result<(), SessionError> {
        self.store
            .update_field(trade_id, field, value)
            .map_err(|source| SessionError::Update {
                trade_id,
                field,
                source,
            })?;
        for trade in self
            .snapshot
            .trades
            .iter_mut()
            .filter(|t| t.trade_id == Some(trade_id))
        {
            match field {
                EditableField::Strategy => trade.strategy = clean_label(value),
                EditableField::ReviewComment => trade.review_comment = coerce::text(value),
            }
        }
        info!(%trade_id, %field, "annotated trade");
        Ok(())
    }

    /// [`annotate`](Self::annotate) for a record that may lack an id.
    pub fn annotate_record(
        &mut self,
        trade: &TradeRecord,
        field: EditableField,
        value: &str,
    ) -> Result<(), SessionError> {
        let trade_id = trade.trade_id.ok_or(SessionError::MissingTradeId {
            operation: "annotate",
        })?;
        self.annotate(trade_id, field, value)
    }

    // ─── Strategy catalog ───────────────────────────────────────────

    pub fn registry(&self) -> StrategyRegistry {
        self.snapshot.registry()
    }

    /// Create a strategy. Names already known anywhere in the registry
    /// (catalog or trade history) are rejected.
    pub fn create_strategy(&mut self, name: &str, rules: &str) -> Result<(), SessionError> {
        if self.registry().contains(name) {
            return Err(StoreError::StrategyExists {
                name: name.trim().to_string(),
            }
            .into());
        }
        self.catalog.create(name, rules)?;
        self.catalog_changed()
    }

    /// Create or replace the rule text of a strategy.
    pub fn save_strategy(&mut self, name: &str, rules: &str) -> Result<(), SessionError> {
        self.catalog.upsert(name, rules)?;
        self.catalog_changed()
    }

    pub fn delete_strategy(&mut self, name: &str) -> Result<(), SessionError> {
        self.catalog.delete(name)?;
        self.catalog_changed()
    }

    pub fn strategy(&self, name: &str) -> Option<&StrategyEntry> {
        self.snapshot.catalog.get(name.trim())
    }

    /// Push the merged strategy list to the store as allowed values.
    ///
    /// Advisory: a rejection is logged and reported as `false`.
    pub fn push_allowed_values(&mut self) -> bool {
        let names = self.registry().names();
        match self
            .store
            .set_allowed_values(EditableField::Strategy, &names)
        {
            Ok(()) => {
                debug!(count = names.len(), "pushed allowed strategy values");
                true
            }
            Err(e) => {
                warn!(error = %e, store = self.store.name(), "allowed values push failed");
                false
            }
        }
    }

    fn catalog_changed(&mut self) -> Result<(), SessionError> {
        self.snapshot.catalog = self.catalog.list_all()?;
        self.push_allowed_values();
        Ok(())
    }
}

fn load_snapshot<S: TradeStore, C: StrategyCatalog>(
    store: &S,
    catalog: &C,
    normalizer: &Normalizer,
) -> Result<Snapshot, SessionError> {
    let table = store.load()?;
    let fingerprint = table.fingerprint();
    let normalized = normalizer.normalize(&table);
    let entries = catalog.list_all()?;
    info!(
        store = store.name(),
        catalog = catalog.name(),
        rows = table.row_count(),
        trades = normalized.trades.len(),
        strategies = entries.len(),
        "loaded journal"
    );
    if normalized.report.has_failures() {
        debug!(failures = normalized.report.failures.len(), "cells failed coercion");
    }
    Ok(Snapshot {
        trades: normalized.trades,
        report: normalized.report,
        catalog: entries,
        fingerprint,
        loaded_at: Utc::now(),
    })
}
