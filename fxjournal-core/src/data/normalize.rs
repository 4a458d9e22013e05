//! Normalizer — raw heterogeneous table in, typed trade records out.
//!
//! Pipeline:
//! 1. Drop blank-header columns and suffix duplicate header names
//! 2. Map recognized headers to canonical fields (missing fields stay empty)
//! 3. Drop rows that are blank in every kept column
//! 4. Coerce each cell; malformed cells become `None` and are recorded
//! 5. Derive `net_profit_loss`, `date`, and `holding_time_seconds`
//!
//! Normalization never fails on cell content. Feeding the canonical table of
//! its own output back in yields the same records.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::coerce::{self, Coerced};
use super::headers::{ColumnMap, HeaderCleaner};
use super::table::RawTable;
use crate::domain::{default_reference_offset, Field, TradeId, TradeRecord};

/// A cell that held text but failed coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellFailure {
    /// Data row index in the source table (0 = first row below the header).
    pub row: usize,
    pub trade_id: Option<TradeId>,
    pub field: Field,
    pub raw: String,
}

/// What the normalizer did to the source table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub source_rows: usize,
    pub blank_rows_dropped: usize,
    pub blank_header_columns_dropped: usize,
    pub unmapped_columns: Vec<String>,
    pub missing_fields: Vec<Field>,
    pub failures: Vec<CellFailure>,
    /// Rows whose supplied net P&L disagreed with profit + commission + swap.
    pub net_recomputed: usize,
}

impl NormalizeReport {
    /// Malformed-cell counts per field.
    pub fn failure_counts(&self) -> BTreeMap<Field, usize> {
        let mut counts = BTreeMap::new();
        for f in &self.failures {
            *counts.entry(f.field).or_insert(0) += 1;
        }
        counts
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Normalizer output.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub trades: Vec<TradeRecord>,
    pub report: NormalizeReport,
}

/// Coerces raw tables into trade records.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    /// Offset applied to timestamps written without one.
    reference_offset: FixedOffset,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(default_reference_offset())
    }
}

impl Normalizer {
    pub fn new(reference_offset: FixedOffset) -> Self {
        Self { reference_offset }
    }

    pub fn reference_offset(&self) -> FixedOffset {
        self.reference_offset
    }

    pub fn normalize(&self, table: &RawTable) -> Normalized {
        let cleaned = HeaderCleaner::clean(&table.headers);
        let columns = ColumnMap::build(&cleaned);

        let mut report = NormalizeReport {
            source_rows: table.row_count(),
            blank_header_columns_dropped: table.headers.len() - cleaned.len(),
            unmapped_columns: columns.unmapped.clone(),
            missing_fields: columns.missing_fields(),
            ..Default::default()
        };

        if cleaned.is_empty() {
            debug!(rows = table.row_count(), "no usable headers; empty result");
            report.blank_rows_dropped = table.row_count();
            return Normalized {
                trades: Vec::new(),
                report,
            };
        }

        let mut trades = Vec::with_capacity(table.row_count());
        for (row_idx, row) in table.rows.iter().enumerate() {
            let blank = cleaned.iter().all(|(col, _)| {
                row.get(*col).map_or(true, |cell| cell.trim().is_empty())
            });
            if blank {
                report.blank_rows_dropped += 1;
                continue;
            }
            let mut reader = RowReader {
                table,
                columns: &columns,
                row: row_idx,
                offset: self.reference_offset,
                failures: Vec::new(),
            };
            let trade = reader.read(&mut report.net_recomputed);
            let trade_id = trade.trade_id;
            report
                .failures
                .extend(reader.failures.into_iter().map(|(field, raw)| CellFailure {
                    row: row_idx,
                    trade_id,
                    field,
                    raw,
                }));
            trades.push(trade);
        }

        debug!(
            source_rows = report.source_rows,
            blank_rows_dropped = report.blank_rows_dropped,
            kept = trades.len(),
            malformed_cells = report.failures.len(),
            unmapped = ?report.unmapped_columns,
            "normalized trade table"
        );

        Normalized { trades, report }
    }
}

struct RowReader<'a> {
    table: &'a RawTable,
    columns: &'a ColumnMap,
    row: usize,
    offset: FixedOffset,
    failures: Vec<(Field, String)>,
}

impl RowReader<'_> {
    fn raw(&self, field: Field) -> &str {
        match self.columns.column(field) {
            Some(col) => self.table.cell(self.row, col),
            None => "",
        }
    }

    fn track<T>(&mut self, field: Field, value: Coerced<T>) -> Option<T> {
        if value.is_malformed() {
            let raw = self.raw(field).to_string();
            self.failures.push((field, raw));
        }
        value.value()
    }

    fn number(&mut self, field: Field) -> Option<f64> {
        let v = coerce::number(self.raw(field));
        self.track(field, v)
    }

    fn integer(&mut self, field: Field) -> Option<i64> {
        let v = coerce::integer(self.raw(field));
        self.track(field, v)
    }

    fn timestamp(&mut self, field: Field) -> Option<DateTime<FixedOffset>> {
        let v = coerce::timestamp(self.raw(field), self.offset);
        self.track(field, v)
    }

    fn date(&mut self, field: Field) -> Option<NaiveDate> {
        let v = coerce::date(self.raw(field), self.offset);
        self.track(field, v)
    }

    fn read(&mut self, net_recomputed: &mut usize) -> TradeRecord {
        let mut trade = TradeRecord {
            trade_id: self.integer(Field::TradeId).map(TradeId),
            currency_pair: coerce::currency_pair(self.raw(Field::CurrencyPair)),
            trade_type: coerce::trade_type(self.raw(Field::Type)),
            lot: self.number(Field::Lot),
            start_time: self.timestamp(Field::StartTime),
            end_time: self.timestamp(Field::EndTime),
            date: self.date(Field::Date),
            holding_time_seconds: self.integer(Field::HoldingTimeSeconds),
            profit_loss: self.number(Field::ProfitLoss),
            pips: self.number(Field::Pips),
            commission: self.number(Field::Commission),
            swap: self.number(Field::Swap),
            net_profit_loss: self.number(Field::NetProfitLoss),
            sync_time: self.timestamp(Field::SyncTime),
            strategy: coerce::text(self.raw(Field::Strategy)),
            review_comment: coerce::text(self.raw(Field::ReviewComment)),
        };

        if let Some(derived) = trade.derived_net() {
            if trade.net_profit_loss.is_some_and(|supplied| supplied != derived) {
                *net_recomputed += 1;
            }
            trade.net_profit_loss = Some(derived);
        }

        if trade.date.is_none() {
            trade.date = trade
                .start_time
                .or(trade.end_time)
                .map(|ts| ts.date_naive());
        }

        if trade.holding_time_seconds.is_none() {
            if let (Some(start), Some(end)) = (trade.start_time, trade.end_time) {
                let secs = (end - start).num_seconds();
                if secs >= 0 {
                    trade.holding_time_seconds = Some(secs);
                }
            }
        }

        trade
    }
}

/// Render trade records as a table with canonical headers.
///
/// Numbers use shortest round-trip formatting and timestamps RFC 3339, so
/// normalizing the result reproduces the records exactly.
pub fn canonical_table(trades: &[TradeRecord]) -> RawTable {
    let headers = Field::ALL.iter().map(|f| f.name().to_string()).collect();
    let rows = trades.iter().map(canonical_row).collect();
    RawTable::new(headers, rows)
}

/// One record's cells in `Field::ALL` order.
pub fn canonical_row(trade: &TradeRecord) -> Vec<String> {
    Field::ALL
        .iter()
        .map(|f| canonical_cell(trade, *f))
        .collect()
}

/// One record's cell for a single field.
pub fn canonical_cell(trade: &TradeRecord, field: Field) -> String {
    fn num(v: Option<f64>) -> String {
        v.map(|v| v.to_string()).unwrap_or_default()
    }
    fn ts(v: Option<DateTime<FixedOffset>>) -> String {
        v.map(|v| v.to_rfc3339()).unwrap_or_default()
    }
    fn text(v: &Option<String>) -> String {
        v.clone().unwrap_or_default()
    }

    match field {
        Field::TradeId => trade.trade_id.map(|id| id.to_string()).unwrap_or_default(),
        Field::CurrencyPair => text(&trade.currency_pair),
        Field::Type => text(&trade.trade_type),
        Field::Lot => num(trade.lot),
        Field::StartTime => ts(trade.start_time),
        Field::EndTime => ts(trade.end_time),
        Field::Date => trade
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Field::ProfitLoss => num(trade.profit_loss),
        Field::Pips => num(trade.pips),
        Field::HoldingTimeSeconds => trade
            .holding_time_seconds
            .map(|s| s.to_string())
            .unwrap_or_default(),
        Field::Commission => num(trade.commission),
        Field::Swap => num(trade.swap),
        Field::NetProfitLoss => num(trade.net_profit_loss),
        Field::SyncTime => ts(trade.sync_time),
        Field::Strategy => text(&trade.strategy),
        Field::ReviewComment => text(&trade.review_comment),
    }
}
