//! FX Journal Core — trade records, normalization, stores, report ingestion.
//!
//! This crate contains everything the analytics layer consumes:
//! - Domain types (trade records, trade ids, strategy catalog entries)
//! - Raw string tables as loaded from a spreadsheet-like source
//! - The normalizer that coerces a raw table into typed trade records
//! - Trade store, strategy catalog, and record sink traits with
//!   file-backed and in-memory implementations
//! - Broker (MT5) statement ingestion from CSV and HTML exports

pub mod data;
pub mod domain;
pub mod report;
pub mod store;

pub use data::{Normalized, NormalizeReport, Normalizer, RawTable};
pub use domain::{EditableField, Field, StrategyEntry, TradeId, TradeRecord};
pub use store::{RecordSink, StoreError, StrategyCatalog, TradeStore};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: snapshot types can be shared with a worker thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<TradeRecord>();
        require_sync::<TradeRecord>();
        require_send::<RawTable>();
        require_sync::<RawTable>();
        require_send::<StrategyEntry>();
        require_sync::<StrategyEntry>();
        require_send::<NormalizeReport>();
        require_sync::<NormalizeReport>();
        require_send::<report::ReportTrade>();
        require_sync::<report::ReportTrade>();
    }
}
