//! Sync — append broker-statement trades the journal does not have yet.

use chrono::{DateTime, FixedOffset};
use fxjournal_core::report::ReportTrade;
use fxjournal_core::{RecordSink, StoreError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Trades appended.
    pub new: usize,
    /// Trades skipped because their ticket was already present.
    pub existing: usize,
    /// Trades the sink refused.
    pub failed: usize,
}

impl SyncSummary {
    pub fn total(&self) -> usize {
        self.new + self.existing + self.failed
    }
}

/// Append every trade whose ticket is not already in `sink`.
///
/// Reading the existing ids is the only fatal step; a refused append is
/// counted in `failed` and the remaining trades are still attempted.
pub fn sync_trades<K: RecordSink + ?Sized>(
    trades: &[ReportTrade],
    sink: &mut K,
    sync_time: DateTime<FixedOffset>,
) -> Result<SyncSummary, StoreError> {
    let mut seen = sink.existing_ids()?;
    let mut summary = SyncSummary::default();

    for trade in trades {
        if seen.contains(&trade.ticket) {
            summary.existing += 1;
            continue;
        }
        match sink.append(&trade.to_trade_record(Some(sync_time))) {
            Ok(()) => {
                seen.insert(trade.ticket);
                summary.new += 1;
            }
            Err(e) => {
                warn!(ticket = %trade.ticket, error = %e, "append failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        new = summary.new,
        existing = summary.existing,
        failed = summary.failed,
        "synced trades"
    );
    Ok(summary)
}
