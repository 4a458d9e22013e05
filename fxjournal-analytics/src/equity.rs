//! Cumulative P&L series — the chronological pass shared by drawdown,
//! streaks, and charting.

use chrono::NaiveDate;
use fxjournal_core::{TradeId, TradeRecord};
use serde::{Deserialize, Serialize};

/// One point on the cumulative net P&L curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: Option<NaiveDate>,
    pub trade_id: Option<TradeId>,
    pub net: f64,
    pub cumulative: f64,
    /// Running maximum of `cumulative`.
    pub peak: f64,
    /// `cumulative - peak`, always <= 0.
    pub drawdown: f64,
}

/// Trades in ascending `date` order. The sort is stable; undated trades go last.
pub fn chronological(trades: &[TradeRecord]) -> Vec<&TradeRecord> {
    let mut sorted: Vec<&TradeRecord> = trades.iter().collect();
    sorted.sort_by_key(|t| (t.date.is_none(), t.date));
    sorted
}

/// Cumulative net P&L over date-sorted trades.
///
/// Trades without a net figure contribute no point. The running peak starts
/// at the first cumulative value, not at zero.
pub fn cumulative_series(trades: &[TradeRecord]) -> Vec<EquityPoint> {
    let mut series = Vec::with_capacity(trades.len());
    let mut cumulative = 0.0;
    let mut peak = f64::NEG_INFINITY;

    for trade in chronological(trades) {
        let Some(net) = trade.net_profit_loss else {
            continue;
        };
        cumulative += net;
        peak = peak.max(cumulative);
        series.push(EquityPoint {
            date: trade.date,
            trade_id: trade.trade_id,
            net,
            cumulative,
            peak,
            drawdown: cumulative - peak,
        });
    }
    series
}

/// Largest peak-to-trough decline, as a non-negative amount.
pub fn max_drawdown(series: &[EquityPoint]) -> f64 {
    series
        .iter()
        .map(|p| p.drawdown)
        .fold(0.0_f64, f64::min)
        .abs()
}
