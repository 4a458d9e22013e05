//! Portfolio metrics — pure functions over an immutable trade collection.
//!
//! Every monetary figure uses net P&L. Trades whose net P&L is missing count
//! toward `total_trades` but are skipped by every sum and mean.

use std::fmt;

use fxjournal_core::TradeRecord;
use serde::{Deserialize, Serialize};

use crate::equity::{self, EquityPoint};

/// Gross profit over gross loss, with the degenerate cases named.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProfitFactor {
    Finite(f64),
    /// Profits and no losses.
    Infinite,
    /// Neither profits nor losses (including the empty collection).
    Undefined,
}

impl ProfitFactor {
    pub fn from_totals(total_profit: f64, total_loss: f64) -> Self {
        if total_loss > 0.0 {
            ProfitFactor::Finite(total_profit / total_loss)
        } else if total_profit > 0.0 {
            ProfitFactor::Infinite
        } else {
            ProfitFactor::Undefined
        }
    }

    /// Numeric value; `Infinite` is `f64::INFINITY`, `Undefined` is `None`.
    pub fn value(self) -> Option<f64> {
        match self {
            ProfitFactor::Finite(v) => Some(v),
            ProfitFactor::Infinite => Some(f64::INFINITY),
            ProfitFactor::Undefined => None,
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, ProfitFactor::Infinite)
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Finite(v) => write!(f, "{v:.2}"),
            ProfitFactor::Infinite => f.write_str("∞"),
            ProfitFactor::Undefined => f.write_str("n/a"),
        }
    }
}

/// Headline statistics of a trade collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percentage, 0 when there are no trades.
    pub win_rate: f64,
    pub profit_factor: ProfitFactor,
    /// Mean pips over trades that have a pips value.
    pub avg_pips: Option<f64>,
    pub max_drawdown: f64,
    pub total_net_profit: f64,
    /// Sum of winning net P&L.
    pub total_profit: f64,
    /// Absolute sum of losing net P&L.
    pub total_loss: f64,
}

impl PortfolioMetrics {
    /// Compute every metric with one chronological pass.
    pub fn compute(trades: &[TradeRecord]) -> Self {
        let series = equity::cumulative_series(trades);
        Self::compute_with_series(trades, &series)
    }

    /// Compute every metric reusing an already-built cumulative series.
    pub fn compute_with_series(trades: &[TradeRecord], series: &[EquityPoint]) -> Self {
        let profit = total_profit(trades);
        let loss = total_loss(trades);
        Self {
            total_trades: trades.len(),
            winning_trades: winning_trades(trades),
            losing_trades: losing_trades(trades),
            win_rate: win_rate(trades),
            profit_factor: ProfitFactor::from_totals(profit, loss),
            avg_pips: avg_pips(trades),
            max_drawdown: equity::max_drawdown(series),
            total_net_profit: series.last().map_or(0.0, |p| p.cumulative),
            total_profit: profit,
            total_loss: loss,
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

pub fn winning_trades(trades: &[TradeRecord]) -> usize {
    trades.iter().filter(|t| t.is_win()).count()
}

pub fn losing_trades(trades: &[TradeRecord]) -> usize {
    trades.iter().filter(|t| t.is_loss()).count()
}

/// Winners as a percentage of all trades.
pub fn win_rate(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    winning_trades(trades) as f64 / trades.len() as f64 * 100.0
}

pub fn total_profit(trades: &[TradeRecord]) -> f64 {
    trades
        .iter()
        .filter_map(|t| t.net_profit_loss)
        .filter(|p| *p > 0.0)
        .sum()
}

pub fn total_loss(trades: &[TradeRecord]) -> f64 {
    trades
        .iter()
        .filter_map(|t| t.net_profit_loss)
        .filter(|p| *p < 0.0)
        .sum::<f64>()
        .abs()
}

pub fn total_net_profit(trades: &[TradeRecord]) -> f64 {
    trades.iter().filter_map(|t| t.net_profit_loss).sum()
}

pub fn avg_pips(trades: &[TradeRecord]) -> Option<f64> {
    mean(trades.iter().filter_map(|t| t.pips))
}

/// The `n` worst non-winning trades, most negative first.
///
/// Ties keep their original relative order.
pub fn top_losses(trades: &[TradeRecord], n: usize) -> Vec<&TradeRecord> {
    let mut losers: Vec<&TradeRecord> = trades
        .iter()
        .filter(|t| !t.is_win() && t.net_profit_loss.is_some())
        .collect();
    losers.sort_by(|a, b| {
        let a = a.net_profit_loss.unwrap_or(0.0);
        let b = b.net_profit_loss.unwrap_or(0.0);
        a.total_cmp(&b)
    });
    losers.truncate(n);
    losers
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Mean of the values, `None` for an empty iterator.
pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
