//! Aggregator — group trades along one dimension and summarize each group.
//!
//! Every dimension goes through [`group_and_summarize`] with its own key
//! function; only the key derivation and the result ordering differ.

pub mod dimensions;

pub use dimensions::{
    by_currency_pair, by_holding_time, by_market_session, by_strategy, by_time_period, by_weekday,
    breakdown, DayOfWeek, Dimension, HoldingBucket, Period, PeriodKey, Session,
};

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use fxjournal_core::TradeRecord;
use serde::{Deserialize, Serialize};

/// Per-group statistics. Net P&L aggregates skip trades without a net figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats<K> {
    pub key: K,
    /// Sum of net P&L.
    pub total: f64,
    /// Mean net P&L; `None` when no trade in the group has one.
    pub mean: Option<f64>,
    /// Trades with a net P&L value.
    pub count: usize,
    /// All trades in the group.
    pub trades: usize,
    pub avg_pips: Option<f64>,
    /// Winners as a percentage of `trades`; `None` for an empty group.
    pub win_rate: Option<f64>,
}

impl<K> GroupStats<K> {
    /// A group with no trades (used to fill gaps between periods).
    pub fn empty(key: K) -> Self {
        Self {
            key,
            total: 0.0,
            mean: None,
            count: 0,
            trades: 0,
            avg_pips: None,
            win_rate: None,
        }
    }

    /// Same statistics under the key's display label.
    pub fn labelled(&self) -> GroupStats<String>
    where
        K: fmt::Display,
    {
        GroupStats {
            key: self.key.to_string(),
            total: self.total,
            mean: self.mean,
            count: self.count,
            trades: self.trades,
            avg_pips: self.avg_pips,
            win_rate: self.win_rate,
        }
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    net_sum: f64,
    net_count: usize,
    pips_sum: f64,
    pips_count: usize,
    wins: usize,
    trades: usize,
}

impl Accumulator {
    fn push(&mut self, trade: &TradeRecord) {
        self.trades += 1;
        if let Some(net) = trade.net_profit_loss {
            self.net_sum += net;
            self.net_count += 1;
        }
        if let Some(pips) = trade.pips {
            self.pips_sum += pips;
            self.pips_count += 1;
        }
        if trade.is_win() {
            self.wins += 1;
        }
    }

    fn finish<K>(self, key: K) -> GroupStats<K> {
        let ratio = |sum: f64, n: usize| (n > 0).then(|| sum / n as f64);
        GroupStats {
            key,
            total: self.net_sum,
            mean: ratio(self.net_sum, self.net_count),
            count: self.net_count,
            trades: self.trades,
            avg_pips: ratio(self.pips_sum, self.pips_count),
            win_rate: ratio(self.wins as f64 * 100.0, self.trades),
        }
    }
}

/// Group trades by `key_fn` and summarize each group. Trades for which
/// `key_fn` returns `None` belong to no group.
pub fn group_and_summarize<K, F>(trades: &[TradeRecord], key_fn: F) -> BTreeMap<K, GroupStats<K>>
where
    K: Ord + Clone,
    F: Fn(&TradeRecord) -> Option<K>,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for trade in trades {
        if let Some(key) = key_fn(trade) {
            groups.entry(key).or_default().push(trade);
        }
    }
    groups
        .into_iter()
        .map(|(key, acc)| (key.clone(), acc.finish(key)))
        .collect()
}

/// Groups ordered by summed net P&L, largest first; ties by key.
pub fn by_total_desc<K: Ord>(groups: BTreeMap<K, GroupStats<K>>) -> Vec<GroupStats<K>> {
    let mut out: Vec<GroupStats<K>> = groups.into_values().collect();
    out.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    out
}

/// Groups in a fixed key order; keys with no trades are left out.
pub fn in_fixed_order<K: Ord>(mut groups: BTreeMap<K, GroupStats<K>>, order: &[K]) -> Vec<GroupStats<K>> {
    order.iter().filter_map(|k| groups.remove(k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(key: &str, net: Option<f64>, pips: Option<f64>) -> TradeRecord {
        TradeRecord {
            strategy: Some(key.to_string()),
            net_profit_loss: net,
            pips,
            ..Default::default()
        }
    }

    #[test]
    fn summarizes_each_group() {
        let trades = vec![
            trade("a", Some(100.0), Some(10.0)),
            trade("a", Some(-40.0), None),
            trade("a", None, Some(2.0)),
            trade("b", Some(0.0), None),
        ];
        let groups = group_and_summarize(&trades, |t| t.strategy.clone());
        let a = &groups["a"];
        assert_eq!(a.total, 60.0);
        assert_eq!(a.mean, Some(30.0));
        assert_eq!(a.count, 2);
        assert_eq!(a.trades, 3);
        assert_eq!(a.avg_pips, Some(6.0));
        assert!((a.win_rate.unwrap() - 100.0 / 3.0).abs() < 1e-9);

        let b = &groups["b"];
        assert_eq!(b.win_rate, Some(0.0));
        assert_eq!(b.avg_pips, None);
    }

    #[test]
    fn none_keys_are_excluded() {
        let trades = vec![trade("a", Some(1.0), None), TradeRecord::default()];
        let groups = group_and_summarize(&trades, |t| t.strategy.clone());
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn total_desc_breaks_ties_by_key() {
        let trades = vec![
            trade("c", Some(5.0), None),
            trade("b", Some(10.0), None),
            trade("a", Some(5.0), None),
        ];
        let ordered = by_total_desc(group_and_summarize(&trades, |t| t.strategy.clone()));
        let keys: Vec<&str> = ordered.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn fixed_order_skips_absent_keys() {
        let trades = vec![trade("z", Some(1.0), None), trade("x", Some(1.0), None)];
        let groups = group_and_summarize(&trades, |t| t.strategy.clone());
        let order = ["x".to_string(), "y".to_string(), "z".to_string()];
        let keys: Vec<String> = in_fixed_order(groups, &order)
            .into_iter()
            .map(|g| g.key)
            .collect();
        assert_eq!(keys, vec!["x", "z"]);
    }
}
