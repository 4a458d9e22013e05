//! Filter engine — composable, independently optional trade predicates.
//!
//! A [`FilterSpec`] is validated when it is built; applying it never fails
//! and an unmatched filter simply yields no rows.

use chrono::NaiveDate;
use fxjournal_core::data::coerce;
use fxjournal_core::TradeRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Categorical values meaning "no filter on this field".
pub const ALL_SENTINELS: &[&str] = &["all", "すべて"];

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("date range starts {start} after it ends {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("profit range minimum {min} is above maximum {max}")]
    InvertedProfitRange { min: f64, max: f64 },

    #[error("unknown filter field: {0}")]
    UnknownField(String),

    #[error("invalid value {value:?} for filter {field}")]
    InvalidValue { field: String, value: String },
}

/// Which trades to keep. Every predicate is optional; set predicates are
/// combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    currency_pair: Option<String>,
    trade_type: Option<String>,
    strategy: Option<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    profit_min: Option<f64>,
    profit_max: Option<f64>,
    only_losses: bool,
}

fn is_sentinel(value: &str) -> bool {
    let v = value.trim();
    ALL_SENTINELS.iter().any(|s| v.eq_ignore_ascii_case(s))
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact currency pair (matched after the same cleanup as trade data).
    pub fn currency_pair(mut self, pair: &str) -> Self {
        self.currency_pair = (!is_sentinel(pair))
            .then(|| coerce::currency_pair(pair))
            .flatten();
        self
    }

    /// Exact trade type, case-insensitive.
    pub fn trade_type(mut self, trade_type: &str) -> Self {
        self.trade_type = (!is_sentinel(trade_type))
            .then(|| coerce::trade_type(trade_type))
            .flatten();
        self
    }

    /// Exact strategy tag.
    pub fn strategy(mut self, strategy: &str) -> Self {
        self.strategy = (!is_sentinel(strategy))
            .then(|| coerce::text(strategy))
            .flatten();
        self
    }

    /// Inclusive date range.
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Result<Self, FilterError> {
        self.date_from = Some(start);
        self.date_to = Some(end);
        self.validated()
    }

    /// Lower date bound; rejected if it falls after an end already set.
    pub fn date_from(mut self, start: NaiveDate) -> Result<Self, FilterError> {
        self.date_from = Some(start);
        self.validated()
    }

    /// Upper date bound; rejected if it falls before a start already set.
    pub fn date_to(mut self, end: NaiveDate) -> Result<Self, FilterError> {
        self.date_to = Some(end);
        self.validated()
    }

    /// Inclusive net P&L range.
    pub fn profit_range(mut self, min: f64, max: f64) -> Result<Self, FilterError> {
        self.profit_min = Some(finite("profit_min", min)?);
        self.profit_max = Some(finite("profit_max", max)?);
        self.validated()
    }

    pub fn profit_min(mut self, min: f64) -> Result<Self, FilterError> {
        self.profit_min = Some(finite("profit_min", min)?);
        self.validated()
    }

    pub fn profit_max(mut self, max: f64) -> Result<Self, FilterError> {
        self.profit_max = Some(finite("profit_max", max)?);
        self.validated()
    }

    /// Keep only trades that are not wins.
    pub fn only_losses(mut self, on: bool) -> Self {
        self.only_losses = on;
        self
    }

    /// Check cross-field constraints.
    pub fn validated(self) -> Result<Self, FilterError> {
        if let (Some(start), Some(end)) = (self.date_from, self.date_to) {
            if start > end {
                return Err(FilterError::InvertedDateRange { start, end });
            }
        }
        if let (Some(min), Some(max)) = (self.profit_min, self.profit_max) {
            if min > max {
                return Err(FilterError::InvertedProfitRange { min, max });
            }
        }
        Ok(self)
    }

    /// Build from `(field, value)` pairs such as query parameters or CLI
    /// arguments. Fields: `currency_pair`, `type`, `strategy`, `date_from`,
    /// `date_to`, `profit_min`, `profit_max`, `only_losses`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut spec = FilterSpec::new();
        for (field, value) in pairs {
            let (field, value) = (field.as_ref().trim(), value.as_ref());
            let invalid = || FilterError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
            };
            spec = match field {
                "currency_pair" | "pair" => spec.currency_pair(value),
                "type" | "trade_type" => spec.trade_type(value),
                "strategy" => spec.strategy(value),
                "date_from" => spec.date_from(parse_date(value).ok_or_else(invalid)?)?,
                "date_to" => spec.date_to(parse_date(value).ok_or_else(invalid)?)?,
                "profit_min" => spec.profit_min(value.trim().parse().map_err(|_| invalid())?)?,
                "profit_max" => spec.profit_max(value.trim().parse().map_err(|_| invalid())?)?,
                "only_losses" => spec.only_losses(parse_bool(value).ok_or_else(invalid)?),
                other => return Err(FilterError::UnknownField(other.to_string())),
            };
        }
        spec.validated()
    }

    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        *self == FilterSpec::default()
    }

    pub fn matches(&self, trade: &TradeRecord) -> bool {
        self.predicates().iter().all(|(_, p)| p(trade))
    }

    /// Matching trades in their original relative order.
    pub fn apply<'a>(&self, trades: &'a [TradeRecord]) -> Vec<&'a TradeRecord> {
        let mut rows: Vec<&TradeRecord> = trades.iter().collect();
        for (name, predicate) in self.predicates() {
            let before = rows.len();
            rows.retain(|t| predicate(t));
            debug!(filter = name, before, after = rows.len(), "applied filter");
        }
        rows
    }

    /// Owned copy of the matching trades.
    pub fn apply_owned(&self, trades: &[TradeRecord]) -> Vec<TradeRecord> {
        self.apply(trades).into_iter().cloned().collect()
    }

    #[allow(clippy::type_complexity)]
    fn predicates(&self) -> Vec<(&'static str, Box<dyn Fn(&TradeRecord) -> bool + '_>)> {
        let mut preds: Vec<(&'static str, Box<dyn Fn(&TradeRecord) -> bool + '_>)> = Vec::new();
        if let Some(pair) = &self.currency_pair {
            preds.push((
                "currency_pair",
                Box::new(move |t| t.currency_pair.as_ref() == Some(pair)),
            ));
        }
        if let Some(kind) = &self.trade_type {
            preds.push(("type", Box::new(move |t| t.trade_type.as_ref() == Some(kind))));
        }
        if let Some(strategy) = &self.strategy {
            preds.push((
                "strategy",
                Box::new(move |t| t.strategy.as_deref().map(str::trim) == Some(strategy.as_str())),
            ));
        }
        if let Some(start) = self.date_from {
            preds.push(("date_from", Box::new(move |t| t.date.is_some_and(|d| d >= start))));
        }
        if let Some(end) = self.date_to {
            preds.push(("date_to", Box::new(move |t| t.date.is_some_and(|d| d <= end))));
        }
        if let Some(min) = self.profit_min {
            preds.push((
                "profit_min",
                Box::new(move |t| t.net_profit_loss.is_some_and(|p| p >= min)),
            ));
        }
        if let Some(max) = self.profit_max {
            preds.push((
                "profit_max",
                Box::new(move |t| t.net_profit_loss.is_some_and(|p| p <= max)),
            ));
        }
        if self.only_losses {
            preds.push(("only_losses", Box::new(|t| !t.is_win())));
        }
        preds
    }
}

fn finite(field: &str, v: f64) -> Result<f64, FilterError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FilterError::InvalidValue {
            field: field.to_string(),
            value: v.to_string(),
        })
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw.trim(), fmt).ok())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(pair: &str, kind: &str, day: u32, net: f64) -> TradeRecord {
        TradeRecord {
            currency_pair: Some(pair.into()),
            trade_type: Some(kind.into()),
            date: NaiveDate::from_ymd_opt(2024, 2, day),
            net_profit_loss: Some(net),
            ..Default::default()
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn empty_spec_returns_everything() {
        let trades = vec![trade("USDJPY", "buy", 1, 1.0), trade("EURUSD", "sell", 2, -1.0)];
        let spec = FilterSpec::new();
        assert!(spec.is_empty());
        assert_eq!(spec.apply(&trades).len(), 2);
    }

    #[test]
    fn sentinels_disable_predicates() {
        let spec = FilterSpec::new()
            .currency_pair("すべて")
            .trade_type("ALL")
            .strategy("all");
        assert!(spec.is_empty());
    }

    #[test]
    fn query_values_are_normalized_like_data() {
        let trades = vec![trade("USDJPY", "buy", 1, 1.0), trade("EURUSD", "sell", 2, -1.0)];
        let spec = FilterSpec::new().currency_pair(" usdjpy# ").trade_type("BUY");
        assert_eq!(spec.apply(&trades).len(), 1);
    }

    #[test]
    fn date_range_is_inclusive() {
        let trades: Vec<TradeRecord> = (1..=5).map(|d| trade("USDJPY", "buy", d, 1.0)).collect();
        let spec = FilterSpec::new().date_range(day(2), day(4)).unwrap();
        assert_eq!(spec.apply(&trades).len(), 3);
    }

    #[test]
    fn inverted_ranges_rejected_at_construction() {
        assert_eq!(
            FilterSpec::new().date_range(day(5), day(1)).unwrap_err(),
            FilterError::InvertedDateRange { start: day(5), end: day(1) }
        );
        assert!(matches!(
            FilterSpec::new().profit_range(10.0, -10.0),
            Err(FilterError::InvertedProfitRange { .. })
        ));
        assert!(FilterSpec::new().profit_min(f64::NAN).is_err());
    }

    #[test]
    fn single_bound_builders_check_the_other_end() {
        assert_eq!(
            FilterSpec::new().date_from(day(5)).unwrap().date_to(day(1)).unwrap_err(),
            FilterError::InvertedDateRange { start: day(5), end: day(1) }
        );
        assert!(FilterSpec::new().date_to(day(1)).unwrap().date_from(day(5)).is_err());
        assert!(matches!(
            FilterSpec::new().profit_min(10.0).unwrap().profit_max(-10.0),
            Err(FilterError::InvertedProfitRange { .. })
        ));

        let trades = vec![trade("USDJPY", "buy", 3, 1.0)];
        let spec = FilterSpec::new()
            .date_from(day(1))
            .and_then(|s| s.date_to(day(5)))
            .unwrap();
        assert_eq!(spec.apply(&trades).len(), 1);
    }

    #[test]
    fn range_setters_replace_both_ends() {
        let spec = FilterSpec::new()
            .date_to(day(1))
            .and_then(|s| s.date_range(day(10), day(20)))
            .unwrap();
        assert!(spec.matches(&trade("USDJPY", "buy", 15, 1.0)));
    }

    #[test]
    fn profit_range_and_only_losses() {
        let trades = vec![
            trade("USDJPY", "buy", 1, -100.0),
            trade("USDJPY", "buy", 2, 0.0),
            trade("USDJPY", "buy", 3, 50.0),
        ];
        let spec = FilterSpec::new().profit_range(-50.0, 100.0).unwrap();
        assert_eq!(spec.apply(&trades).len(), 2);
        let losses = FilterSpec::new().only_losses(true);
        assert_eq!(losses.apply(&trades).len(), 2);
    }

    #[test]
    fn from_pairs_parses_and_validates() {
        let spec = FilterSpec::from_pairs([
            ("currency_pair", "USDJPY"),
            ("date_from", "2024-02-01"),
            ("date_to", "2024/02/10"),
            ("only_losses", "true"),
        ])
        .unwrap();
        assert!(spec.matches(&trade("USDJPY", "sell", 3, -1.0)));
        assert!(!spec.matches(&trade("USDJPY", "sell", 11, -1.0)));

        assert_eq!(
            FilterSpec::from_pairs([("colour", "red")]).unwrap_err(),
            FilterError::UnknownField("colour".into())
        );
        assert!(matches!(
            FilterSpec::from_pairs([("profit_min", "lots")]),
            Err(FilterError::InvalidValue { .. })
        ));
        assert!(matches!(
            FilterSpec::from_pairs([("date_from", "2024-03-01"), ("date_to", "2024-02-01")]),
            Err(FilterError::InvertedDateRange { .. })
        ));
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let trades = vec![trade("USDJPY", "buy", 1, 1.0)];
        assert!(FilterSpec::new().strategy("scalp").apply(&trades).is_empty());
    }
}
