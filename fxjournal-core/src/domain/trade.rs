//! TradeRecord — one closed FX position as seen by the analytics layer.

use super::ids::TradeId;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A closed position, materialized fresh from the trade store on every load.
///
/// Every cell that failed coercion (or was blank) is `None`; numeric code
/// skips `None` explicitly instead of treating it as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    // ── Identification ──
    pub trade_id: Option<TradeId>,
    pub currency_pair: Option<String>,
    #[serde(rename = "type")]
    pub trade_type: Option<String>,
    pub lot: Option<f64>,

    // ── Timing ──
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
    pub date: Option<NaiveDate>,
    pub holding_time_seconds: Option<i64>,

    // ── PnL ──
    pub profit_loss: Option<f64>,
    pub pips: Option<f64>,
    pub commission: Option<f64>,
    pub swap: Option<f64>,
    /// profit_loss + commission + swap; the figure every metric uses.
    pub net_profit_loss: Option<f64>,

    // ── Journal ──
    pub sync_time: Option<DateTime<FixedOffset>>,
    pub strategy: Option<String>,
    pub review_comment: Option<String>,
}

impl TradeRecord {
    /// Net P&L strictly above zero.
    pub fn is_win(&self) -> bool {
        self.net_profit_loss.is_some_and(|p| p > 0.0)
    }

    /// Net P&L strictly below zero.
    pub fn is_loss(&self) -> bool {
        self.net_profit_loss.is_some_and(|p| p < 0.0)
    }

    /// `net_profit_loss` as derived from its parts, when `profit_loss` is known.
    ///
    /// Missing commission or swap counts as no adjustment.
    pub fn derived_net(&self) -> Option<f64> {
        self.profit_loss
            .map(|pl| pl + self.commission.unwrap_or(0.0) + self.swap.unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_net(net: Option<f64>) -> TradeRecord {
        TradeRecord {
            net_profit_loss: net,
            ..Default::default()
        }
    }

    #[test]
    fn zero_is_neither_win_nor_loss() {
        let t = with_net(Some(0.0));
        assert!(!t.is_win());
        assert!(!t.is_loss());
    }

    #[test]
    fn missing_net_is_neither() {
        let t = with_net(None);
        assert!(!t.is_win());
        assert!(!t.is_loss());
    }

    #[test]
    fn sign_decides_outcome() {
        assert!(with_net(Some(12.5)).is_win());
        assert!(with_net(Some(-0.01)).is_loss());
    }

    #[test]
    fn derived_net_adds_adjustments() {
        let t = TradeRecord {
            profit_loss: Some(1000.0),
            commission: Some(-30.0),
            swap: None,
            ..Default::default()
        };
        assert_eq!(t.derived_net(), Some(970.0));
        assert_eq!(TradeRecord::default().derived_net(), None);
    }

    #[test]
    fn type_field_serializes_as_type() {
        let t = TradeRecord {
            trade_type: Some("buy".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "buy");
    }
}
