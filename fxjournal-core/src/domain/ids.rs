use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable trade identifier (the broker ticket number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(pub i64);

impl TradeId {
    /// Parse a cell that should hold a trade id.
    ///
    /// Accepts integral text (`"1042"`) and integral decimals (`"1042.0"`),
    /// which is how spreadsheet exports often render whole numbers.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
        if cleaned.is_empty() {
            return None;
        }
        if let Ok(v) = cleaned.parse::<i64>() {
            return Some(Self(v));
        }
        let v = cleaned.parse::<f64>().ok()?;
        if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            Some(Self(v as i64))
        } else {
            None
        }
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TradeId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}
