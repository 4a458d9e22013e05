//! Position sizing — lots from a risk budget, take-profit from a reward ratio.
//!
//! Risk amount = balance × risk%. Lots = risk amount / (stop distance in
//! pips × pip value per lot). Units = lots × lot unit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Units in one standard lot.
pub const STANDARD_LOT_UNIT: f64 = 100_000.0;

#[derive(Debug, Error, PartialEq)]
pub enum SizingError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must be a finite number")]
    NotFinite { name: &'static str },

    #[error("entry and stop must differ (both {price})")]
    EntryEqualsStop { price: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingInput {
    pub balance: f64,
    /// Percent of balance put at risk (1.0 = 1%).
    pub risk_pct: f64,
    /// Stop distance in pips.
    pub stop_pips: f64,
    /// Account-currency value of one pip for one lot.
    pub pip_value_per_lot: f64,
    pub lot_unit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSize {
    pub risk_amount: f64,
    pub stop_pips: f64,
    pub lots: f64,
    pub units: f64,
}

impl PositionSize {
    /// Loss if the stop is hit; equals `risk_amount` up to rounding.
    pub fn loss_at_stop(&self, pip_value_per_lot: f64) -> f64 {
        self.stop_pips * pip_value_per_lot * self.lots
    }
}

pub fn position_size(input: &SizingInput) -> Result<PositionSize, SizingError> {
    let balance = finite("balance", input.balance)?;
    let risk_pct = finite("risk_pct", input.risk_pct)?;
    let stop_pips = positive("stop_pips", input.stop_pips)?;
    let pip_value = positive("pip_value_per_lot", input.pip_value_per_lot)?;
    let lot_unit = positive("lot_unit", input.lot_unit)?;

    let risk_amount = balance * (risk_pct / 100.0);
    let lots = risk_amount / (stop_pips * pip_value);
    Ok(PositionSize {
        risk_amount,
        stop_pips,
        lots,
        units: lots * lot_unit,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TakeProfit {
    pub price: f64,
    pub stop_distance: f64,
    pub target_distance: f64,
    pub direction: Direction,
}

/// Take-profit price `rr` stop-distances beyond the entry. A stop below the
/// entry means long, above means short.
pub fn take_profit(entry: f64, stop: f64, rr: f64) -> Result<TakeProfit, SizingError> {
    let entry = finite("entry", entry)?;
    let stop = finite("stop", stop)?;
    let rr = positive("rr", rr)?;

    let direction = if entry > stop {
        Direction::Long
    } else if entry < stop {
        Direction::Short
    } else {
        return Err(SizingError::EntryEqualsStop { price: entry });
    };
    let stop_distance = (entry - stop).abs();
    let target_distance = stop_distance * rr;
    let price = match direction {
        Direction::Long => entry + target_distance,
        Direction::Short => entry - target_distance,
    };
    Ok(TakeProfit {
        price,
        stop_distance,
        target_distance,
        direction,
    })
}

fn finite(name: &'static str, value: f64) -> Result<f64, SizingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SizingError::NotFinite { name })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, SizingError> {
    let value = finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SizingError::NotPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(stop_pips: f64) -> SizingInput {
        SizingInput {
            balance: 1_000_000.0,
            risk_pct: 2.0,
            stop_pips,
            pip_value_per_lot: 1_000.0,
            lot_unit: STANDARD_LOT_UNIT,
        }
    }

    #[test]
    fn lots_from_risk_budget() {
        let size = position_size(&input(20.0)).unwrap();
        assert_eq!(size.risk_amount, 20_000.0);
        assert_eq!(size.lots, 1.0);
        assert_eq!(size.units, 100_000.0);
        assert_eq!(size.loss_at_stop(1_000.0), 20_000.0);
    }

    #[test]
    fn rejects_non_positive_stop() {
        assert_eq!(
            position_size(&input(0.0)).unwrap_err(),
            SizingError::NotPositive { name: "stop_pips", value: 0.0 }
        );
        assert!(matches!(
            position_size(&input(f64::NAN)),
            Err(SizingError::NotFinite { name: "stop_pips" })
        ));
    }

    #[test]
    fn take_profit_long_and_short() {
        let long = take_profit(150.00, 149.50, 2.0).unwrap();
        assert_eq!(long.direction, Direction::Long);
        assert!((long.price - 151.00).abs() < 1e-9);
        assert!((long.stop_distance - 0.5).abs() < 1e-9);

        let short = take_profit(1.0800, 1.0850, 1.5).unwrap();
        assert_eq!(short.direction, Direction::Short);
        assert!((short.price - 1.0725).abs() < 1e-9);
    }

    #[test]
    fn take_profit_rejects_bad_input() {
        assert_eq!(
            take_profit(1.0, 1.0, 2.0).unwrap_err(),
            SizingError::EntryEqualsStop { price: 1.0 }
        );
        assert!(matches!(take_profit(1.0, 0.9, 0.0), Err(SizingError::NotPositive { name: "rr", .. })));
    }
}
