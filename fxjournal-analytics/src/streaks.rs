//! Streak detector — runs of consecutive non-winning trades.

use fxjournal_core::TradeRecord;
use serde::{Deserialize, Serialize};

use crate::equity::chronological;

/// Streaks shorter than this are not listed individually.
pub const DEFAULT_MIN_REPORTED_STREAK: usize = 3;

/// One run of consecutive non-winning trades, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossStreak {
    pub count: usize,
    /// Sum of |net P&L| over the run.
    pub total_loss: f64,
    pub trades: Vec<TradeRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakReport {
    pub max_consecutive_losses: usize,
    /// Total loss of the longest run (the first one on ties).
    pub max_loss_amount: f64,
    /// Every run of at least the reporting threshold, in encounter order.
    pub streaks: Vec<LossStreak>,
}

/// Scan date-sorted trades for losing runs.
///
/// Any trade that is not a win extends the current run; a win closes it.
/// Trades without a net figure extend the run but add nothing to its loss.
pub fn detect_streaks(trades: &[TradeRecord], min_reported: usize) -> StreakReport {
    let mut report = StreakReport::default();
    let mut current: Vec<&TradeRecord> = Vec::new();
    let mut current_loss = 0.0;

    for trade in chronological(trades) {
        if trade.is_win() {
            close_streak(&mut report, &mut current, &mut current_loss, min_reported);
        } else {
            current_loss += trade.net_profit_loss.map_or(0.0, f64::abs);
            current.push(trade);
        }
    }
    close_streak(&mut report, &mut current, &mut current_loss, min_reported);
    report
}

fn close_streak(
    report: &mut StreakReport,
    current: &mut Vec<&TradeRecord>,
    current_loss: &mut f64,
    min_reported: usize,
) {
    let count = current.len();
    if count == 0 {
        return;
    }
    if count > report.max_consecutive_losses {
        report.max_consecutive_losses = count;
        report.max_loss_amount = *current_loss;
    }
    if count >= min_reported {
        report.streaks.push(LossStreak {
            count,
            total_loss: *current_loss,
            trades: current.iter().map(|t| (*t).clone()).collect(),
        });
    }
    current.clear();
    *current_loss = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fxjournal_core::TradeId;

    fn sequence(nets: &[f64]) -> Vec<TradeRecord> {
        nets.iter()
            .enumerate()
            .map(|(i, n)| TradeRecord {
                trade_id: Some(TradeId(i as i64 + 1)),
                date: NaiveDate::from_ymd_opt(2024, 5, i as u32 + 1),
                net_profit_loss: Some(*n),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn single_qualifying_streak() {
        let r = detect_streaks(&sequence(&[100.0, -50.0, -50.0, -50.0, 200.0, -10.0]), 3);
        assert_eq!(r.max_consecutive_losses, 3);
        assert_eq!(r.max_loss_amount, 150.0);
        assert_eq!(r.streaks.len(), 1);
        let ids: Vec<TradeId> = r.streaks[0].trades.iter().filter_map(|t| t.trade_id).collect();
        assert_eq!(ids, vec![TradeId(2), TradeId(3), TradeId(4)]);
    }

    #[test]
    fn all_losses() {
        let r = detect_streaks(&sequence(&[-1.0, -2.0, -3.0, -4.0]), 3);
        assert_eq!(r.max_consecutive_losses, 4);
        assert_eq!(r.max_loss_amount, 10.0);
        assert_eq!(r.streaks.len(), 1);
    }

    #[test]
    fn ties_keep_the_first_streak() {
        let r = detect_streaks(&sequence(&[-5.0, -5.0, 1.0, -50.0, -50.0]), 3);
        assert_eq!(r.max_consecutive_losses, 2);
        assert_eq!(r.max_loss_amount, 10.0);
        assert!(r.streaks.is_empty());
    }

    #[test]
    fn flat_trades_extend_streaks() {
        let r = detect_streaks(&sequence(&[-5.0, 0.0, -5.0, 3.0]), 3);
        assert_eq!(r.max_consecutive_losses, 3);
        assert_eq!(r.max_loss_amount, 10.0);
    }

    #[test]
    fn sorted_by_date_before_scanning() {
        let mut trades = sequence(&[-1.0, -1.0, 5.0, -1.0]);
        // Move the win to the end of the calendar.
        trades[2].date = NaiveDate::from_ymd_opt(2024, 6, 1);
        let r = detect_streaks(&trades, 3);
        assert_eq!(r.max_consecutive_losses, 3);
    }

    #[test]
    fn empty_input() {
        assert_eq!(detect_streaks(&[], 3), StreakReport::default());
    }
}
