//! Export — trades, breakdowns, and the equity curve as CSV or JSON, plus a
//! Markdown journal report.

use anyhow::{Context, Result};
use fxjournal_core::data::normalize::canonical_row;
use fxjournal_core::{Field, TradeRecord};
use serde::Serialize;

use crate::aggregate::GroupStats;
use crate::equity::EquityPoint;
use crate::metrics::PortfolioMetrics;
use crate::streaks::StreakReport;

// ─── JSON export ────────────────────────────────────────────────────

/// Any serializable analytics result as pretty JSON.
pub fn export_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Trades with one column per canonical field, cells in canonical text form.
pub fn export_trades_csv<'a, I>(trades: I) -> Result<String>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(Field::ALL.iter().map(|f| f.name()))?;
    for trade in trades {
        wtr.write_record(canonical_row(trade))?;
    }
    finish(wtr)
}

/// Breakdown rows. Missing means are written as empty cells.
///
/// Columns: key, total, mean, count, trades, avg_pips, win_rate
pub fn export_breakdown_csv(groups: &[GroupStats<String>]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["key", "total", "mean", "count", "trades", "avg_pips", "win_rate"])?;
    for g in groups {
        wtr.write_record([
            g.key.clone(),
            g.total.to_string(),
            opt(g.mean),
            g.count.to_string(),
            g.trades.to_string(),
            opt(g.avg_pips),
            opt(g.win_rate),
        ])?;
    }
    finish(wtr)
}

/// Cumulative P&L series.
///
/// Columns: date, trade_id, net, cumulative, peak, drawdown
pub fn export_equity_csv(series: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "trade_id", "net", "cumulative", "peak", "drawdown"])?;
    for p in series {
        wtr.write_record([
            p.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            p.trade_id.map(|id| id.to_string()).unwrap_or_default(),
            p.net.to_string(),
            p.cumulative.to_string(),
            p.peak.to_string(),
            p.drawdown.to_string(),
        ])?;
    }
    finish(wtr)
}

fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

// ─── Markdown report ────────────────────────────────────────────────

/// Human-readable journal summary.
pub fn generate_report(
    metrics: &PortfolioMetrics,
    streaks: &StreakReport,
    worst: &[&TradeRecord],
    strategies: &[GroupStats<String>],
) -> String {
    let mut md = String::new();
    md.push_str("# Trade Journal Report\n\n");

    md.push_str("## Performance\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Total trades | {} |\n", metrics.total_trades));
    md.push_str(&format!(
        "| Wins / losses | {} / {} |\n",
        metrics.winning_trades, metrics.losing_trades
    ));
    md.push_str(&format!("| Win rate | {:.1}% |\n", metrics.win_rate));
    md.push_str(&format!("| Profit factor | {} |\n", metrics.profit_factor));
    md.push_str(&format!("| Net P&L | {:.2} |\n", metrics.total_net_profit));
    md.push_str(&format!("| Max drawdown | {:.2} |\n", metrics.max_drawdown));
    let avg_pips = metrics.avg_pips.map_or("n/a".to_string(), |p| format!("{p:.1}"));
    md.push_str(&format!("| Avg pips | {avg_pips} |\n"));

    md.push_str("\n## Losing Streaks\n\n");
    md.push_str(&format!(
        "Longest: {} trades, {:.2} lost.\n\n",
        streaks.max_consecutive_losses, streaks.max_loss_amount
    ));
    for s in &streaks.streaks {
        let first = s.trades.first().and_then(|t| t.date);
        let last = s.trades.last().and_then(|t| t.date);
        let span = match (first, last) {
            (Some(a), Some(b)) => format!("{a} → {b}"),
            _ => "undated".to_string(),
        };
        md.push_str(&format!("- {} trades, {:.2} ({span})\n", s.count, s.total_loss));
    }

    if !worst.is_empty() {
        md.push_str("\n## Largest Losses\n\n");
        md.push_str("| Trade | Date | Pair | Net |\n");
        md.push_str("|-------|------|------|-----|\n");
        for t in worst {
            md.push_str(&format!(
                "| {} | {} | {} | {:.2} |\n",
                t.trade_id.map(|id| id.to_string()).unwrap_or_default(),
                t.date.map(|d| d.to_string()).unwrap_or_default(),
                t.currency_pair.as_deref().unwrap_or(""),
                t.net_profit_loss.unwrap_or(0.0),
            ));
        }
    }

    if !strategies.is_empty() {
        md.push_str("\n## By Strategy\n\n");
        md.push_str("| Strategy | Trades | Net | Win rate |\n");
        md.push_str("|----------|--------|-----|----------|\n");
        for g in strategies {
            let wr = g.win_rate.map_or("n/a".to_string(), |w| format!("{w:.1}%"));
            md.push_str(&format!("| {} | {} | {:.2} | {wr} |\n", g.key, g.trades, g.total));
        }
    }

    md
}
