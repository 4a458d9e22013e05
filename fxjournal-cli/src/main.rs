//! FX Journal CLI — trade journal analytics from the command line.
//!
//! Commands:
//! - `summary`: headline metrics, longest losing streak, worst trades
//! - `breakdown --by <dimension>`: grouped statistics
//! - `streaks`: losing streaks
//! - `trades`: filtered trade list
//! - `top-losses`: the largest losing trades
//! - `annotate`: set a trade's strategy or review comment
//! - `strategy list|show|add|save|delete`: manage the strategy catalog
//! - `import <report>`: sync an MT5 statement into the journal
//! - `size`: position size and take-profit calculator
//! - `export`: write trades, a breakdown, the equity curve, or a report

mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fxjournal_analytics::aggregate::{by_strategy, Period};
use fxjournal_analytics::export::{
    export_breakdown_csv, export_equity_csv, export_json, export_trades_csv, generate_report,
};
use fxjournal_analytics::sizing::STANDARD_LOT_UNIT;
use fxjournal_analytics::{
    breakdown, cumulative_series, detect_streaks, position_size, sync_trades, take_profit,
    top_losses, Dimension, FilterSpec, GroupStats, JournalConfig, JournalSession,
    PortfolioMetrics, SizingInput,
};
use fxjournal_core::report::load_report;
use fxjournal_core::store::{CsvTradeStore, JsonStrategyCatalog};
use fxjournal_core::{EditableField, Normalizer, TradeId, TradeRecord};
use tracing::info;

type Session = JournalSession<CsvTradeStore, JsonStrategyCatalog>;

#[derive(Parser)]
#[command(name = "fxjournal", about = "FX Journal CLI — trade journal analytics")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "fxjournal.toml")]
    config: PathBuf,

    /// Trade table CSV (overrides the config).
    #[arg(long, global = true)]
    trades: Option<PathBuf>,

    /// Debug logging.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportKind {
    Trades,
    Breakdown,
    Equity,
    Report,
}

/// Trade filters shared by the analysis commands.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Currency pair (e.g. USDJPY); "all" disables.
    #[arg(long)]
    pair: Option<String>,

    /// Trade type (buy / sell); "all" disables.
    #[arg(long = "type")]
    trade_type: Option<String>,

    /// Strategy tag; "all" disables.
    #[arg(long)]
    strategy: Option<String>,

    /// First date, inclusive (YYYY-MM-DD).
    #[arg(long)]
    from: Option<String>,

    /// Last date, inclusive (YYYY-MM-DD).
    #[arg(long)]
    to: Option<String>,

    /// Minimum net P&L, inclusive.
    #[arg(long, allow_hyphen_values = true)]
    min_profit: Option<String>,

    /// Maximum net P&L, inclusive.
    #[arg(long, allow_hyphen_values = true)]
    max_profit: Option<String>,

    /// Keep only trades that are not wins.
    #[arg(long, default_value_t = false)]
    only_losses: bool,
}

impl FilterArgs {
    fn to_spec(&self) -> Result<FilterSpec> {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        let optional = [
            ("currency_pair", &self.pair),
            ("type", &self.trade_type),
            ("strategy", &self.strategy),
            ("date_from", &self.from),
            ("date_to", &self.to),
            ("profit_min", &self.min_profit),
            ("profit_max", &self.max_profit),
        ];
        for (field, value) in optional {
            if let Some(v) = value {
                pairs.push((field, v.clone()));
            }
        }
        if self.only_losses {
            pairs.push(("only_losses", "true".to_string()));
        }
        FilterSpec::from_pairs(pairs).context("invalid filter")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Headline metrics, longest losing streak, and worst trades.
    Summary {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Grouped statistics along one dimension.
    Breakdown {
        /// strategy, pair, period, weekday, session, or holding.
        #[arg(long)]
        by: String,

        /// Period granularity for `--by period` (daily … yearly).
        #[arg(long)]
        period: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Losing streaks.
    Streaks {
        /// Shortest streak listed individually.
        #[arg(long)]
        min: Option<usize>,

        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Filtered trade list.
    Trades {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// The largest losing trades.
    TopLosses {
        #[arg(short, long)]
        n: Option<usize>,

        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Set a trade's strategy and/or review comment.
    Annotate {
        trade_id: String,

        #[arg(long)]
        strategy: Option<String>,

        #[arg(long)]
        comment: Option<String>,
    },
    /// Strategy catalog management.
    Strategy {
        #[command(subcommand)]
        action: StrategyAction,
    },
    /// Sync an MT5 statement (CSV or HTML) into the trade table.
    Import {
        report: PathBuf,

        /// Parse and report counts without writing.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Position size from a risk budget; optional take-profit price.
    Size {
        #[arg(long)]
        balance: f64,

        /// Risk per trade in percent (1 = 1%).
        #[arg(long)]
        risk: f64,

        /// Stop distance in pips.
        #[arg(long)]
        stop_pips: f64,

        /// Value of one pip for one lot, in account currency.
        #[arg(long)]
        pip_value: f64,

        #[arg(long, default_value_t = STANDARD_LOT_UNIT)]
        lot_unit: f64,

        #[arg(long)]
        entry: Option<f64>,

        #[arg(long)]
        stop: Option<f64>,

        /// Reward-to-risk ratio for the take-profit price.
        #[arg(long)]
        rr: Option<f64>,
    },
    /// Write trades, a breakdown, the equity curve, or a Markdown report.
    Export {
        #[arg(value_enum)]
        what: ExportKind,

        /// Dimension for `breakdown`.
        #[arg(long, default_value = "strategy")]
        by: String,

        /// Period granularity for `--by period` (daily … yearly).
        #[arg(long)]
        period: Option<String>,

        #[arg(long, value_enum, default_value = "csv")]
        format: OutputFormat,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum StrategyAction {
    /// Every known strategy, from the catalog and the trade history.
    List,
    /// Rules of one strategy.
    Show { name: String },
    /// Create a new strategy; fails if the name is already known.
    Add {
        name: String,
        #[arg(long, default_value = "")]
        rules: String,
    },
    /// Create or replace the rules of a strategy.
    Save {
        name: String,
        #[arg(long)]
        rules: String,
    },
    /// Remove a strategy from the catalog.
    Delete { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = JournalConfig::load_or_default(Some(cli.config.as_path()))
        .with_context(|| format!("load config {}", cli.config.display()))?;
    if let Some(trades) = cli.trades {
        config.store.trades_path = trades;
    }
    logging::init(&config.logging, cli.verbose);

    match cli.command {
        Commands::Summary { filter, format } => run_summary(&config, &filter, format),
        Commands::Breakdown {
            by,
            period,
            filter,
            format,
        } => run_breakdown(&config, &by, period.as_deref(), &filter, format),
        Commands::Streaks {
            min,
            filter,
            format,
        } => run_streaks(&config, min, &filter, format),
        Commands::Trades { filter, format } => run_trades(&config, &filter, format),
        Commands::TopLosses { n, filter, format } => run_top_losses(&config, n, &filter, format),
        Commands::Annotate {
            trade_id,
            strategy,
            comment,
        } => run_annotate(&config, &trade_id, strategy, comment),
        Commands::Strategy { action } => run_strategy(&config, action),
        Commands::Import { report, dry_run } => run_import(&config, &report, dry_run),
        Commands::Size {
            balance,
            risk,
            stop_pips,
            pip_value,
            lot_unit,
            entry,
            stop,
            rr,
        } => run_size(
            SizingInput {
                balance,
                risk_pct: risk,
                stop_pips,
                pip_value_per_lot: pip_value,
                lot_unit,
            },
            entry,
            stop,
            rr,
        ),
        Commands::Export {
            what,
            by,
            period,
            format,
            filter,
            output,
        } => run_export(
            &config,
            what,
            (&by, period.as_deref()),
            format,
            &filter,
            output.as_deref(),
        ),
    }
}

// ─── Session helpers ────────────────────────────────────────────────

fn open_session(config: &JournalConfig) -> Result<Session> {
    let store = CsvTradeStore::new(&config.store.trades_path);
    let catalog = JsonStrategyCatalog::new(&config.catalog.path);
    let normalizer = Normalizer::new(config.analysis.reference_offset());
    let session = JournalSession::open(store, catalog, normalizer).with_context(|| {
        format!("open journal {}", config.store.trades_path.display())
    })?;

    let report = &session.snapshot().report;
    if report.has_failures() {
        for (field, count) in report.failure_counts() {
            info!(%field, count, "cells could not be parsed and were left empty");
        }
    }
    Ok(session)
}

fn filtered(session: &Session, filter: &FilterArgs) -> Result<Vec<TradeRecord>> {
    Ok(filter.to_spec()?.apply_owned(session.trades()))
}

fn parse_dimension(config: &JournalConfig, by: &str, period: Option<&str>) -> Result<Dimension> {
    let period = match period {
        Some(p) => match Period::from_name(p) {
            Some(p) => p,
            None => bail!("unknown period '{p}'. Valid: daily, weekly, monthly, quarterly, yearly"),
        },
        None => config.analysis.period,
    };
    match Dimension::from_name(by, period) {
        Some(d) => Ok(d),
        None => bail!(
            "unknown dimension '{by}'. Valid: strategy, pair, period, weekday, session, holding"
        ),
    }
}

// ─── Analysis commands ──────────────────────────────────────────────

fn run_summary(config: &JournalConfig, filter: &FilterArgs, format: OutputFormat) -> Result<()> {
    let session = open_session(config)?;
    let trades = filtered(&session, filter)?;
    let metrics = PortfolioMetrics::compute(&trades);
    let streaks = detect_streaks(&trades, config.analysis.min_reported_streak);
    let worst = top_losses(&trades, config.analysis.top_losses);

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "metrics": metrics,
                "max_consecutive_losses": streaks.max_consecutive_losses,
                "max_loss_amount": streaks.max_loss_amount,
                "top_losses": worst,
            });
            println!("{}", export_json(&body)?);
        }
        OutputFormat::Csv => bail!("summary supports table or json output"),
        OutputFormat::Table => {
            println!("Trades:          {}", metrics.total_trades);
            println!(
                "Wins / losses:   {} / {}",
                metrics.winning_trades, metrics.losing_trades
            );
            println!("Win rate:        {:.1}%", metrics.win_rate);
            println!("Profit factor:   {}", metrics.profit_factor);
            println!("Net P&L:         {:.2}", metrics.total_net_profit);
            println!("Gross profit:    {:.2}", metrics.total_profit);
            println!("Gross loss:      {:.2}", metrics.total_loss);
            println!("Max drawdown:    {:.2}", metrics.max_drawdown);
            match metrics.avg_pips {
                Some(p) => println!("Avg pips:        {p:.1}"),
                None => println!("Avg pips:        n/a"),
            }
            println!(
                "Longest losing streak: {} trades ({:.2})",
                streaks.max_consecutive_losses, streaks.max_loss_amount
            );
            if !worst.is_empty() {
                println!();
                println!("Largest losses:");
                print_trades(&worst);
            }
        }
    }
    Ok(())
}

fn run_breakdown(
    config: &JournalConfig,
    by: &str,
    period: Option<&str>,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<()> {
    let dimension = parse_dimension(config, by, period)?;
    let session = open_session(config)?;
    let trades = filtered(&session, filter)?;
    let groups = breakdown(&trades, dimension, config.analysis.reference_offset());

    match format {
        OutputFormat::Json => println!("{}", export_json(&groups)?),
        OutputFormat::Csv => print!("{}", export_breakdown_csv(&groups)?),
        OutputFormat::Table => print_groups(dimension.name(), &groups),
    }
    Ok(())
}

fn run_streaks(
    config: &JournalConfig,
    min: Option<usize>,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<()> {
    let min = min.unwrap_or(config.analysis.min_reported_streak);
    let session = open_session(config)?;
    let trades = filtered(&session, filter)?;
    let report = detect_streaks(&trades, min);

    match format {
        OutputFormat::Json => println!("{}", export_json(&report)?),
        OutputFormat::Csv => bail!("streaks support table or json output"),
        OutputFormat::Table => {
            println!(
                "Longest losing streak: {} trades ({:.2})",
                report.max_consecutive_losses, report.max_loss_amount
            );
            println!("Streaks of {min} or more: {}", report.streaks.len());
            for streak in &report.streaks {
                println!();
                println!("{} trades, {:.2} lost", streak.count, streak.total_loss);
                let rows: Vec<&TradeRecord> = streak.trades.iter().collect();
                print_trades(&rows);
            }
        }
    }
    Ok(())
}

fn run_trades(config: &JournalConfig, filter: &FilterArgs, format: OutputFormat) -> Result<()> {
    let session = open_session(config)?;
    let trades = filtered(&session, filter)?;
    match format {
        OutputFormat::Json => println!("{}", export_json(&trades)?),
        OutputFormat::Csv => print!("{}", export_trades_csv(&trades)?),
        OutputFormat::Table => {
            let rows: Vec<&TradeRecord> = trades.iter().collect();
            print_trades(&rows);
            println!("{} trades", trades.len());
        }
    }
    Ok(())
}

fn run_top_losses(
    config: &JournalConfig,
    n: Option<usize>,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<()> {
    let session = open_session(config)?;
    let trades = filtered(&session, filter)?;
    let worst = top_losses(&trades, n.unwrap_or(config.analysis.top_losses));
    match format {
        OutputFormat::Json => println!("{}", export_json(&worst)?),
        OutputFormat::Csv => print!("{}", export_trades_csv(worst.iter().copied())?),
        OutputFormat::Table => print_trades(&worst),
    }
    Ok(())
}

// ─── Journal editing ────────────────────────────────────────────────

fn run_annotate(
    config: &JournalConfig,
    trade_id: &str,
    strategy: Option<String>,
    comment: Option<String>,
) -> Result<()> {
    if strategy.is_none() && comment.is_none() {
        bail!("nothing to do: pass --strategy and/or --comment");
    }
    let Some(id) = TradeId::parse(trade_id) else {
        bail!("invalid trade id '{trade_id}'");
    };
    let mut session = open_session(config)?;

    if let Some(name) = strategy {
        if !name.trim().is_empty() && !session.registry().contains(&name) {
            eprintln!("note: '{}' is not in the strategy list yet", name.trim());
        }
        session.annotate(id, EditableField::Strategy, &name)?;
    }
    if let Some(text) = comment {
        session.annotate(id, EditableField::ReviewComment, &text)?;
    }
    println!("Updated trade {id}");
    Ok(())
}

fn run_strategy(config: &JournalConfig, action: StrategyAction) -> Result<()> {
    let mut session = open_session(config)?;
    match action {
        StrategyAction::List => {
            let registry = session.registry();
            if registry.is_empty() {
                println!("No strategies yet.");
            }
            for entry in registry.entries() {
                let source = match entry.source {
                    fxjournal_analytics::StrategySource::Catalog => "catalog",
                    fxjournal_analytics::StrategySource::History => "history",
                };
                println!("{:<24} {:>6} trades  [{source}]", entry.name, entry.trade_count);
            }
        }
        StrategyAction::Show { name } => match session.strategy(&name) {
            Some(entry) => {
                println!("{}", entry.name);
                if let Some(edited) = entry.last_edited_time {
                    println!("last edited: {}", edited.format("%Y-%m-%d %H:%M"));
                }
                println!();
                println!("{}", entry.rules);
            }
            None => bail!("strategy '{}' has no catalog entry", name.trim()),
        },
        StrategyAction::Add { name, rules } => {
            session.create_strategy(&name, &rules)?;
            println!("Created strategy '{}'", name.trim());
        }
        StrategyAction::Save { name, rules } => {
            session.save_strategy(&name, &rules)?;
            println!("Saved strategy '{}'", name.trim());
        }
        StrategyAction::Delete { name } => {
            session.delete_strategy(&name)?;
            println!("Deleted strategy '{}'", name.trim());
        }
    }
    Ok(())
}

fn run_import(config: &JournalConfig, report: &Path, dry_run: bool) -> Result<()> {
    let offset = config.analysis.reference_offset();
    let trades = load_report(report, offset)
        .with_context(|| format!("read statement {}", report.display()))?;
    println!("Parsed {} closed positions from {}", trades.len(), report.display());
    if dry_run {
        return Ok(());
    }

    let mut store = CsvTradeStore::new(&config.store.trades_path);
    let now = Utc::now().with_timezone(&offset);
    let summary = sync_trades(&trades, &mut store, now)
        .with_context(|| format!("sync into {}", config.store.trades_path.display()))?;
    println!(
        "New: {}  Already present: {}  Failed: {}",
        summary.new, summary.existing, summary.failed
    );
    if summary.failed > 0 {
        bail!("{} trades could not be written", summary.failed);
    }
    Ok(())
}

fn run_size(input: SizingInput, entry: Option<f64>, stop: Option<f64>, rr: Option<f64>) -> Result<()> {
    let size = position_size(&input)?;
    println!("Risk amount:  {:.2}", size.risk_amount);
    println!("Lots:         {:.4}", size.lots);
    println!("Units:        {:.0}", size.units);
    println!(
        "Loss at stop: {:.2}",
        size.loss_at_stop(input.pip_value_per_lot)
    );

    match (entry, stop, rr) {
        (Some(entry), Some(stop), Some(rr)) => {
            let tp = take_profit(entry, stop, rr)?;
            println!();
            println!("Direction:    {:?}", tp.direction);
            println!("Take profit:  {:.5}", tp.price);
            println!("Stop dist:    {:.5}", tp.stop_distance);
            println!("Target dist:  {:.5}", tp.target_distance);
        }
        (None, None, None) => {}
        _ => bail!("--entry, --stop, and --rr go together"),
    }
    Ok(())
}

fn run_export(
    config: &JournalConfig,
    what: ExportKind,
    (by, period): (&str, Option<&str>),
    format: OutputFormat,
    filter: &FilterArgs,
    output: Option<&Path>,
) -> Result<()> {
    let dimension = parse_dimension(config, by, period)?;
    let session = open_session(config)?;
    let trades = filtered(&session, filter)?;
    let offset = config.analysis.reference_offset();

    let body = match (what, format) {
        (ExportKind::Trades, OutputFormat::Json) => export_json(&trades)?,
        (ExportKind::Trades, _) => export_trades_csv(&trades)?,
        (ExportKind::Breakdown, fmt) => {
            let groups = breakdown(&trades, dimension, offset);
            match fmt {
                OutputFormat::Json => export_json(&groups)?,
                _ => export_breakdown_csv(&groups)?,
            }
        }
        (ExportKind::Equity, OutputFormat::Json) => export_json(&cumulative_series(&trades))?,
        (ExportKind::Equity, _) => export_equity_csv(&cumulative_series(&trades))?,
        (ExportKind::Report, _) => generate_report(
            &PortfolioMetrics::compute(&trades),
            &detect_streaks(&trades, config.analysis.min_reported_streak),
            &top_losses(&trades, config.analysis.top_losses),
            &by_strategy(&trades),
        ),
    };

    match output {
        Some(path) => {
            fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{body}"),
    }
    Ok(())
}

// ─── Table output ───────────────────────────────────────────────────

fn print_trades(trades: &[&TradeRecord]) {
    println!(
        "{:>10}  {:<10}  {:<8}  {:<5}  {:>10}  {:>8}  {:<16}",
        "trade", "date", "pair", "type", "net", "pips", "strategy"
    );
    for t in trades {
        println!(
            "{:>10}  {:<10}  {:<8}  {:<5}  {:>10}  {:>8}  {:<16}",
            t.trade_id.map(|id| id.to_string()).unwrap_or_default(),
            t.date.map(|d| d.to_string()).unwrap_or_default(),
            t.currency_pair.as_deref().unwrap_or(""),
            t.trade_type.as_deref().unwrap_or(""),
            t.net_profit_loss.map(|v| format!("{v:.2}")).unwrap_or_default(),
            t.pips.map(|v| format!("{v:.1}")).unwrap_or_default(),
            t.strategy.as_deref().unwrap_or(""),
        );
    }
}

fn print_groups(dimension: &str, groups: &[GroupStats<String>]) {
    if groups.is_empty() {
        println!("No trades to group by {dimension}.");
        return;
    }
    println!(
        "{:<16}  {:>6}  {:>12}  {:>10}  {:>8}  {:>8}",
        dimension, "trades", "total", "mean", "win %", "pips"
    );
    let fmt_opt = |v: Option<f64>, prec: usize| {
        v.map(|x| format!("{x:.prec$}")).unwrap_or_else(|| "-".to_string())
    };
    for g in groups {
        println!(
            "{:<16}  {:>6}  {:>12.2}  {:>10}  {:>8}  {:>8}",
            g.key,
            g.trades,
            g.total,
            fmt_opt(g.mean, 2),
            fmt_opt(g.win_rate, 1),
            fmt_opt(g.avg_pips, 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_flags_build_a_spec() {
        let cli = Cli::try_parse_from([
            "fxjournal",
            "trades",
            "--pair",
            "usdjpy",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--min-profit",
            "-500",
            "--only-losses",
        ])
        .unwrap();
        let Commands::Trades { filter, .. } = cli.command else {
            panic!("expected trades command");
        };
        let spec = filter.to_spec().unwrap();
        assert!(!spec.is_empty());
    }

    #[test]
    fn inverted_dates_are_rejected() {
        let filter = FilterArgs {
            from: Some("2024-02-01".into()),
            to: Some("2024-01-01".into()),
            ..Default::default()
        };
        assert!(filter.to_spec().is_err());
    }

    #[test]
    fn dimension_names() {
        let config = JournalConfig::default();
        assert_eq!(
            parse_dimension(&config, "period", Some("weekly")).unwrap(),
            Dimension::Period(Period::Weekly)
        );
        assert_eq!(
            parse_dimension(&config, "session", None).unwrap(),
            Dimension::Session
        );
        assert!(parse_dimension(&config, "colour", None).is_err());
        assert!(parse_dimension(&config, "period", Some("hourly")).is_err());
    }

    #[test]
    fn export_breakdown_honours_period() {
        let cli = Cli::try_parse_from([
            "fxjournal",
            "export",
            "breakdown",
            "--by",
            "period",
            "--period",
            "quarterly",
        ])
        .unwrap();
        let Commands::Export { by, period, .. } = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(
            parse_dimension(&JournalConfig::default(), &by, period.as_deref()).unwrap(),
            Dimension::Period(Period::Quarterly)
        );
    }
}
