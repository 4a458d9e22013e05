//! End-to-end: import a statement into a CSV journal, annotate it, manage
//! strategies, and analyse the result, all on disk.

use std::fs;

use chrono::TimeZone;
use fxjournal_analytics::aggregate::by_strategy;
use fxjournal_analytics::{
    detect_streaks, sync_trades, FilterSpec, JournalConfig, JournalSession, PortfolioMetrics,
};
use fxjournal_core::domain::default_reference_offset;
use fxjournal_core::report::load_report;
use fxjournal_core::store::{CsvTradeStore, JsonStrategyCatalog};
use fxjournal_core::{EditableField, Normalizer, TradeId};

const STATEMENT: &str = "\
Ticket,Symbol,Type,Volume,Open Time,Open Price,Close Time,Close Price,Commission,Swap,Profit
5001,USDJPY,buy,0.10,2024.05.06 09:30:00,155.00,2024.05.06 10:00:00,155.40,-0.5,0,400
5002,USDJPY,sell,0.10,2024.05.07 23:10:00,155.50,2024.05.08 01:00:00,155.80,-0.5,0,-300
5003,EURUSD,buy,0.20,2024.05.08 16:00:00,1.0750,2024.05.08 16:04:00,1.0740,-1,0,-200
5004,USDJPY,buy,0.10,2024.05.09 10:00:00,155.20,2024.05.09 12:00:00,155.10,-0.5,-0.5,-100
5005,GBPJPY,sell,0.10,2024.05.13 15:00:00,195.00,2024.05.13 18:00:00,194.00,-0.5,0,1000
";

#[test]
fn import_annotate_and_analyse() {
    let dir = tempfile::tempdir().unwrap();
    let config = JournalConfig::from_toml(&format!(
        "[store]\ntrades_path = {:?}\n[catalog]\npath = {:?}\n",
        dir.path().join("trades.csv").display().to_string(),
        dir.path().join("strategies.json").display().to_string(),
    ))
    .unwrap();

    let report_path = dir.path().join("statement.csv");
    fs::write(&report_path, STATEMENT).unwrap();
    let offset = config.analysis.reference_offset();
    let statement = load_report(&report_path, offset).unwrap();
    assert_eq!(statement.len(), 5);

    let mut store = CsvTradeStore::new(&config.store.trades_path);
    let now = default_reference_offset()
        .with_ymd_and_hms(2024, 5, 14, 8, 0, 0)
        .unwrap();
    let summary = sync_trades(&statement, &mut store, now).unwrap();
    assert_eq!(summary.new, 5);

    let mut session = JournalSession::open(
        store,
        JsonStrategyCatalog::new(&config.catalog.path),
        Normalizer::new(offset),
    )
    .unwrap();
    assert_eq!(session.trades().len(), 5);
    assert!(!session.snapshot().report.has_failures());

    session.save_strategy("breakout", "enter on range break").unwrap();
    session
        .annotate(TradeId(5001), EditableField::Strategy, "breakout")
        .unwrap();
    session
        .annotate(TradeId(5005), EditableField::Strategy, "breakout")
        .unwrap();
    session
        .annotate(TradeId(5002), EditableField::ReviewComment, "chased the move")
        .unwrap();
    assert!(session.refresh().unwrap());

    let trades = session.trades();
    let metrics = PortfolioMetrics::compute(trades);
    assert_eq!(metrics.total_trades, 5);
    assert_eq!(metrics.winning_trades, 2);
    assert_eq!(metrics.losing_trades, 3);
    assert!((metrics.total_net_profit - 796.5).abs() < 1e-9);

    let streaks = detect_streaks(trades, 3);
    assert_eq!(streaks.max_consecutive_losses, 3);
    assert!((streaks.max_loss_amount - 602.5).abs() < 1e-9);

    let strategies = by_strategy(trades);
    assert_eq!(strategies.len(), 1);
    assert_eq!(strategies[0].trades, 2);

    let usdjpy_losses = FilterSpec::new().currency_pair("usdjpy").only_losses(true).apply(trades);
    assert_eq!(usdjpy_losses.len(), 2);
    assert_eq!(
        usdjpy_losses[0].review_comment.as_deref(),
        Some("chased the move")
    );

    let allowed = session.store().allowed_values().unwrap();
    assert_eq!(allowed[&EditableField::Strategy], vec!["breakout".to_string()]);

    // A second import of the same statement adds nothing.
    let again = sync_trades(&statement, session.store_mut(), now).unwrap();
    assert_eq!(again.new, 0);
    assert_eq!(again.existing, 5);
    assert!(!session.refresh().unwrap());
}
