//! FX Journal Analytics — metrics, breakdowns, streaks, filters, and the
//! journal session.
//!
//! This crate builds on `fxjournal-core` to provide:
//! - Portfolio metrics and the cumulative P&L series
//! - Breakdowns by strategy, pair, calendar period, weekday, session, holding time
//! - Losing-streak detection and top losses
//! - The filter engine
//! - The strategy registry and catalog management through a journal session
//! - Broker-statement sync, position sizing, export, and configuration

pub mod aggregate;
pub mod config;
pub mod equity;
pub mod export;
pub mod filter;
pub mod metrics;
pub mod registry;
pub mod session;
pub mod sizing;
pub mod streaks;
pub mod sync;

pub use aggregate::{breakdown, group_and_summarize, Dimension, GroupStats, Period};
pub use config::{ConfigError, JournalConfig, LogFormat};
pub use equity::{cumulative_series, max_drawdown, EquityPoint};
pub use filter::{FilterError, FilterSpec};
pub use metrics::{top_losses, PortfolioMetrics, ProfitFactor};
pub use registry::{RegistryEntry, StrategyRegistry, StrategySource};
pub use session::{JournalSession, SessionError, Snapshot};
pub use sizing::{position_size, take_profit, PositionSize, SizingError, SizingInput, TakeProfit};
pub use streaks::{detect_streaks, LossStreak, StreakReport};
pub use sync::{sync_trades, SyncSummary};

#[cfg(test)]
mod send_sync_checks {
    use super::*;
    use fxjournal_core::store::{CsvTradeStore, JsonStrategyCatalog};

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn results_are_send_sync() {
        assert_send::<PortfolioMetrics>();
        assert_sync::<PortfolioMetrics>();
        assert_send::<GroupStats<String>>();
        assert_sync::<GroupStats<String>>();
        assert_send::<StreakReport>();
        assert_sync::<StreakReport>();
    }

    #[test]
    fn session_is_send_sync() {
        assert_send::<JournalSession<CsvTradeStore, JsonStrategyCatalog>>();
        assert_sync::<JournalSession<CsvTradeStore, JsonStrategyCatalog>>();
        assert_send::<Snapshot>();
        assert_sync::<Snapshot>();
    }

    #[test]
    fn config_and_filter_are_send_sync() {
        assert_send::<JournalConfig>();
        assert_sync::<JournalConfig>();
        assert_send::<FilterSpec>();
        assert_sync::<FilterSpec>();
    }
}
