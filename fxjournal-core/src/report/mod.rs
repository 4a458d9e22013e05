//! Broker statement ingestion — MT5 CSV and HTML exports to trade rows.
//!
//! A report is decoded (UTF-8, or UTF-16 with a byte-order mark), parsed into
//! [`ReportTrade`]s with pips and holding time pre-computed, and handed on
//! either as trade records (for syncing into a store) or as a canonical raw
//! table the normalizer consumes like any other source.

pub mod csv_report;
pub mod html_report;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::data::coerce::{self, Coerced};
use crate::data::{canonical_table, RawTable};
use crate::domain::{TradeId, TradeRecord};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot read report {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported report format: {0} (expected .csv, .htm or .html)")]
    UnsupportedFormat(String),

    #[error("report is neither UTF-8 nor BOM-marked UTF-16 text")]
    Encoding,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Statement file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Csv,
    Html,
}

impl ReportFormat {
    /// Pick the layout from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ReportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "htm" | "html" => Ok(ReportFormat::Html),
            _ => Err(ReportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// One closed position extracted from a broker statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTrade {
    pub ticket: TradeId,
    pub symbol: String,
    /// Lower-cased direction (`buy` / `sell`, or the broker's code).
    pub trade_type: String,
    pub volume: f64,
    pub open_time: DateTime<FixedOffset>,
    pub close_time: DateTime<FixedOffset>,
    pub open_price: f64,
    pub close_price: f64,
    pub commission: f64,
    pub swap: f64,
    pub profit: f64,
    pub pips: f64,
    pub holding_time_seconds: i64,
}

impl ReportTrade {
    /// Fill in pips and holding time from the raw statement fields.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        ticket: TradeId,
        symbol: String,
        trade_type: String,
        volume: f64,
        (open_time, close_time): (DateTime<FixedOffset>, DateTime<FixedOffset>),
        (open_price, close_price): (f64, f64),
        commission: f64,
        swap: f64,
        profit: f64,
    ) -> Self {
        let pips = calculate_pips(&symbol, open_price, close_price, &trade_type);
        let holding_time_seconds = (close_time - open_time).num_seconds();
        Self {
            ticket,
            symbol,
            trade_type,
            volume,
            open_time,
            close_time,
            open_price,
            close_price,
            commission,
            swap,
            profit,
            pips,
            holding_time_seconds,
        }
    }

    pub fn net_profit(&self) -> f64 {
        self.profit + self.commission + self.swap
    }

    /// The journal row for this position; the trading date is the open date.
    pub fn to_trade_record(&self, sync_time: Option<DateTime<FixedOffset>>) -> TradeRecord {
        TradeRecord {
            trade_id: Some(self.ticket),
            currency_pair: coerce::currency_pair(&self.symbol),
            trade_type: coerce::trade_type(&self.trade_type),
            lot: Some(self.volume),
            start_time: Some(self.open_time),
            end_time: Some(self.close_time),
            date: Some(self.open_time.date_naive()),
            holding_time_seconds: (self.holding_time_seconds >= 0)
                .then_some(self.holding_time_seconds),
            profit_loss: Some(self.profit),
            pips: Some(self.pips),
            commission: Some(self.commission),
            swap: Some(self.swap),
            net_profit_loss: Some(self.net_profit()),
            sync_time,
            strategy: None,
            review_comment: None,
        }
    }
}

/// Signed pips between open and close. JPY-quoted symbols move in
/// hundredths, everything else in ten-thousandths; a sell profits from a
/// falling price. Rounded to 2 dp; 0 when either price is missing.
pub fn calculate_pips(symbol: &str, open_price: f64, close_price: f64, trade_type: &str) -> f64 {
    if open_price == 0.0 || close_price == 0.0 {
        return 0.0;
    }
    let mut diff = close_price - open_price;
    if trade_type.to_uppercase().contains("SELL") {
        diff = -diff;
    }
    let scale = if symbol.to_uppercase().contains("JPY") {
        100.0
    } else {
        10_000.0
    };
    (diff * scale * 100.0).round() / 100.0
}

/// Report trades as a canonical raw table for the normalizer.
pub fn to_raw_table(trades: &[ReportTrade]) -> RawTable {
    let records: Vec<TradeRecord> = trades.iter().map(|t| t.to_trade_record(None)).collect();
    canonical_table(&records)
}

/// Read and parse a statement file, choosing the layout by extension.
pub fn load_report(path: &Path, offset: FixedOffset) -> Result<Vec<ReportTrade>, ReportError> {
    let format = ReportFormat::from_path(path)?;
    let bytes = fs::read(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let trades = parse_report(&bytes, format, offset)?;
    info!(path = %path.display(), ?format, trades = trades.len(), "parsed broker report");
    Ok(trades)
}

pub fn parse_report(
    bytes: &[u8],
    format: ReportFormat,
    offset: FixedOffset,
) -> Result<Vec<ReportTrade>, ReportError> {
    let text = decode(bytes)?;
    match format {
        ReportFormat::Csv => csv_report::parse(&text, offset),
        ReportFormat::Html => Ok(html_report::parse(&text, offset)),
    }
}

/// Decode statement bytes. A BOM selects UTF-8 or UTF-16 (LE/BE); without
/// one the text must be UTF-8.
pub fn decode(bytes: &[u8]) -> Result<String, ReportError> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).map_err(|_| ReportError::Encoding);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    String::from_utf8(bytes.to_vec()).map_err(|_| ReportError::Encoding)
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, ReportError> {
    if bytes.len() % 2 != 0 {
        return Err(ReportError::Encoding);
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| ReportError::Encoding)
}

/// Statement number: separators ignored, blank or garbage reads as 0.
/// MT5 writes volumes as `"0.10 / 0.10"`; the first figure is used.
pub(crate) fn parse_number(raw: &str) -> f64 {
    let first = raw.split('/').next().unwrap_or("");
    match coerce::number(first) {
        Coerced::Value(v) => v,
        _ => 0.0,
    }
}

/// Ticket number: every non-digit dropped; zero or empty is no ticket.
pub(crate) fn parse_ticket(raw: &str) -> Option<TradeId> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits
        .parse::<i64>()
        .ok()
        .filter(|v| *v != 0)
        .map(TradeId)
}

pub(crate) fn parse_time(raw: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    coerce::timestamp(raw, offset).value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_reference_offset;
    use crate::Normalizer;

    #[test]
    fn pips_for_jpy_and_non_jpy() {
        assert_eq!(calculate_pips("USDJPY", 150.00, 150.25, "buy"), 25.0);
        assert_eq!(calculate_pips("USDJPY", 150.00, 150.25, "sell"), -25.0);
        assert_eq!(calculate_pips("EURUSD", 1.0850, 1.0830, "SELL"), 20.0);
        assert_eq!(calculate_pips("EURUSD", 0.0, 1.0830, "buy"), 0.0);
    }

    #[test]
    fn pips_round_to_two_places() {
        assert_eq!(calculate_pips("GBPUSD", 1.26001, 1.26123, "buy"), 12.2);
    }

    #[test]
    fn decode_variants() {
        assert_eq!(decode(b"abc").unwrap(), "abc");
        assert_eq!(decode(b"\xEF\xBB\xBFabc").unwrap(), "abc");
        assert_eq!(decode(&[0xFF, 0xFE, b'a', 0, b'b', 0]).unwrap(), "ab");
        assert_eq!(decode(&[0xFE, 0xFF, 0, b'a']).unwrap(), "a");
        assert!(matches!(decode(&[0xC3, 0x28]), Err(ReportError::Encoding)));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ReportFormat::from_path(Path::new("r/ReportHistory.HTML")).unwrap(),
            ReportFormat::Html
        );
        assert!(ReportFormat::from_path(Path::new("report.xlsx")).is_err());
    }

    #[test]
    fn ticket_and_number_parsing() {
        assert_eq!(parse_ticket("#12 345"), Some(TradeId(12345)));
        assert_eq!(parse_ticket("abc"), None);
        assert_eq!(parse_number("1 234.50"), 1234.5);
        assert_eq!(parse_number("0.10 / 0.10"), 0.1);
        assert_eq!(parse_number(""), 0.0);
    }

    #[test]
    fn report_trade_becomes_normalizable_row() {
        let jst = default_reference_offset();
        let open = parse_time("2024.03.01 23:10:00", jst).unwrap();
        let close = parse_time("2024.03.02 00:40:00", jst).unwrap();
        let trade = ReportTrade::new(
            TradeId(9001),
            "usdjpy".into(),
            "sell".into(),
            0.1,
            (open, close),
            (150.50, 150.20),
            -20.0,
            -5.0,
            300.0,
        );
        assert_eq!(trade.pips, 30.0);
        assert_eq!(trade.holding_time_seconds, 5400);

        let normalized = Normalizer::new(jst).normalize(&to_raw_table(&[trade]));
        let rec = &normalized.trades[0];
        assert_eq!(rec.currency_pair.as_deref(), Some("USDJPY"));
        assert_eq!(rec.net_profit_loss, Some(275.0));
        assert_eq!(rec.date, Some(open.date_naive()));
        assert!(!normalized.report.has_failures());
    }
}
