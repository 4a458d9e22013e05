//! MT5 CSV statements.
//!
//! The positions export repeats `Time` and `Price` for the open and close
//! legs; the first occurrence is the open, the second the close. Explicit
//! `Open Time` / `Close Time` style headers win when present.

use chrono::FixedOffset;
use tracing::{debug, warn};

use super::{parse_number, parse_ticket, parse_time, ReportError, ReportTrade};
use crate::data::RawTable;

const TICKET: &[&str] = &["Order", "Ticket", "チケット", "Deal", "Position"];
const SYMBOL: &[&str] = &["Symbol", "シンボル"];
const TYPE: &[&str] = &["Type", "タイプ"];
const VOLUME: &[&str] = &["Volume", "ロット"];
const COMMISSION: &[&str] = &["Commission", "手数料"];
const SWAP: &[&str] = &["Swap", "スワップ"];
const PROFIT: &[&str] = &["Profit", "損益"];

/// Header lookup over one statement table.
struct Columns {
    headers: Vec<String>,
}

impl Columns {
    fn new(headers: &[String]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.trim().to_string()).collect(),
        }
    }

    /// First non-blank cell among the named columns, in name order.
    fn value<'a>(&self, table: &'a RawTable, row: usize, names: &[&str]) -> &'a str {
        names
            .iter()
            .flat_map(|name| self.positions(*name))
            .map(|col| table.cell(row, col).trim())
            .find(|v| !v.is_empty() && *v != "nan")
            .unwrap_or("")
    }

    /// The open or close leg of a repeated column.
    fn leg<'a>(
        &self,
        table: &'a RawTable,
        row: usize,
        explicit: &[&str],
        repeated: &str,
        close: bool,
    ) -> &'a str {
        let named = self.value(table, row, explicit);
        if !named.is_empty() {
            return named;
        }
        let positions: Vec<usize> = self.positions(repeated).collect();
        let col = if close {
            positions.get(1).or(positions.first())
        } else {
            positions.first()
        };
        col.map(|c| table.cell(row, *c).trim()).unwrap_or("")
    }

    fn positions<'s>(&'s self, name: &'s str) -> impl Iterator<Item = usize> + 's {
        self.headers
            .iter()
            .enumerate()
            .filter(move |(_, h)| h.as_str() == name)
            .map(|(i, _)| i)
    }
}

pub fn parse(text: &str, offset: FixedOffset) -> Result<Vec<ReportTrade>, ReportError> {
    let table = RawTable::from_csv_reader(text.as_bytes())?;
    let columns = Columns::new(&table.headers);

    let mut trades = Vec::new();
    let mut skipped = 0usize;
    for row in 0..table.row_count() {
        match parse_row(&table, &columns, row, offset) {
            Some(trade) => trades.push(trade),
            None => {
                skipped += 1;
                debug!(row, "skipped statement row");
            }
        }
    }
    if skipped > 0 {
        warn!(skipped, kept = trades.len(), "CSV statement rows without a usable trade");
    }
    Ok(trades)
}

fn parse_row(
    table: &RawTable,
    columns: &Columns,
    row: usize,
    offset: FixedOffset,
) -> Option<ReportTrade> {
    let ticket = parse_ticket(columns.value(table, row, TICKET))?;
    let symbol = columns.value(table, row, SYMBOL);
    if symbol.is_empty() {
        return None;
    }
    let open_time = parse_time(
        columns.leg(table, row, &["Open Time", "開始時刻"], "Time", false),
        offset,
    )?;
    let close_time = parse_time(
        columns.leg(table, row, &["Close Time", "終了時刻"], "Time", true),
        offset,
    )?;
    let open_price = parse_number(columns.leg(table, row, &["Open Price", "開始価格"], "Price", false));
    let close_price = parse_number(columns.leg(table, row, &["Close Price", "終了価格"], "Price", true));

    Some(ReportTrade::new(
        ticket,
        symbol.to_string(),
        columns.value(table, row, TYPE).to_lowercase(),
        parse_number(columns.value(table, row, VOLUME)),
        (open_time, close_time),
        (open_price, close_price),
        parse_number(columns.value(table, row, COMMISSION)),
        parse_number(columns.value(table, row, SWAP)),
        parse_number(columns.value(table, row, PROFIT)),
    ))
}
