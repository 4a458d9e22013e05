//! MT5 HTML statements.
//!
//! Only the closed-positions block is read: rows after a section header
//! (`<th colspan=..>`) containing "Closed Trades" / "ポジション一覧" and before
//! the next "Orders" / "Deals" / "注文" / "約定" header. Data rows carry a
//! `bgcolor` attribute; cells with class `hidden` are ignored. The visible
//! cells are laid out as:
//!
//! | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 | 10 | 11 | 12 |
//! |---|---|---|---|---|---|---|---|---|---|----|----|----|
//! | open time | ticket | symbol | type | volume | open price | S/L | T/P | close time | close price | commission | swap | profit |

use chrono::FixedOffset;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{parse_number, parse_ticket, parse_time, ReportTrade};

const MIN_CELLS: usize = 13;
const SECTION_START: &[&str] = &["Closed Trades", "ポジション一覧"];
const SECTION_END: &[&str] = &["Orders", "Deals", "注文", "約定"];

/// Parse every closed position in the document. Malformed rows are skipped.
pub fn parse(html: &str, offset: FixedOffset) -> Vec<ReportTrade> {
    let mut trades = Vec::new();
    let mut skipped = 0usize;
    for (idx, cells) in closed_position_rows(html).into_iter().enumerate() {
        match parse_row(&cells, offset) {
            Some(trade) => trades.push(trade),
            None => {
                skipped += 1;
                debug!(row = idx, cells = ?cells.iter().take(5).collect::<Vec<_>>(), "skipped statement row");
            }
        }
    }
    if skipped > 0 {
        warn!(skipped, kept = trades.len(), "HTML statement rows without a usable trade");
    }
    trades
}

fn parse_row(cells: &[String], offset: FixedOffset) -> Option<ReportTrade> {
    if cells.len() < MIN_CELLS {
        return None;
    }
    let trade_type = cells[3].to_lowercase();
    if trade_type != "buy" && trade_type != "sell" {
        return None;
    }
    let ticket = parse_ticket(&cells[1])?;
    if cells[2].is_empty() {
        return None;
    }
    let open_time = parse_time(&cells[0], offset)?;
    let close_time = parse_time(&cells[8], offset)?;

    Some(ReportTrade::new(
        ticket,
        cells[2].clone(),
        trade_type,
        parse_number(&cells[4]),
        (open_time, close_time),
        (parse_number(&cells[5]), parse_number(&cells[9])),
        parse_number(&cells[10]),
        parse_number(&cells[11]),
        parse_number(&cells[12]),
    ))
}

// ─── Row extraction ───

/// Visible cell texts of the `bgcolor` rows inside the closed-positions block.
///
/// Section state resets at every table boundary.
fn closed_position_rows(html: &str) -> Vec<Vec<String>> {
    let Ok(tr) = Selector::parse("tr") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let mut rows = Vec::new();
    let mut in_section = false;
    let mut current_table = None;

    for row in document.select(&tr) {
        let table = row
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "table")
            .map(|e| e.id());
        if table != current_table {
            current_table = table;
            in_section = false;
        }

        let mut cells = Vec::new();
        for cell in row.children().filter_map(ElementRef::wrap) {
            let element = cell.value();
            match element.name() {
                "th" if element.attr("colspan").is_some() => {
                    let header = cell_text(cell);
                    if SECTION_START.iter().any(|s| header.contains(s)) {
                        in_section = true;
                    } else if in_section && SECTION_END.iter().any(|s| header.contains(s)) {
                        in_section = false;
                    }
                }
                "td" if !element.classes().any(|c| c == "hidden") => cells.push(cell_text(cell)),
                _ => {}
            }
        }

        let data = row.value().attr("bgcolor").is_some_and(|v| !v.trim().is_empty());
        if in_section && data {
            rows.push(cells);
        }
    }
    rows
}

/// Concatenated, trimmed text of a cell; non-breaking spaces become spaces.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .collect::<String>()
        .replace('\u{a0}', " ")
}
