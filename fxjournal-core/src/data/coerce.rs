//! Cell coercion — string cells to typed values, never failing loudly.
//!
//! Every coercion distinguishes a blank cell from a malformed one so the
//! normalizer can report parse failures while still producing `None`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::domain::{is_blank_token, TradeId};

/// Outcome of coercing one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<T> {
    /// Blank, whitespace, or a `nan`/`none` token.
    Missing,
    Value(T),
    /// Non-blank text that could not be parsed.
    Malformed,
}

impl<T> Coerced<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Coerced::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Coerced::Malformed)
    }
}

/// Naive datetime layouts seen in spreadsheets and broker statements.
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y.%m.%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d.%m.%Y", "%d/%m/%Y"];

/// Parse a decimal number. Thousands separators and inner whitespace are
/// ignored; non-finite results are malformed.
pub fn number(raw: &str) -> Coerced<f64> {
    if is_blank_token(raw) {
        return Coerced::Missing;
    }
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Coerced::Value(v),
        _ => Coerced::Malformed,
    }
}

/// Parse a whole number (also accepts integral decimals such as `"300.0"`).
pub fn integer(raw: &str) -> Coerced<i64> {
    if is_blank_token(raw) {
        return Coerced::Missing;
    }
    match TradeId::parse(raw) {
        Some(TradeId(v)) => Coerced::Value(v),
        None => Coerced::Malformed,
    }
}

/// Parse a timestamp. Text carrying its own offset (RFC 3339) keeps it;
/// naive text is interpreted in `offset`.
pub fn timestamp(raw: &str, offset: FixedOffset) -> Coerced<DateTime<FixedOffset>> {
    if is_blank_token(raw) {
        return Coerced::Missing;
    }
    match parse_timestamp(raw.trim(), offset) {
        Some(ts) => Coerced::Value(ts),
        None => Coerced::Malformed,
    }
}

/// Parse a calendar date. A full timestamp is accepted and truncated to its
/// local date.
pub fn date(raw: &str, offset: FixedOffset) -> Coerced<NaiveDate> {
    if is_blank_token(raw) {
        return Coerced::Missing;
    }
    let trimmed = raw.trim();
    if let Some(d) = parse_date(trimmed) {
        return Coerced::Value(d);
    }
    match parse_timestamp(trimmed, offset) {
        Some(ts) => Coerced::Value(ts.date_naive()),
        None => Coerced::Malformed,
    }
}

/// Clean a label-like cell: drop `#` markers, trim, map blank tokens to `None`.
pub fn marker_stripped(raw: &str) -> Option<String> {
    let stripped: String = raw.chars().filter(|c| *c != '#').collect();
    crate::domain::clean_label(&stripped)
}

/// Currency pair: marker-stripped and upper-cased.
pub fn currency_pair(raw: &str) -> Option<String> {
    marker_stripped(raw).map(|s| s.to_uppercase())
}

/// Trade type: marker-stripped and lower-cased.
pub fn trade_type(raw: &str) -> Option<String> {
    marker_stripped(raw).map(|s| s.to_lowercase())
}

/// Free text (strategy names, review comments): trimmed, blank tokens dropped.
pub fn text(raw: &str) -> Option<String> {
    crate::domain::clean_label(raw)
}

pub(crate) fn parse_timestamp(s: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(ts);
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return offset.from_local_datetime(&naive).single();
        }
    }
    let d = parse_date(s)?;
    let midnight = d.and_hms_opt(0, 0, 0)?;
    offset.from_local_datetime(&midnight).single()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_reference_offset;
    use chrono::Timelike;

    #[test]
    fn numbers() {
        assert_eq!(number("1,234.5"), Coerced::Value(1234.5));
        assert_eq!(number(" -30 "), Coerced::Value(-30.0));
        assert_eq!(number(""), Coerced::Missing);
        assert_eq!(number("nan"), Coerced::Missing);
        assert_eq!(number("abc"), Coerced::Malformed);
        assert_eq!(number("inf"), Coerced::Malformed);
    }

    #[test]
    fn integers() {
        assert_eq!(integer("300"), Coerced::Value(300));
        assert_eq!(integer("300.0"), Coerced::Value(300));
        assert_eq!(integer("300.5"), Coerced::Malformed);
        assert_eq!(integer(" "), Coerced::Missing);
    }

    #[test]
    fn naive_timestamp_uses_reference_offset() {
        let jst = default_reference_offset();
        let ts = timestamp("2024.03.01 23:15:00", jst).value().unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(ts.hour(), 23);
    }

    #[test]
    fn rfc3339_keeps_its_offset() {
        let jst = default_reference_offset();
        let ts = timestamp("2024-03-01T10:00:00+00:00", jst).value().unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 0);
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn malformed_timestamp() {
        let jst = default_reference_offset();
        assert!(timestamp("yesterday", jst).is_malformed());
        assert_eq!(timestamp("None", jst), Coerced::Missing);
    }

    #[test]
    fn dates_accept_timestamps() {
        let jst = default_reference_offset();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(date("2024-03-01", jst), Coerced::Value(expected));
        assert_eq!(date("2024/03/01", jst), Coerced::Value(expected));
        assert_eq!(date("2024-03-01 08:00:00", jst), Coerced::Value(expected));
        assert!(date("03-2024", jst).is_malformed());
    }

    #[test]
    fn labels() {
        assert_eq!(currency_pair(" usdjpy# "), Some("USDJPY".to_string()));
        assert_eq!(currency_pair("#"), None);
        assert_eq!(trade_type("#BUY"), Some("buy".to_string()));
        assert_eq!(text("None"), None);
        assert_eq!(text("  trend pullback "), Some("trend pullback".to_string()));
    }
}
