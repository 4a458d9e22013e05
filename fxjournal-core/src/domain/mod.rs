//! Domain types for the journal

pub mod field;
pub mod ids;
pub mod strategy;
pub mod trade;

pub use field::{EditableField, Field, FieldKind};
pub use ids::TradeId;
pub use strategy::StrategyEntry;
pub use trade::TradeRecord;

use chrono::{FixedOffset, Offset, Utc};

/// Hours east of UTC used when a timestamp carries no offset of its own.
///
/// Broker statements and the journal spreadsheet are written in Japan time.
pub const DEFAULT_REFERENCE_OFFSET_HOURS: i32 = 9;

/// Build a fixed offset from whole hours east of UTC.
///
/// Out-of-range values (|hours| >= 24) fall back to UTC.
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// The default reference timezone (UTC+9).
pub fn default_reference_offset() -> FixedOffset {
    offset_from_hours(DEFAULT_REFERENCE_OFFSET_HOURS)
}

/// True for text that means "no value": empty, whitespace, or the literal
/// tokens `nan` / `none` in any case.
pub fn is_blank_token(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("none")
}

/// Trim a label and map blank tokens to `None`.
pub fn clean_label(raw: &str) -> Option<String> {
    if is_blank_token(raw) {
        None
    } else {
        Some(raw.trim().to_string())
    }
}
