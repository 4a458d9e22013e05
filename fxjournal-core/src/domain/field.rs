//! Canonical trade fields and the header labels that map onto them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a field's cells are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Number,
    Timestamp,
    Date,
    Text,
}

/// A canonical trade-record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TradeId,
    CurrencyPair,
    Type,
    Lot,
    StartTime,
    EndTime,
    Date,
    ProfitLoss,
    Pips,
    HoldingTimeSeconds,
    Commission,
    Swap,
    NetProfitLoss,
    SyncTime,
    Strategy,
    ReviewComment,
}

impl Field {
    /// All fields in spreadsheet column order.
    pub const ALL: [Field; 16] = [
        Field::TradeId,
        Field::CurrencyPair,
        Field::Type,
        Field::Lot,
        Field::StartTime,
        Field::EndTime,
        Field::Date,
        Field::ProfitLoss,
        Field::Pips,
        Field::HoldingTimeSeconds,
        Field::Commission,
        Field::Swap,
        Field::NetProfitLoss,
        Field::SyncTime,
        Field::Strategy,
        Field::ReviewComment,
    ];

    /// Canonical snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Field::TradeId => "trade_id",
            Field::CurrencyPair => "currency_pair",
            Field::Type => "type",
            Field::Lot => "lot",
            Field::StartTime => "start_time",
            Field::EndTime => "end_time",
            Field::Date => "date",
            Field::ProfitLoss => "profit_loss",
            Field::Pips => "pips",
            Field::HoldingTimeSeconds => "holding_time_seconds",
            Field::Commission => "commission",
            Field::Swap => "swap",
            Field::NetProfitLoss => "net_profit_loss",
            Field::SyncTime => "sync_time",
            Field::Strategy => "strategy",
            Field::ReviewComment => "review_comment",
        }
    }

    /// Header label used by the journal spreadsheet.
    pub fn sheet_label(self) -> &'static str {
        match self {
            Field::TradeId => "取引番号",
            Field::CurrencyPair => "通貨ペア",
            Field::Type => "タイプ",
            Field::Lot => "ロット",
            Field::StartTime => "開始時刻",
            Field::EndTime => "終了時刻",
            Field::Date => "日付",
            Field::ProfitLoss => "損益",
            Field::Pips => "pips",
            Field::HoldingTimeSeconds => "保有時間(秒)",
            Field::Commission => "手数料",
            Field::Swap => "スワップ",
            Field::NetProfitLoss => "合計損益",
            Field::SyncTime => "同期日時",
            Field::Strategy => "手法",
            Field::ReviewComment => "振り返りコメント",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::ProfitLoss => &["profit_loss_jpy"],
            Field::HoldingTimeSeconds => &["holding_time_sec"],
            Field::NetProfitLoss => &["net_profit_loss_jpy"],
            _ => &[],
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::TradeId | Field::HoldingTimeSeconds => FieldKind::Integer,
            Field::Lot
            | Field::ProfitLoss
            | Field::Pips
            | Field::Commission
            | Field::Swap
            | Field::NetProfitLoss => FieldKind::Number,
            Field::StartTime | Field::EndTime | Field::SyncTime => FieldKind::Timestamp,
            Field::Date => FieldKind::Date,
            Field::CurrencyPair | Field::Type | Field::Strategy | Field::ReviewComment => {
                FieldKind::Text
            }
        }
    }

    /// Recognize a header cell. Matching is on the trimmed text; canonical
    /// names and aliases match case-insensitively.
    pub fn from_header(header: &str) -> Option<Field> {
        let header = header.trim();
        Field::ALL.iter().copied().find(|f| {
            f.sheet_label() == header
                || f.name().eq_ignore_ascii_case(header)
                || f.aliases().iter().any(|a| a.eq_ignore_ascii_case(header))
        })
    }

    /// Parse a canonical name (as used in filter specs and CLI flags).
    pub fn from_name(name: &str) -> Option<Field> {
        let name = name.trim();
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The only two fields the journal ever writes back to a trade store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditableField {
    Strategy,
    ReviewComment,
}

impl EditableField {
    pub fn field(self) -> Field {
        match self {
            EditableField::Strategy => Field::Strategy,
            EditableField::ReviewComment => Field::ReviewComment,
        }
    }

    /// Accepts anything [`Field::from_header`] maps to an editable field.
    pub fn from_name(name: &str) -> Option<EditableField> {
        match Field::from_header(name)? {
            Field::Strategy => Some(EditableField::Strategy),
            Field::ReviewComment => Some(EditableField::ReviewComment),
            _ => None,
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field().name())
    }
}
