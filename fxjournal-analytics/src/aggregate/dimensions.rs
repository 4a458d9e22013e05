//! The six breakdown dimensions and their key derivations.

use std::fmt;

use chrono::{Datelike, Days, FixedOffset, Months, NaiveDate, Timelike, Weekday};
use fxjournal_core::domain::clean_label;
use fxjournal_core::TradeRecord;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{by_total_desc, group_and_summarize, in_fixed_order, GroupStats};

// ─── Calendar period ────────────────────────────────────────────────

/// Calendar granularity for the time-period breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Period {
    /// Accepts full names and the one-letter resample codes (`D`, `W`, `M`, `Q`, `Y`).
    pub fn from_name(name: &str) -> Option<Period> {
        match name.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "d" => Some(Period::Daily),
            "weekly" | "week" | "w" => Some(Period::Weekly),
            "monthly" | "month" | "m" => Some(Period::Monthly),
            "quarterly" | "quarter" | "q" => Some(Period::Quarterly),
            "yearly" | "year" | "annual" | "y" => Some(Period::Yearly),
            _ => None,
        }
    }

    /// First day of the period containing `date`. Weeks start on Monday.
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        let start = match self {
            Period::Daily => Some(date),
            Period::Weekly => date.checked_sub_days(Days::new(u64::from(
                date.weekday().num_days_from_monday(),
            ))),
            Period::Monthly => date.with_day(1),
            Period::Quarterly => {
                NaiveDate::from_ymd_opt(date.year(), (date.month0() / 3) * 3 + 1, 1)
            }
            Period::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        };
        start.unwrap_or(date)
    }

    /// First day of the following period.
    pub fn next_start(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Daily => start.succ_opt(),
            Period::Weekly => start.checked_add_days(Days::new(7)),
            Period::Monthly => start.checked_add_months(Months::new(1)),
            Period::Quarterly => start.checked_add_months(Months::new(3)),
            Period::Yearly => start.checked_add_months(Months::new(12)),
        }
    }

    /// Shortest length of one period in days.
    fn min_days(self) -> i64 {
        match self {
            Period::Daily => 1,
            Period::Weekly => 7,
            Period::Monthly => 28,
            Period::Quarterly => 89,
            Period::Yearly => 365,
        }
    }

    pub fn key(self, date: NaiveDate) -> PeriodKey {
        PeriodKey {
            period: self,
            start: self.start_of(date),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::Yearly => "yearly",
        })
    }
}

/// One calendar period, identified by its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeriodKey {
    pub period: Period,
    pub start: NaiveDate,
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.start;
        match self.period {
            Period::Daily => write!(f, "{}", d.format("%Y-%m-%d")),
            Period::Weekly => write!(f, "{}", d.format("%G-W%V")),
            Period::Monthly => write!(f, "{}", d.format("%Y-%m")),
            Period::Quarterly => write!(f, "{}-Q{}", d.year(), d.month0() / 3 + 1),
            Period::Yearly => write!(f, "{}", d.year()),
        }
    }
}

// ─── Day of week ────────────────────────────────────────────────────

/// Weekday ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayOfWeek(pub Weekday);

impl DayOfWeek {
    pub const ORDER: [DayOfWeek; 7] = [
        DayOfWeek(Weekday::Mon),
        DayOfWeek(Weekday::Tue),
        DayOfWeek(Weekday::Wed),
        DayOfWeek(Weekday::Thu),
        DayOfWeek(Weekday::Fri),
        DayOfWeek(Weekday::Sat),
        DayOfWeek(Weekday::Sun),
    ];

    pub fn name(self) -> &'static str {
        match self.0 {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl PartialOrd for DayOfWeek {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DayOfWeek {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .num_days_from_monday()
            .cmp(&other.0.num_days_from_monday())
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Market session ─────────────────────────────────────────────────

/// Coarse trading-hours bucket by start hour in the reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Session {
    Tokyo,
    London,
    NewYork,
    Other,
}

impl Session {
    /// Tokyo 09–15, New York 00–06 and 22–24, London 16–24, else Other.
    /// New York takes 22:00–23:59 even though London also covers it.
    pub fn from_hour(hour: u32) -> Session {
        match hour {
            9..=14 => Session::Tokyo,
            0..=5 | 22..=23 => Session::NewYork,
            16..=23 => Session::London,
            _ => Session::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Session::Tokyo => "Tokyo",
            Session::London => "London",
            Session::NewYork => "New York",
            Session::Other => "Other",
        }
    }

    /// Label as used in the journal spreadsheet.
    pub fn label_ja(self) -> &'static str {
        match self {
            Session::Tokyo => "東京",
            Session::London => "ロンドン",
            Session::NewYork => "ニューヨーク",
            Session::Other => "その他",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Holding time ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingBucket {
    Under5Min,
    From5To30Min,
    From30To60Min,
    Over1Hour,
    Unknown,
}

impl HoldingBucket {
    pub const ORDER: [HoldingBucket; 5] = [
        HoldingBucket::Under5Min,
        HoldingBucket::From5To30Min,
        HoldingBucket::From30To60Min,
        HoldingBucket::Over1Hour,
        HoldingBucket::Unknown,
    ];

    pub fn from_seconds(seconds: Option<i64>) -> HoldingBucket {
        let Some(secs) = seconds else {
            return HoldingBucket::Unknown;
        };
        let minutes = secs as f64 / 60.0;
        if minutes < 5.0 {
            HoldingBucket::Under5Min
        } else if minutes < 30.0 {
            HoldingBucket::From5To30Min
        } else if minutes < 60.0 {
            HoldingBucket::From30To60Min
        } else {
            HoldingBucket::Over1Hour
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HoldingBucket::Under5Min => "under 5 min",
            HoldingBucket::From5To30Min => "5–30 min",
            HoldingBucket::From30To60Min => "30–60 min",
            HoldingBucket::Over1Hour => "over 1 hour",
            HoldingBucket::Unknown => "unknown",
        }
    }

    pub fn label_ja(self) -> &'static str {
        match self {
            HoldingBucket::Under5Min => "5分未満",
            HoldingBucket::From5To30Min => "5分〜30分",
            HoldingBucket::From30To60Min => "30分〜1時間",
            HoldingBucket::Over1Hour => "1時間以上",
            HoldingBucket::Unknown => "不明",
        }
    }
}

impl fmt::Display for HoldingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Breakdowns ─────────────────────────────────────────────────────

/// Strategies with a non-blank tag, largest total first.
pub fn by_strategy(trades: &[TradeRecord]) -> Vec<GroupStats<String>> {
    by_total_desc(group_and_summarize(trades, |t| {
        t.strategy.as_deref().and_then(clean_label)
    }))
}

/// Currency pairs, largest total first.
pub fn by_currency_pair(trades: &[TradeRecord]) -> Vec<GroupStats<String>> {
    by_total_desc(group_and_summarize(trades, |t| {
        t.currency_pair.as_deref().and_then(clean_label)
    }))
}

/// Most periods `by_time_period` will lay out when filling gaps.
pub const MAX_FILLED_PERIODS: i64 = 10_000;

/// Calendar periods from `date`, in chronological order. Periods between
/// the first and last traded one are present with no trades, unless the
/// span exceeds [`MAX_FILLED_PERIODS`]; then only traded periods are listed.
pub fn by_time_period(trades: &[TradeRecord], period: Period) -> Vec<GroupStats<PeriodKey>> {
    let mut groups = group_and_summarize(trades, |t| t.date.map(|d| period.key(d)));
    let (Some(first), Some(last)) = (
        groups.keys().next().copied(),
        groups.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    let span = (last.start - first.start).num_days() / period.min_days() + 1;
    if span > MAX_FILLED_PERIODS {
        warn!(
            %period,
            first = %first,
            last = %last,
            span,
            "period span too wide to fill gaps; listing traded periods only"
        );
        return groups.into_values().collect();
    }

    let mut out = Vec::with_capacity(groups.len());
    let mut cursor = Some(first.start);
    while let Some(start) = cursor.filter(|s| *s <= last.start) {
        let key = PeriodKey { period, start };
        out.push(groups.remove(&key).unwrap_or_else(|| GroupStats::empty(key)));
        cursor = period.next_start(start);
    }
    out
}

/// Weekday of `start_time` in `offset`, Monday to Sunday; days without
/// trades are left out.
pub fn by_weekday(trades: &[TradeRecord], offset: FixedOffset) -> Vec<GroupStats<DayOfWeek>> {
    let groups = group_and_summarize(trades, |t| {
        t.start_time
            .map(|s| DayOfWeek(s.with_timezone(&offset).weekday()))
    });
    in_fixed_order(groups, &DayOfWeek::ORDER)
}

/// Market session of the `start_time` hour in `offset`, largest total first.
pub fn by_market_session(trades: &[TradeRecord], offset: FixedOffset) -> Vec<GroupStats<Session>> {
    by_total_desc(group_and_summarize(trades, |t| {
        t.start_time
            .map(|s| Session::from_hour(s.with_timezone(&offset).hour()))
    }))
}

/// Holding-time buckets in fixed order. Empty when no trade carries a
/// holding time at all.
pub fn by_holding_time(trades: &[TradeRecord]) -> Vec<GroupStats<HoldingBucket>> {
    if trades.iter().all(|t| t.holding_time_seconds.is_none()) {
        return Vec::new();
    }
    let groups = group_and_summarize(trades, |t| {
        Some(HoldingBucket::from_seconds(t.holding_time_seconds))
    });
    in_fixed_order(groups, &HoldingBucket::ORDER)
}

/// A breakdown dimension chosen at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Strategy,
    CurrencyPair,
    Period(Period),
    Weekday,
    Session,
    HoldingTime,
}

impl Dimension {
    /// Parse a dimension name; `period` is the granularity for `period`.
    pub fn from_name(name: &str, period: Period) -> Option<Dimension> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "strategy" => Some(Dimension::Strategy),
            "pair" | "currency_pair" => Some(Dimension::CurrencyPair),
            "period" | "time" => Some(Dimension::Period(period)),
            "weekday" | "day" | "day_of_week" => Some(Dimension::Weekday),
            "session" | "market_session" => Some(Dimension::Session),
            "holding" | "holding_time" => Some(Dimension::HoldingTime),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Strategy => "strategy",
            Dimension::CurrencyPair => "currency_pair",
            Dimension::Period(_) => "period",
            Dimension::Weekday => "weekday",
            Dimension::Session => "session",
            Dimension::HoldingTime => "holding_time",
        }
    }
}

/// Any breakdown with display-label keys.
pub fn breakdown(
    trades: &[TradeRecord],
    dimension: Dimension,
    offset: FixedOffset,
) -> Vec<GroupStats<String>> {
    fn labelled<K: fmt::Display>(groups: Vec<GroupStats<K>>) -> Vec<GroupStats<String>> {
        groups.iter().map(GroupStats::labelled).collect()
    }
    match dimension {
        Dimension::Strategy => by_strategy(trades),
        Dimension::CurrencyPair => by_currency_pair(trades),
        Dimension::Period(p) => labelled(by_time_period(trades, p)),
        Dimension::Weekday => labelled(by_weekday(trades, offset)),
        Dimension::Session => labelled(by_market_session(trades, offset)),
        Dimension::HoldingTime => labelled(by_holding_time(trades)),
    }
}
