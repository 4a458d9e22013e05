use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named trading rule set kept in the strategy catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyEntry {
    pub name: String,
    #[serde(default)]
    pub rules: String,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_edited_time: Option<DateTime<Utc>>,
}

impl StrategyEntry {
    pub fn new(name: impl Into<String>, rules: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            rules: rules.into(),
            created_time: Some(now),
            last_edited_time: Some(now),
        }
    }

    /// Replace the rule text and bump the edit timestamp.
    pub fn edit(&mut self, rules: impl Into<String>, now: DateTime<Utc>) {
        self.rules = rules.into();
        self.last_edited_time = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn edit_keeps_created_time() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mut entry = StrategyEntry::new("breakout", "", t0);
        entry.edit("enter on range break", t1);
        assert_eq!(entry.created_time, Some(t0));
        assert_eq!(entry.last_edited_time, Some(t1));
        assert_eq!(entry.rules, "enter on range break");
    }

    #[test]
    fn missing_timestamps_deserialize() {
        let entry: StrategyEntry =
            serde_json::from_str(r#"{"name":"scalp","rules":"1m chart"}"#).unwrap();
        assert_eq!(entry.created_time, None);
        assert_eq!(entry.rules, "1m chart");
    }
}
