//! Header cleaning and column-to-field mapping.

use std::collections::{BTreeMap, HashMap};

use crate::domain::Field;

/// Cleans a raw header row: blank headers drop their whole column, and
/// repeated names get a numeric suffix (`損益`, `損益_1`, `損益_2`, ...).
pub struct HeaderCleaner;

impl HeaderCleaner {
    /// Returns `(source column index, cleaned name)` for every kept column.
    pub fn clean(headers: &[String]) -> Vec<(usize, String)> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut kept = Vec::new();

        for (idx, header) in headers.iter().enumerate() {
            let name = header.trim();
            if name.is_empty() {
                continue;
            }
            let cleaned = match seen.get_mut(name) {
                Some(count) => {
                    *count += 1;
                    format!("{name}_{count}")
                }
                None => {
                    seen.insert(name.to_string(), 0);
                    name.to_string()
                }
            };
            kept.push((idx, cleaned));
        }
        kept
    }
}

/// Which source column feeds each canonical field.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: BTreeMap<Field, usize>,
    /// Cleaned header names that did not map to any field.
    pub unmapped: Vec<String>,
}

impl ColumnMap {
    /// Map cleaned headers to fields. The first column recognized for a
    /// field wins; later duplicates are treated as unmapped.
    pub fn build(cleaned: &[(usize, String)]) -> Self {
        let mut map = ColumnMap::default();
        for (idx, name) in cleaned {
            match Field::from_header(name) {
                Some(field) if !map.columns.contains_key(&field) => {
                    map.columns.insert(field, *idx);
                }
                _ => map.unmapped.push(name.clone()),
            }
        }
        map
    }

    /// Source column for a field, if the input had one.
    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Fields absent from the input (filled with empty values downstream).
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| !self.columns.contains_key(f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn drops_blank_headers_and_keeps_indices() {
        let cleaned = HeaderCleaner::clean(&headers(&["取引番号", "", "  ", "通貨ペア"]));
        assert_eq!(
            cleaned,
            vec![(0, "取引番号".to_string()), (3, "通貨ペア".to_string())]
        );
    }

    #[test]
    fn suffixes_duplicates() {
        let cleaned = HeaderCleaner::clean(&headers(&["memo", "memo", "x", "memo"]));
        let names: Vec<&str> = cleaned.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(names, vec!["memo", "memo_1", "x", "memo_2"]);
    }

    #[test]
    fn first_recognized_column_wins() {
        let cleaned = HeaderCleaner::clean(&headers(&["損益", "profit_loss", "memo"]));
        let map = ColumnMap::build(&cleaned);
        assert_eq!(map.column(Field::ProfitLoss), Some(0));
        assert_eq!(map.unmapped, vec!["profit_loss".to_string(), "memo".to_string()]);
    }

    #[test]
    fn reports_missing_fields() {
        let cleaned = HeaderCleaner::clean(&headers(&["trade_id"]));
        let map = ColumnMap::build(&cleaned);
        let missing = map.missing_fields();
        assert_eq!(missing.len(), Field::ALL.len() - 1);
        assert!(!missing.contains(&Field::TradeId));
    }
}
