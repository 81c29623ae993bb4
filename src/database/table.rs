use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub type Row = HashMap<String, String>;

/// A record type persisted as one sheet of the workbook.
pub trait SheetRecord: Serialize + DeserializeOwned {
    const SHEET: &'static str;
    /// Column order used when the sheet is first created.
    const COLUMNS: &'static [&'static str];
}

/// One sheet held in memory: a header and string cells keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn with_columns(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Appends any of `columns` the header does not have yet, keeping existing order.
    pub fn ensure_columns(&mut self, columns: &[&str]) {
        for column in columns {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.to_string());
            }
        }
    }

    pub fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
        row.get(column).map(String::as_str).unwrap_or_default()
    }

    /// Rows that fail to convert are logged and skipped.
    pub fn records<T: SheetRecord>(&self) -> Vec<T> {
        self.rows
            .iter()
            .filter_map(|row| match row_to_record::<T>(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(sheet = T::SHEET, "Skipping unreadable row: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn find<T: SheetRecord>(&self, pred: impl Fn(&Row) -> bool) -> Option<T> {
        self.rows
            .iter()
            .find(|row| pred(row))
            .and_then(|row| row_to_record::<T>(row).ok())
    }

    /// Replaces the row whose `keys` cells equal the record's, or appends it.
    /// Returns `true` when a row was appended.
    pub fn upsert_by<T: SheetRecord>(&mut self, keys: &[&str], record: &T) -> Result<bool> {
        self.ensure_columns(T::COLUMNS);
        let row = record_to_row(record)?;
        for column in row.keys() {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.clone());
            }
        }

        let matches = |existing: &Row| {
            keys.iter()
                .all(|k| Table::cell(existing, k) == Table::cell(&row, k))
        };
        match self.rows.iter_mut().find(|existing| matches(existing)) {
            Some(existing) => {
                *existing = row;
                Ok(false)
            }
            None => {
                self.rows.push(row);
                Ok(true)
            }
        }
    }

    pub fn push<T: SheetRecord>(&mut self, record: &T) -> Result<()> {
        self.ensure_columns(T::COLUMNS);
        let row = record_to_row(record)?;
        for column in row.keys() {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.clone());
            }
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn remove_where(&mut self, pred: impl Fn(&Row) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !pred(row));
        before - self.rows.len()
    }

    /// Mutates matching rows in place through their typed form.
    pub fn update_where<T: SheetRecord>(
        &mut self,
        pred: impl Fn(&Row) -> bool,
        mut apply: impl FnMut(&mut T),
    ) -> Result<usize> {
        let mut changed = 0;
        for row in self.rows.iter_mut().filter(|row| pred(row)) {
            let mut record = row_to_record::<T>(row)?;
            apply(&mut record);
            *row = record_to_row(&record)?;
            changed += 1;
        }
        Ok(changed)
    }
}

pub fn row_to_record<T: DeserializeOwned>(row: &Row) -> Result<T> {
    let object: Map<String, Value> = row
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    Ok(serde_json::from_value(Value::Object(object))?)
}

pub fn record_to_row<T: Serialize>(record: &T) -> Result<Row> {
    match serde_json::to_value(record)? {
        Value::Object(object) => Ok(object
            .into_iter()
            .map(|(k, v)| (k, value_to_cell(v)))
            .collect()),
        other => Err(Error::Internal(format!(
            "Sheet records must serialize to objects, got {}",
            other
        ))),
    }
}

fn value_to_cell(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct Item {
        #[serde(rename = "Candidate ID")]
        candidate_id: String,
        #[serde(rename = "Item")]
        item: String,
        #[serde(rename = "Received (Yes/No)")]
        received: String,
        #[serde(flatten)]
        extra: BTreeMap<String, String>,
    }

    impl SheetRecord for Item {
        const SHEET: &'static str = "Items";
        const COLUMNS: &'static [&'static str] = &["Candidate ID", "Item", "Received (Yes/No)"];
    }

    fn item(id: &str, name: &str, received: &str) -> Item {
        Item {
            candidate_id: id.into(),
            item: name.into(),
            received: received.into(),
            ..Default::default()
        }
    }

    #[test]
    fn upsert_replaces_by_key_and_appends_otherwise() {
        let mut table = Table::default();
        assert!(table.upsert_by(&["Candidate ID", "Item"], &item("C1", "CV", "No")).unwrap());
        assert!(table.upsert_by(&["Candidate ID", "Item"], &item("C1", "Passport", "No")).unwrap());
        assert!(!table.upsert_by(&["Candidate ID", "Item"], &item("C1", "CV", "Yes")).unwrap());

        let items: Vec<Item> = table.records();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].received, "Yes");
        assert_eq!(table.columns, vec!["Candidate ID", "Item", "Received (Yes/No)"]);
    }

    #[test]
    fn unknown_columns_survive_a_typed_round_trip() {
        let mut table = Table::with_columns(&["Candidate ID", "Item", "Received (Yes/No)", "Legacy"]);
        let mut row = Row::new();
        row.insert("Candidate ID".into(), "C1".into());
        row.insert("Item".into(), "CV".into());
        row.insert("Legacy".into(), "keep me".into());
        table.rows.push(row);

        let changed = table
            .update_where::<Item>(|r| Table::cell(r, "Candidate ID") == "C1", |i| {
                i.received = "Yes".into()
            })
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(Table::cell(&table.rows[0], "Legacy"), "keep me");
        assert_eq!(Table::cell(&table.rows[0], "Received (Yes/No)"), "Yes");
    }

    #[test]
    fn remove_where_counts_removed_rows() {
        let mut table = Table::default();
        table.push(&item("C1", "CV", "No")).unwrap();
        table.push(&item("C2", "CV", "No")).unwrap();
        table.push(&item("C1", "Passport", "No")).unwrap();
        assert_eq!(table.remove_where(|r| Table::cell(r, "Candidate ID") == "C1"), 2);
        assert_eq!(table.len(), 1);
    }
}
