//! Keyed table storage of records.

use crate::error::{Result, StoreError};
use crate::types::record::Record;
use std::collections::HashMap;

/// In-memory database: one ordered table of records per model name.
///
/// Tables keep insertion order, which decides "first match" lookups.
#[derive(Debug, Clone, Default)]
pub struct Database {
    tables: HashMap<String, Vec<Record>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty table for `name`. Existing tables keep their records.
    pub fn create_table(&mut self, name: &str) {
        if !self.tables.contains_key(name) {
            tracing::debug!(table = name, "creating table");
            self.tables.insert(name.to_owned(), Vec::new());
        }
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Append `record` to the table of its owning model.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        let table = self
            .tables
            .get_mut(record.model())
            .ok_or_else(|| StoreError::UnknownTable(record.model().to_owned()))?;
        tracing::debug!(table = record.model(), id = record.id(), "inserting record");
        table.push(record);
        Ok(())
    }

    /// Records of `model` accepted by `predicate`, in insertion order.
    ///
    /// Without a predicate the whole table is returned.
    pub fn select(
        &self,
        model: &str,
        predicate: Option<&dyn Fn(&Record) -> bool>,
    ) -> Result<Vec<&Record>> {
        let table = self
            .tables
            .get(model)
            .ok_or_else(|| StoreError::UnknownTable(model.to_owned()))?;
        Ok(match predicate {
            Some(predicate) => table.iter().filter(|r| predicate(r)).collect(),
            None => table.iter().collect(),
        })
    }

    /// Record `id` of `model`, if present.
    pub fn get(&self, model: &str, id: u64) -> Option<&Record> {
        self.tables.get(model)?.iter().find(|r| r.id() == id)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::Attributes;
    use crate::types::value::Value;
    use rstest::rstest;

    fn record(model: &str, id: u64, name: &str) -> Record {
        let mut attributes = Attributes::new();
        attributes.insert("name".into(), Value::from(name));
        Record::new(model, id, attributes)
    }

    #[rstest]
    fn test_insert_into_unknown_table() {
        let mut db = Database::new();
        let err = db.insert(record("author", 1, "A")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownTable(t) if t == "author"));
    }

    #[rstest]
    fn test_select_unknown_table() {
        let db = Database::new();
        assert!(matches!(
            db.select("author", None),
            Err(StoreError::UnknownTable(_))
        ));
    }

    #[rstest]
    fn test_select_empty_table() {
        let mut db = Database::new();
        db.create_table("author");
        assert!(db.select("author", None).unwrap().is_empty());
    }

    #[rstest]
    fn test_select_preserves_insertion_order() {
        let mut db = Database::new();
        db.create_table("author");
        for (id, name) in [(1, "C"), (2, "A"), (3, "B")] {
            db.insert(record("author", id, name)).unwrap();
        }

        let all: Vec<u64> = db
            .select("author", None)
            .unwrap()
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(all, vec![1, 2, 3]);

        let not_a = |r: &Record| r.get("name") != Some(Value::from("A"));
        let filtered: Vec<u64> = db
            .select("author", Some(&not_a))
            .unwrap()
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(filtered, vec![1, 3]);
    }

    #[rstest]
    fn test_create_table_keeps_existing_records() {
        let mut db = Database::new();
        db.create_table("author");
        db.insert(record("author", 1, "A")).unwrap();
        db.create_table("author");
        assert_eq!(db.select("author", None).unwrap().len(), 1);
    }

    #[rstest]
    #[case(1, Some("A"))]
    #[case(2, Some("B"))]
    #[case(3, None)]
    fn test_get_by_id(#[case] id: u64, #[case] expected: Option<&str>) {
        let mut db = Database::new();
        db.create_table("author");
        db.insert(record("author", 1, "A")).unwrap();
        db.insert(record("author", 2, "B")).unwrap();
        let name = db
            .get("author", id)
            .and_then(|r| r.get("name"))
            .and_then(|v| v.as_str().map(str::to_owned));
        assert_eq!(name.as_deref(), expected);
    }
}
