//! In-memory tabular data model
//!
//! A [`Dataset`] maps column names to same-length value sequences. Rows are
//! aligned by index; insertion order is preserved and is the deterministic
//! variable order for whole-dataset analyses.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// A single named column: numeric observations or raw text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            Column::Text(v) => Some(v),
            Column::Numeric(_) => None,
        }
    }
}

/// Ordered collection of equally sized named columns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric column. Fails if the name is taken or the length does
    /// not match existing columns.
    pub fn insert_numeric(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        self.insert(name.into(), Column::Numeric(values))
    }

    /// Add a text column under the same alignment rules.
    pub fn insert_text(&mut self, name: impl Into<String>, values: Vec<String>) -> Result<()> {
        self.insert(name.into(), Column::Text(values))
    }

    fn insert(&mut self, name: String, column: Column) -> Result<()> {
        if self.names.iter().any(|n| *n == name) {
            return Err(AnalyticsError::invalid(format!(
                "duplicate column name: {name}"
            )));
        }
        if let Some(existing) = self.columns.first() {
            if existing.len() != column.len() {
                return Err(AnalyticsError::DimensionMismatch {
                    expected: existing.len(),
                    actual: column.len(),
                });
            }
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Number of rows (0 for a dataset with no columns).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Column names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Numeric values of a column, if it exists and is numeric.
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(Column::as_numeric)
    }

    /// All numeric columns in insertion order.
    pub fn numeric_columns(&self) -> Vec<(&str, &[f64])> {
        self.names
            .iter()
            .zip(&self.columns)
            .filter_map(|(name, col)| col.as_numeric().map(|v| (name.as_str(), v)))
            .collect()
    }

    /// Resolve a set of requested numeric variables, failing with the full
    /// list of unknown or non-numeric names so callers can report all of
    /// them at once.
    pub fn resolve_numeric<'a>(&'a self, variables: &[&str]) -> Result<Vec<(&'a str, &'a [f64])>> {
        let mut missing = Vec::new();
        let mut resolved = Vec::with_capacity(variables.len());
        for &var in variables {
            match self.names.iter().position(|n| n == var) {
                Some(idx) => match self.columns[idx].as_numeric() {
                    Some(values) => resolved.push((self.names[idx].as_str(), values)),
                    None => missing.push(var.to_string()),
                },
                None => missing.push(var.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(AnalyticsError::UnknownVariables { names: missing });
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut data = Dataset::new();
        data.insert_numeric("points", vec![10.0, 20.0, 30.0]).unwrap();
        data.insert_text(
            "note",
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap();

        assert_eq!(data.row_count(), 3);
        assert_eq!(data.column_count(), 2);
        assert_eq!(data.numeric("points"), Some(&[10.0, 20.0, 30.0][..]));
        assert!(data.numeric("note").is_none());
        assert!(data.contains("note"));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut data = Dataset::new();
        data.insert_numeric("a", vec![1.0, 2.0]).unwrap();
        let err = data.insert_numeric("b", vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut data = Dataset::new();
        data.insert_numeric("a", vec![1.0]).unwrap();
        assert!(data.insert_numeric("a", vec![2.0]).is_err());
    }

    #[test]
    fn test_resolve_numeric_reports_all_missing() {
        let mut data = Dataset::new();
        data.insert_numeric("a", vec![1.0]).unwrap();
        data.insert_text("t", vec!["x".into()]).unwrap();

        let err = data.resolve_numeric(&["a", "b", "t"]).unwrap_err();
        match err {
            AnalyticsError::UnknownVariables { names } => {
                assert_eq!(names, vec!["b".to_string(), "t".to_string()]);
            }
            other => panic!("expected UnknownVariables, got {other:?}"),
        }
    }

    #[test]
    fn test_numeric_columns_preserve_insertion_order() {
        let mut data = Dataset::new();
        data.insert_numeric("z", vec![1.0]).unwrap();
        data.insert_numeric("a", vec![2.0]).unwrap();
        let names: Vec<&str> = data.numeric_columns().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["z", "a"]);
    }
}
