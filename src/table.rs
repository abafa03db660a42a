//! In-memory tabular model for the merged nutrition dataset.
//!
//! Input files do not all share the same columns, so the table carries a
//! dynamic schema: the union of every file's header row, with cells typed
//! per value rather than per column.

use std::fmt;

use thiserror::Error;

/// Column holding the food name. Must survive cleaning as trimmed text.
pub const FOOD_COLUMN: &str = "food";

/// The five nutrient columns used by the ranked and grouped views.
pub const KEY_NUTRIENTS: [&str; 5] = [
    "Caloric Value",
    "Fat",
    "Protein",
    "Carbohydrates",
    "Nutrition Density",
];

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("required column(s) missing from dataset: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error("column '{column}' contains non-numeric values")]
    NonNumeric { column: String },
}

/// A single cell of the table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Types a raw CSV field: empty cells are null, parseable floats are
    /// numbers, everything else is text.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::Null;
        }
        match raw.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(raw.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// An ordered sequence of rows under a shared column schema.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<Value>] {
        &mut self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Appends a row. The caller is responsible for matching the schema
    /// width; the CSV reader enforces this for parsed input.
    pub fn push_row(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    /// Vertically concatenates `other` onto this table, unioning schemas
    /// by column name. Columns new to either side are null-padded.
    pub fn append(&mut self, other: Table) {
        let mut mapping = Vec::with_capacity(other.columns.len());
        for name in &other.columns {
            let idx = match self.column_index(name) {
                Some(idx) => idx,
                None => {
                    self.columns.push(name.clone());
                    for row in &mut self.rows {
                        row.push(Value::Null);
                    }
                    self.columns.len() - 1
                }
            };
            mapping.push(idx);
        }

        for row in other.rows {
            let mut merged = vec![Value::Null; self.columns.len()];
            for (value, &idx) in row.into_iter().zip(&mapping) {
                merged[idx] = value;
            }
            self.rows.push(merged);
        }
    }

    /// A column is numeric when every non-null cell holds a number.
    pub fn is_numeric_column(&self, index: usize) -> bool {
        self.rows
            .iter()
            .all(|row| !matches!(row[index], Value::Text(_)))
    }

    /// Names of all numeric columns, in schema order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .filter(|&(i, _)| self.is_numeric_column(i))
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Extracts a column as numbers. Fails when the column is missing or
    /// holds non-numeric cells.
    pub fn number_column(&self, name: &str) -> Result<Vec<f64>, SchemaError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| SchemaError::MissingColumns {
                missing: vec![name.to_string()],
            })?;
        self.rows
            .iter()
            .map(|row| {
                row[idx].as_number().ok_or_else(|| SchemaError::NonNumeric {
                    column: name.to_string(),
                })
            })
            .collect()
    }

    /// Extracts a column rendered as text, one entry per row.
    pub fn text_column(&self, name: &str) -> Result<Vec<String>, SchemaError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| SchemaError::MissingColumns {
                missing: vec![name.to_string()],
            })?;
        Ok(self.rows.iter().map(|row| row[idx].to_string()).collect())
    }

    /// Removes a column and its cells. Returns whether it was present.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        true
    }

    /// Verifies every listed column is present, reporting all absences at
    /// once.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), SchemaError> {
        let mut missing = Vec::new();
        for &name in required {
            if self.column_index(name).is_none() {
                missing.push(name.to_string());
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingColumns { missing })
        }
    }
}
