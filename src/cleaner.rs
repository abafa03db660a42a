//! Normalization of the merged dataset before analysis.

use anyhow::Result;
use tracing::debug;

use crate::table::{FOOD_COLUMN, KEY_NUTRIENTS, Table, Value};

/// Index columns left behind by the upstream exporter: a pandas-style
/// `Unnamed: 0` artifact or a fully unnamed header.
const INDEX_ARTIFACTS: [&str; 2] = ["Unnamed: 0", ""];

/// Cleans the merged table in place:
///
/// 1. drops any exporter index artifact column,
/// 2. zero-fills missing cells in every numeric column,
/// 3. renders the food column as trimmed text,
/// 4. verifies the expected schema, naming every missing column at once.
pub fn clean(table: &mut Table) -> Result<()> {
    for artifact in INDEX_ARTIFACTS {
        if table.drop_column(artifact) {
            debug!(column = artifact, "Dropped index artifact column");
        }
    }

    let numeric: Vec<usize> = (0..table.columns().len())
        .filter(|&i| table.is_numeric_column(i))
        .collect();

    let mut filled = 0usize;
    for row in table.rows_mut() {
        for &i in &numeric {
            let missing = match row[i] {
                Value::Null => true,
                Value::Number(n) => n.is_nan(),
                Value::Text(_) => false,
            };
            if missing {
                row[i] = Value::Number(0.0);
                filled += 1;
            }
        }
    }
    if filled > 0 {
        debug!(cells = filled, "Zero-filled missing numeric cells");
    }

    if let Some(food) = table.column_index(FOOD_COLUMN) {
        for row in table.rows_mut() {
            let text = match &row[food] {
                Value::Text(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                Value::Null => String::new(),
            };
            row[food] = Value::Text(text);
        }
    }

    let mut required = vec![FOOD_COLUMN];
    required.extend(KEY_NUTRIENTS);
    table.require_columns(&required)?;

    Ok(())
}
