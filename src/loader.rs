//! Input discovery and parsing for the per-category nutrition CSV files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use thiserror::Error;
use tracing::{debug, info};

use crate::table::{Table, Value};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no input files matched pattern '{pattern}'")]
    NoFilesMatched { pattern: String },
}

/// Expands a glob pattern into the list of data files to load.
///
/// Filesystem enumeration order is platform-dependent, so the matches are
/// sorted to keep the merge order stable across runs.
///
/// # Errors
///
/// Returns [`LoadError::NoFilesMatched`] when the pattern matches nothing.
pub fn discover_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob(pattern).context("invalid input file pattern")? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(LoadError::NoFilesMatched {
            pattern: pattern.to_string(),
        }
        .into());
    }

    files.sort();
    Ok(files)
}

/// Parses one delimited file into a [`Table`].
///
/// The header row defines the columns; each cell is typed individually
/// (empty → null, parseable float → number, otherwise text).
pub fn read_table(path: &Path) -> Result<Table> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(headers);

    for record in rdr.records() {
        let record = record?;
        table.push_row(record.iter().map(Value::parse).collect());
    }

    Ok(table)
}

/// Loads every file matching `pattern` and vertically concatenates them
/// under the union of their column schemas, preserving per-file row order.
#[tracing::instrument]
pub fn load_and_merge(pattern: &str) -> Result<Table> {
    let files = discover_files(pattern)?;
    info!(file_count = files.len(), "Input files discovered");

    let mut merged = Table::default();
    for path in &files {
        let table = read_table(path)?;
        debug!(path = %path.display(), rows = table.row_count(), "File parsed");
        merged.append(table);
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("food_data_analyzer_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_discover_files_sorted() {
        let dir = scratch_dir("loader_sorted");
        fs::write(dir.join("b.csv"), "food\nx\n").unwrap();
        fs::write(dir.join("a.csv"), "food\ny\n").unwrap();

        let pattern = format!("{}/*.csv", dir.display());
        let files = discover_files(&pattern).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.csv"));
        assert!(files[1].ends_with("b.csv"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_discover_files_none_matched() {
        let dir = scratch_dir("loader_empty");
        let pattern = format!("{}/*.csv", dir.display());

        let err = discover_files(&pattern).unwrap_err();
        assert!(err.downcast_ref::<LoadError>().is_some());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_table_types_cells() {
        let dir = scratch_dir("loader_types");
        let path = dir.join("data.csv");
        fs::write(&path, "food,Caloric Value,Fat\nApple,95,\n").unwrap();

        let table = read_table(&path).unwrap();

        assert_eq!(table.columns(), &["food", "Caloric Value", "Fat"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows()[0][1], Value::Number(95.0));
        assert!(table.rows()[0][2].is_null());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_and_merge_row_count_is_sum() {
        let dir = scratch_dir("loader_merge");
        fs::write(
            dir.join("group1.csv"),
            "food,Caloric Value\nApple,95\nBanana,105\n",
        )
        .unwrap();
        fs::write(dir.join("group2.csv"), "food,Sugars\nHoney,82\n").unwrap();

        let pattern = format!("{}/*.csv", dir.display());
        let merged = load_and_merge(&pattern).unwrap();

        assert_eq!(merged.row_count(), 3);
        // Union schema across both files
        assert_eq!(merged.columns(), &["food", "Caloric Value", "Sugars"]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
