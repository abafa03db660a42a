//! Persistence of the analysis views and the cleaned dataset.
//!
//! Writes two JSON documents (per-food averaged records, nested summary)
//! and the full cleaned table as a flat CSV.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::analyzers::types::{AnalysisBundle, SummaryDocument};
use crate::table::Table;
use std::fs;
use std::path::Path;

/// File name of the per-food averaged records document.
pub const FOOD_DATA_FILE: &str = "food_data.json";

/// File name of the nested summary document.
pub const SUMMARY_FILE: &str = "summary_analyses.json";

/// Writes the averaged records and the nested summary document under
/// `output_dir`, creating the directory if it does not exist.
///
/// Writes are not transactional; a failure can leave earlier files behind.
pub fn save_analyses(output_dir: &Path, bundle: &AnalysisBundle) -> Result<()> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            output_dir.display()
        )
    })?;

    let food_data_path = output_dir.join(FOOD_DATA_FILE);
    let records = serde_json::to_string_pretty(&bundle.avg_nutrients)?;
    fs::write(&food_data_path, records)
        .with_context(|| format!("failed to write {}", food_data_path.display()))?;
    debug!(path = %food_data_path.display(), "Averaged nutrient records written");

    let document = SummaryDocument {
        generated_at: Utc::now(),
        summary_stats: &bundle.summary_stats,
        top_foods: &bundle.top_foods,
        correlation_matrix: &bundle.correlation_matrix,
        high_nutrient_foods: &bundle.high_nutrient_foods,
        caloric_groups: &bundle.caloric_groups,
    };
    let summary_path = output_dir.join(SUMMARY_FILE);
    fs::write(&summary_path, serde_json::to_string_pretty(&document)?)
        .with_context(|| format!("failed to write {}", summary_path.display()))?;
    info!(dir = %output_dir.display(), "Analysis documents written");

    Ok(())
}

/// Writes the full cleaned table as a flat CSV file.
pub fn write_cleaned_csv(path: &Path, table: &Table) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = table.row_count(), "Cleaned dataset written");
    Ok(())
}
