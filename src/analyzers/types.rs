//! Serialized shapes of the analysis views.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::analyzers::utility::{mean, percentile, stddev};

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q1: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub q3: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Builds the summary for one column's values. An empty column yields
    /// count 0 with every statistic NaN (serialized as JSON null).
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let m = mean(values);
        ColumnSummary {
            count: values.len(),
            mean: m,
            std: stddev(values, m),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q1: percentile(&sorted, 25.0),
            median: percentile(&sorted, 50.0),
            q3: percentile(&sorted, 75.0),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }
}

/// One entry of a top-five ranking: the food plus the ranked nutrient,
/// serialized with the nutrient's column name as the value key.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFood {
    pub food: String,
    pub nutrient: String,
    pub amount: f64,
}

impl Serialize for RankedFood {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("food", &self.food)?;
        map.serialize_entry(&self.nutrient, &self.amount)?;
        map.end()
    }
}

/// Per-food values for the five key nutrients. Used both for the averaged
/// records and for the above-median listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientProfile {
    pub food: String,
    #[serde(rename = "Caloric Value")]
    pub caloric_value: f64,
    #[serde(rename = "Fat")]
    pub fat: f64,
    #[serde(rename = "Protein")]
    pub protein: f64,
    #[serde(rename = "Carbohydrates")]
    pub carbohydrates: f64,
    #[serde(rename = "Nutrition Density")]
    pub nutrition_density: f64,
}

/// One caloric bucket with the foods and values that landed in it, as
/// parallel lists in row order.
#[derive(Debug, Clone, Serialize)]
pub struct CaloricGroup {
    #[serde(rename = "Caloric_Range")]
    pub range: String,
    pub food: Vec<String>,
    #[serde(rename = "Caloric Value")]
    pub caloric_values: Vec<f64>,
}

/// All six views computed over one cleaned dataset.
#[derive(Debug, Serialize)]
pub struct AnalysisBundle {
    pub summary_stats: BTreeMap<String, ColumnSummary>,
    pub top_foods: BTreeMap<String, Vec<RankedFood>>,
    pub avg_nutrients: Vec<NutrientProfile>,
    pub correlation_matrix: BTreeMap<String, BTreeMap<String, f64>>,
    pub high_nutrient_foods: Vec<NutrientProfile>,
    pub caloric_groups: Vec<CaloricGroup>,
}

/// Nested document persisted alongside the per-food averaged records.
#[derive(Serialize)]
pub struct SummaryDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub summary_stats: &'a BTreeMap<String, ColumnSummary>,
    pub top_foods: &'a BTreeMap<String, Vec<RankedFood>>,
    pub correlation_matrix: &'a BTreeMap<String, BTreeMap<String, f64>>,
    pub high_nutrient_foods: &'a [NutrientProfile],
    pub caloric_groups: &'a [CaloricGroup],
}
