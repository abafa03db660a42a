//! Computes the six analysis views over a cleaned dataset.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::debug;

use crate::analyzers::caloric::{RANGE_LABELS, bucket_index};
use crate::analyzers::types::{
    AnalysisBundle, CaloricGroup, ColumnSummary, NutrientProfile, RankedFood,
};
use crate::analyzers::utility::{mean, median, pearson};
use crate::table::{FOOD_COLUMN, KEY_NUTRIENTS, Table};

/// Entries kept in each ranked view.
const TOP_N: usize = 5;

/// One key-nutrient column extracted as an aligned series of row values.
type NutrientSeries = (&'static str, Vec<f64>);

/// Produces all six views. Each is independently computable; an empty
/// table yields empty views rather than an error.
#[tracing::instrument(skip(table), fields(rows = table.row_count()))]
pub fn analyze(table: &Table) -> Result<AnalysisBundle> {
    let foods = table
        .text_column(FOOD_COLUMN)
        .context("food column unavailable for analysis")?;
    let nutrients = nutrient_series(table)?;

    let bundle = AnalysisBundle {
        summary_stats: summary_stats(table),
        top_foods: top_foods(&foods, &nutrients),
        avg_nutrients: avg_nutrients(&foods, &nutrients),
        correlation_matrix: correlation_matrix(&nutrients),
        high_nutrient_foods: high_nutrient_foods(&foods, &nutrients),
        caloric_groups: caloric_groups(&foods, &nutrients),
    };
    debug!(
        distinct_foods = bundle.avg_nutrients.len(),
        high_nutrient = bundle.high_nutrient_foods.len(),
        "Views computed"
    );
    Ok(bundle)
}

/// Extracts the five key-nutrient columns as aligned series, in
/// [`KEY_NUTRIENTS`] order.
fn nutrient_series(table: &Table) -> Result<Vec<NutrientSeries>> {
    KEY_NUTRIENTS
        .iter()
        .map(|&name| {
            let values = table
                .number_column(name)
                .with_context(|| format!("nutrient column '{name}' unavailable for analysis"))?;
            Ok((name, values))
        })
        .collect()
}

/// Descriptive statistics for every numeric column, keyed by name.
fn summary_stats(table: &Table) -> BTreeMap<String, ColumnSummary> {
    table
        .numeric_columns()
        .into_iter()
        .filter_map(|name| {
            let idx = table.column_index(&name)?;
            let values: Vec<f64> = table
                .rows()
                .iter()
                .filter_map(|row| row[idx].as_number())
                .collect();
            Some((name, ColumnSummary::from_values(&values)))
        })
        .collect()
}

/// The top five rows per key nutrient, descending, ties kept in row order.
fn top_foods(foods: &[String], nutrients: &[NutrientSeries]) -> BTreeMap<String, Vec<RankedFood>> {
    let mut out = BTreeMap::new();
    for (name, values) in nutrients {
        let mut order: Vec<usize> = (0..values.len()).collect();
        // Stable sort so equal values keep their original row order
        order.sort_by(|&a, &b| {
            values[b]
                .partial_cmp(&values[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let ranked = order
            .into_iter()
            .take(TOP_N)
            .map(|i| RankedFood {
                food: foods[i].clone(),
                nutrient: (*name).to_string(),
                amount: values[i],
            })
            .collect();
        out.insert((*name).to_string(), ranked);
    }
    out
}

/// Mean of each key nutrient per distinct food, ordered by food name.
fn avg_nutrients(foods: &[String], nutrients: &[NutrientSeries]) -> Vec<NutrientProfile> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, food) in foods.iter().enumerate() {
        groups.entry(food.as_str()).or_default().push(i);
    }

    groups
        .into_iter()
        .map(|(food, rows)| {
            let avg_of = |series: &[f64]| {
                let values: Vec<f64> = rows.iter().map(|&i| series[i]).collect();
                mean(&values)
            };
            NutrientProfile {
                food: food.to_string(),
                caloric_value: avg_of(&nutrients[0].1),
                fat: avg_of(&nutrients[1].1),
                protein: avg_of(&nutrients[2].1),
                carbohydrates: avg_of(&nutrients[3].1),
                nutrition_density: avg_of(&nutrients[4].1),
            }
        })
        .collect()
}

/// Pairwise Pearson coefficients between the key nutrients. Symmetric,
/// diagonal pinned to 1.0; degenerate pairs are NaN.
fn correlation_matrix(nutrients: &[NutrientSeries]) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut matrix = BTreeMap::new();
    for (a, xs) in nutrients {
        let mut row = BTreeMap::new();
        for (b, ys) in nutrients {
            let r = if a == b { 1.0 } else { pearson(xs, ys) };
            row.insert((*b).to_string(), r);
        }
        matrix.insert((*a).to_string(), row);
    }
    matrix
}

/// Rows where every key nutrient strictly exceeds that nutrient's
/// column-wide median. Duplicate foods are preserved.
fn high_nutrient_foods(foods: &[String], nutrients: &[NutrientSeries]) -> Vec<NutrientProfile> {
    let medians: Vec<f64> = nutrients.iter().map(|(_, v)| median(v)).collect();

    (0..foods.len())
        .filter(|&i| {
            nutrients
                .iter()
                .zip(&medians)
                .all(|((_, values), &m)| values[i] > m)
        })
        .map(|i| NutrientProfile {
            food: foods[i].clone(),
            caloric_value: nutrients[0].1[i],
            fat: nutrients[1].1[i],
            protein: nutrients[2].1[i],
            carbohydrates: nutrients[3].1[i],
            nutrition_density: nutrients[4].1[i],
        })
        .collect()
}

/// Buckets every row by caloric value. All five buckets are emitted, in
/// range order, with parallel food/value lists in row order.
fn caloric_groups(foods: &[String], nutrients: &[NutrientSeries]) -> Vec<CaloricGroup> {
    let caloric = &nutrients[0].1;

    let mut groups: Vec<CaloricGroup> = RANGE_LABELS
        .iter()
        .map(|label| CaloricGroup {
            range: (*label).to_string(),
            food: Vec::new(),
            caloric_values: Vec::new(),
        })
        .collect();

    for (food, &value) in foods.iter().zip(caloric) {
        let group = &mut groups[bucket_index(value)];
        group.food.push(food.clone());
        group.caloric_values.push(value);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn food_table(rows: &[(&str, [f64; 5])]) -> Table {
        let mut columns = vec![FOOD_COLUMN.to_string()];
        columns.extend(KEY_NUTRIENTS.iter().map(|n| (*n).to_string()));
        let mut table = Table::new(columns);
        for (food, values) in rows {
            let mut row = vec![Value::Text((*food).to_string())];
            row.extend(values.iter().map(|&v| Value::Number(v)));
            table.push_row(row);
        }
        table
    }

    fn sample() -> Table {
        food_table(&[
            ("Apple", [95.0, 0.3, 0.5, 25.0, 42.0]),
            ("Banana", [105.0, 0.4, 1.3, 27.0, 48.0]),
            ("Banana", [115.0, 0.5, 1.5, 29.0, 50.0]),
            ("Olive Oil", [884.0, 100.0, 0.0, 0.0, 30.0]),
            ("Chicken Breast", [165.0, 3.6, 31.0, 0.0, 60.0]),
        ])
    }

    #[test]
    fn test_summary_stats_covers_numeric_columns() {
        let bundle = analyze(&sample()).unwrap();

        assert_eq!(bundle.summary_stats.len(), KEY_NUTRIENTS.len());
        assert!(!bundle.summary_stats.contains_key(FOOD_COLUMN));

        let caloric = &bundle.summary_stats["Caloric Value"];
        assert_eq!(caloric.count, 5);
        assert_eq!(caloric.min, 95.0);
        assert_eq!(caloric.max, 884.0);
        assert_eq!(caloric.median, 115.0);
    }

    #[test]
    fn test_top_foods_descending() {
        let bundle = analyze(&sample()).unwrap();

        let ranked = &bundle.top_foods["Caloric Value"];
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].food, "Olive Oil");
        assert_eq!(ranked[0].amount, 884.0);
        for pair in ranked.windows(2) {
            assert!(pair[0].amount >= pair[1].amount);
        }
    }

    #[test]
    fn test_top_foods_ties_keep_row_order() {
        let table = food_table(&[
            ("First", [100.0, 1.0, 1.0, 1.0, 1.0]),
            ("Second", [100.0, 1.0, 1.0, 1.0, 1.0]),
        ]);
        let bundle = analyze(&table).unwrap();

        let ranked = &bundle.top_foods["Caloric Value"];
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].food, "First");
        assert_eq!(ranked[1].food, "Second");
    }

    #[test]
    fn test_avg_nutrients_groups_by_food() {
        let bundle = analyze(&sample()).unwrap();

        let foods: Vec<&str> = bundle
            .avg_nutrients
            .iter()
            .map(|p| p.food.as_str())
            .collect();
        assert_eq!(foods, vec!["Apple", "Banana", "Chicken Breast", "Olive Oil"]);

        let banana = &bundle.avg_nutrients[1];
        assert_eq!(banana.caloric_value, 110.0);
        assert_eq!(banana.carbohydrates, 28.0);
        assert_eq!(banana.nutrition_density, 49.0);
    }

    #[test]
    fn test_correlation_matrix_symmetric_with_unit_diagonal() {
        let bundle = analyze(&sample()).unwrap();
        let matrix = &bundle.correlation_matrix;

        for a in KEY_NUTRIENTS {
            assert_eq!(matrix[a][a], 1.0);
            for b in KEY_NUTRIENTS {
                let forward = matrix[a][b];
                let backward = matrix[b][a];
                assert!((forward - backward).abs() < 1e-12);
                assert!(forward <= 1.0 + 1e-12 && forward >= -1.0 - 1e-12);
            }
        }
    }

    #[test]
    fn test_high_nutrient_requires_all_strictly_above_median() {
        // Nobody in the sample beats every median
        let bundle = analyze(&sample()).unwrap();
        assert!(bundle.high_nutrient_foods.is_empty());

        // A dominating row qualifies
        let table = food_table(&[
            ("Weak", [1.0, 1.0, 1.0, 1.0, 1.0]),
            ("Mid", [2.0, 2.0, 2.0, 2.0, 2.0]),
            ("Strong", [3.0, 3.0, 3.0, 3.0, 3.0]),
        ]);
        let bundle = analyze(&table).unwrap();
        assert_eq!(bundle.high_nutrient_foods.len(), 1);
        assert_eq!(bundle.high_nutrient_foods[0].food, "Strong");
    }

    #[test]
    fn test_caloric_groups_partition_rows() {
        let bundle = analyze(&sample()).unwrap();
        let groups = &bundle.caloric_groups;

        let labels: Vec<&str> = groups.iter().map(|g| g.range.as_str()).collect();
        assert_eq!(labels, RANGE_LABELS.to_vec());

        let total: usize = groups.iter().map(|g| g.food.len()).sum();
        assert_eq!(total, 5);

        assert_eq!(groups[0].food, vec!["Apple"]);
        assert_eq!(groups[1].food, vec!["Banana", "Banana", "Chicken Breast"]);
        assert!(groups[2].food.is_empty());
        assert!(groups[3].food.is_empty());
        assert_eq!(groups[4].food, vec!["Olive Oil"]);
        assert_eq!(groups[4].caloric_values, vec![884.0]);
    }

    #[test]
    fn test_analyze_empty_table_yields_empty_views() {
        let table = food_table(&[]);
        let bundle = analyze(&table).unwrap();

        assert!(bundle.avg_nutrients.is_empty());
        assert!(bundle.high_nutrient_foods.is_empty());
        assert!(bundle.top_foods["Fat"].is_empty());
        assert!(bundle.caloric_groups.iter().all(|g| g.food.is_empty()));
        assert_eq!(bundle.correlation_matrix["Fat"]["Fat"], 1.0);
        assert!(bundle.correlation_matrix["Fat"]["Protein"].is_nan());
    }

    #[test]
    fn test_analyze_missing_nutrient_column_fails() {
        let mut columns = vec![FOOD_COLUMN.to_string()];
        columns.extend(["Caloric Value", "Fat"].iter().map(|n| (*n).to_string()));
        let table = Table::new(columns);

        let err = analyze(&table).unwrap_err();
        assert!(err.to_string().contains("Protein"));
    }
}
