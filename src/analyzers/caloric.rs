/// Caloric range labels, in ascending bucket order.
pub const RANGE_LABELS: [&str; 5] = [
    "Low (<100)",
    "Moderate (100-200)",
    "High (200-300)",
    "Very High (300-500)",
    "Extreme (>500)",
];

/// Maps a caloric value to its bucket index in [`RANGE_LABELS`].
///
/// Ranges are lower-inclusive, upper-exclusive:
///
/// | Range        | Label               |
/// |--------------|---------------------|
/// | < 100        | Low (<100)          |
/// | [100, 200)   | Moderate (100-200)  |
/// | [200, 300)   | High (200-300)      |
/// | [300, 500)   | Very High (300-500) |
/// | >= 500       | Extreme (>500)      |
pub fn bucket_index(value: f64) -> usize {
    match value {
        v if v < 100.0 => 0,
        v if v < 200.0 => 1,
        v if v < 300.0 => 2,
        v if v < 500.0 => 3,
        _ => 4,
    }
}

/// Label of the bucket `value` falls in.
pub fn range_label(value: f64) -> &'static str {
    RANGE_LABELS[bucket_index(value)]
}
