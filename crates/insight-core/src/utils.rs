//! Shared numeric and counting helpers.
//!
//! Used by the imputers, the statistics summarizer and the chart
//! configurator so every component agrees on the same definitions.

use std::collections::HashMap;

// =============================================================================
// Numeric Helpers
// =============================================================================

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median that picks the lower-middle element for even counts.
///
/// `[1, 2, 3, 4]` gives `2`, never `2.5`.
pub fn lower_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(sorted[(sorted.len() - 1) / 2])
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Render with two decimals, the format used in statistics tables and step logs.
pub fn format_fixed2(value: f64) -> String {
    format!("{:.2}", value)
}

// =============================================================================
// Frequency Counting
// =============================================================================

/// Counts of string labels that remember first-encountered order.
///
/// Iteration and tie-breaking both follow insertion order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: impl Into<String>) {
        let label = label.into();
        match self.index.get(&label) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(label.clone(), self.entries.len());
                self.entries.push((label, 1));
            }
        }
    }

    /// Most frequent label; the earliest-inserted label wins a tie.
    pub fn mode(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.entries {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(label, _)| label.as_str())
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, usize)> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for label in iter {
            table.add(label);
        }
        table
    }
}
