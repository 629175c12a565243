//! Named sample groups
//!
//! A chart compares an ordered list of groups. The position of a group in
//! that list is its x coordinate, so order is significant.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PlotError, Result};

/// A named multiset of numeric samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Display name, unique within a chart
    pub name: String,
    /// Sample values (order irrelevant)
    pub samples: Vec<f64>,
}

impl Group {
    pub fn new(name: impl Into<String>, samples: impl Into<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            samples: samples.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Pair parallel `datasets` and `labels` into groups
pub fn groups_from<S, D>(datasets: &[D], labels: &[S]) -> Result<Vec<Group>>
where
    S: AsRef<str>,
    D: AsRef<[f64]>,
{
    if datasets.len() != labels.len() {
        return Err(PlotError::invalid(format!(
            "{} datasets but {} labels",
            datasets.len(),
            labels.len()
        )));
    }
    Ok(datasets
        .iter()
        .zip(labels)
        .map(|(d, l)| Group::new(l.as_ref(), d.as_ref().to_vec()))
        .collect())
}

/// Check that `groups` can be compared pairwise.
///
/// Requires at least two groups, no empty group, and unique names.
pub fn validate_groups(groups: &[Group]) -> Result<()> {
    if groups.len() < 2 {
        return Err(PlotError::invalid(format!(
            "need at least 2 groups, got {}",
            groups.len()
        )));
    }

    let mut seen = HashSet::with_capacity(groups.len());
    for group in groups {
        if group.is_empty() {
            return Err(PlotError::invalid(format!(
                "group '{}' has no samples",
                group.name
            )));
        }
        if !seen.insert(group.name.as_str()) {
            return Err(PlotError::invalid(format!(
                "duplicate group name '{}'",
                group.name
            )));
        }
    }
    Ok(())
}

/// Largest finite sample across all groups
pub fn data_max(groups: &[Group]) -> Option<f64> {
    sigplot_stats::max_across(groups.iter().map(|g| g.samples.as_slice()))
}
