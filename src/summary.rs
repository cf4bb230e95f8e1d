//! Listing statistics for the command line report

use std::collections::HashMap;
use std::fmt;

use crate::ListRecord;

/// Min, max and mean of a numeric column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeStats {
    /// Smallest value
    pub min: i64,
    /// Largest value
    pub max: i64,
    /// Arithmetic mean
    pub mean: f64,
}

impl RangeStats {
    fn from_values(values: impl IntoIterator<Item = i64>) -> Option<Self> {
        let mut count = 0u64;
        let mut sum = 0i128;
        let mut min = i64::MAX;
        let mut max = i64::MIN;
        for value in values {
            count += 1;
            sum += i128::from(value);
            min = min.min(value);
            max = max.max(value);
        }
        (count > 0).then(|| Self {
            min,
            max,
            mean: sum as f64 / count as f64,
        })
    }
}

/// Aggregate view over a batch of listings
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSummary {
    /// Number of listings
    pub total: usize,
    /// Listings per job type, most frequent first
    pub job_types: Vec<(String, usize)>,
    /// Listings per salary description, most frequent first
    pub salary_descriptions: Vec<(String, usize)>,
    /// Lower salary bound over listings that publish one
    pub salary_low: Option<RangeStats>,
    /// Upper salary bound over listings that publish one
    pub salary_high: Option<RangeStats>,
    /// Mean applicant count
    pub mean_applications: Option<f64>,
}

impl ListingSummary {
    /// Summarize a batch of listings
    ///
    /// A salary bound of zero means "not published" and is left out of the
    /// salary ranges.
    pub fn from_records(records: &[ListRecord]) -> Self {
        let mean_applications = (!records.is_empty()).then(|| {
            records.iter().map(|r| r.application_count as f64).sum::<f64>()
                / records.len() as f64
        });

        Self {
            total: records.len(),
            job_types: value_counts(records.iter().map(|r| r.job_type.as_str())),
            salary_descriptions: value_counts(
                records.iter().map(|r| r.salary_description.as_str()),
            ),
            salary_low: RangeStats::from_values(
                records.iter().map(|r| r.salary_low).filter(|v| *v != 0),
            ),
            salary_high: RangeStats::from_values(
                records.iter().map(|r| r.salary_high).filter(|v| *v != 0),
            ),
            mean_applications,
        }
    }
}

fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn write_range(f: &mut fmt::Formatter<'_>, label: &str, stats: Option<RangeStats>) -> fmt::Result {
    match stats {
        Some(s) => writeln!(
            f,
            "  {label:<12} min {:>8}  max {:>8}  mean {:>10.1}",
            s.min, s.max, s.mean
        ),
        None => writeln!(f, "  {label:<12} n/a"),
    }
}

impl fmt::Display for ListingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Listings: {}", self.total)?;
        if self.total == 0 {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "Salary:")?;
        write_range(f, "low", self.salary_low)?;
        write_range(f, "high", self.salary_high)?;
        if let Some(mean) = self.mean_applications {
            writeln!(f, "Mean applications: {mean:.1}")?;
        }

        writeln!(f)?;
        writeln!(f, "By job type:")?;
        for (label, count) in &self.job_types {
            writeln!(f, "  {count:>6}  {}", display_label(label))?;
        }

        writeln!(f)?;
        writeln!(f, "By salary description:")?;
        for (label, count) in &self.salary_descriptions {
            writeln!(f, "  {count:>6}  {}", display_label(label))?;
        }
        Ok(())
    }
}

fn display_label(label: &str) -> &str {
    if label.is_empty() {
        "(none)"
    } else {
        label
    }
}
