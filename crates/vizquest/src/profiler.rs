// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::answers::DatasetSize;
use crate::error::{ProfileError, ProfileResult};
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ColumnType {
    Numeric,
    Categorical,
    Temporal,
}
impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnType::Categorical)
    }
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Temporal)
    }
}

#[derive(Debug, Clone)]
pub struct ProfilingConfig {
    pub max_sample_values: usize,
    /// Fraction of non-null values that must look numeric before a column
    /// is typed numeric. 1.0 reproduces the strict every-value rule.
    pub numeric_confidence_threshold: f64,
    pub temporal_confidence_threshold: f64,
    pub max_categorical_cardinality: usize,
    pub temporal_formats: Vec<String>,
}
impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            max_sample_values: 20,
            numeric_confidence_threshold: 1.0,
            temporal_confidence_threshold: 0.8,
            max_categorical_cardinality: 50,
            temporal_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%m/%d/%Y".to_string(),
                "%d/%m/%Y".to_string(),
            ],
        }
    }
}
impl ProfilingConfig {
    pub fn for_lenient_typing() -> Self {
        Self {
            numeric_confidence_threshold: 0.9,
            temporal_confidence_threshold: 0.7,
            ..Default::default()
        }
    }
    pub fn for_large_datasets() -> Self {
        Self {
            max_sample_values: 10,
            temporal_formats: vec!["%Y-%m-%d".to_string(), "%Y-%m-%d %H:%M:%S".to_string()],
            ..Default::default()
        }
    }
    pub fn validate(&self) -> ProfileResult<()> {
        if !(0.0..=1.0).contains(&self.numeric_confidence_threshold) {
            return Err(ProfileError::InvalidConfig {
                field: "numeric_confidence_threshold".to_string(),
                value: self.numeric_confidence_threshold.to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.temporal_confidence_threshold) {
            return Err(ProfileError::InvalidConfig {
                field: "temporal_confidence_threshold".to_string(),
                value: self.temporal_confidence_threshold.to_string(),
            });
        }
        if self.max_sample_values == 0 {
            return Err(ProfileError::InvalidConfig {
                field: "max_sample_values".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    pub type_confidence: f64,
    pub total_count: usize,
    pub null_count: usize,
    pub null_percentage: f64,
    pub cardinality: Option<usize>,
    pub sample_values: Vec<String>,
    pub issues: Vec<String>,
}
impl ColumnProfile {
    /// Temporal columns behave as ordered numeric axes when deriving the
    /// questionnaire's data kind.
    pub fn counts_as_numeric(&self) -> bool {
        self.column_type.is_numeric() || self.column_type.is_temporal()
    }
}
impl std::fmt::Display for ColumnProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:?}, confidence: {:.2})",
            self.name, self.column_type, self.type_confidence
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub record_count: usize,
    pub total_columns: usize,
    pub numeric_count: usize,
    pub categorical_count: usize,
    pub temporal_count: usize,
    pub size: DatasetSize,
    pub total_issues: usize,
}
impl DatasetSummary {
    pub fn report(&self) -> String {
        let mut report = String::new();
        report.push_str("Dataset Summary\n===============\n");
        report.push_str(&format!("Records: {}\n", self.record_count));
        report.push_str(&format!("Size class: {}\n", self.size));
        report.push_str(&format!("Columns: {}\n", self.total_columns));
        report.push_str(&format!("  - Numeric: {}\n", self.numeric_count));
        report.push_str(&format!("  - Categorical: {}\n", self.categorical_count));
        report.push_str(&format!("  - Temporal: {}\n", self.temporal_count));
        report.push_str(&format!("Issues: {}\n", self.total_issues));
        report
    }
}
impl std::fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dataset: {} records, {} columns, size {}",
            self.record_count, self.total_columns, self.size
        )
    }
}

pub struct DatasetProfiler {
    config: ProfilingConfig,
    numeric_pattern: Regex,
}
impl DatasetProfiler {
    pub fn new() -> Self {
        Self::with_config(ProfilingConfig::default())
    }
    pub fn with_config(config: ProfilingConfig) -> Self {
        let numeric_pattern = Regex::new(r"^-?\d+(\.\d+)?([eE][-+]?\d+)?$")
            .expect("hard-coded numeric pattern must compile");
        Self {
            config,
            numeric_pattern,
        }
    }
    pub fn config(&self) -> &ProfilingConfig {
        &self.config
    }
    pub fn profile_csv<P: AsRef<Path>>(&self, path: P) -> ProfileResult<Vec<ColumnProfile>> {
        let file = File::open(path)?;
        self.profile_reader(csv::Reader::from_reader(file))
    }
    pub fn profile_csv_string(&self, content: &str) -> ProfileResult<Vec<ColumnProfile>> {
        self.profile_reader(csv::Reader::from_reader(content.as_bytes()))
    }
    pub fn profile_reader<R: Read>(
        &self,
        mut reader: csv::Reader<R>,
    ) -> ProfileResult<Vec<ColumnProfile>> {
        self.config.validate()?;
        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        if headers.is_empty() {
            return Err(ProfileError::MissingHeader);
        }
        let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (idx, column) in columns.iter_mut().enumerate() {
                column.push(record.get(idx).unwrap_or_default().to_string());
            }
        }
        let total_rows = columns.first().map_or(0, Vec::len);
        if total_rows == 0 {
            return Err(ProfileError::EmptyDataset);
        }
        tracing::debug!(
            columns = headers.len(),
            rows = total_rows,
            "profiling dataset"
        );
        Ok(headers
            .par_iter()
            .zip(columns.par_iter())
            .map(|(name, values)| self.profile_column(name, values, total_rows))
            .collect())
    }
    fn profile_column(&self, name: &str, values: &[String], total_rows: usize) -> ColumnProfile {
        let non_null: Vec<&str> = values
            .iter()
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .collect();
        let null_count = total_rows - non_null.len();
        let null_percentage = if total_rows > 0 {
            null_count as f64 / total_rows as f64
        } else {
            0.0
        };
        let (column_type, type_confidence) = self.detect_column_type(&non_null);
        let cardinality = match column_type {
            ColumnType::Categorical => Some(non_null.iter().unique().count()),
            _ => None,
        };
        let sample_values: Vec<String> = non_null
            .iter()
            .unique()
            .take(self.config.max_sample_values)
            .map(|v| (*v).to_string())
            .collect();
        let issues =
            self.detect_quality_issues(&column_type, null_percentage, cardinality, total_rows);
        ColumnProfile {
            name: name.to_string(),
            column_type,
            type_confidence,
            total_count: total_rows,
            null_count,
            null_percentage,
            cardinality,
            sample_values,
            issues,
        }
    }
    fn detect_column_type(&self, non_null: &[&str]) -> (ColumnType, f64) {
        if non_null.is_empty() {
            return (ColumnType::Categorical, 0.0);
        }
        let numeric_matches = non_null
            .iter()
            .filter(|v| self.looks_numeric(v))
            .count();
        let numeric_confidence = numeric_matches as f64 / non_null.len() as f64;
        if numeric_confidence >= self.config.numeric_confidence_threshold {
            return (ColumnType::Numeric, numeric_confidence);
        }
        let temporal_confidence = self.best_temporal_confidence(non_null);
        if temporal_confidence >= self.config.temporal_confidence_threshold {
            return (ColumnType::Temporal, temporal_confidence);
        }
        (ColumnType::Categorical, 1.0 - numeric_confidence)
    }
    fn looks_numeric(&self, value: &str) -> bool {
        // Decimal commas and stray spacing are normalised away before the
        // pattern test, matching how uploads are sniffed upstream.
        let normalized: String = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        self.numeric_pattern.is_match(&normalized)
    }
    fn best_temporal_confidence(&self, non_null: &[&str]) -> f64 {
        let total = non_null.len();
        let mut best = 0.0f64;
        for format in &self.config.temporal_formats {
            let parses = non_null
                .iter()
                .filter(|v| parse_temporal(v.trim(), format))
                .count();
            best = best.max(parses as f64 / total as f64);
        }
        best
    }
    fn detect_quality_issues(
        &self,
        column_type: &ColumnType,
        null_percentage: f64,
        cardinality: Option<usize>,
        total_rows: usize,
    ) -> Vec<String> {
        let mut issues = Vec::new();
        if null_percentage >= 1.0 {
            issues.push("Column is entirely empty".to_string());
        } else if null_percentage > 0.3 {
            issues.push(format!(
                "High null percentage: {:.1}%",
                null_percentage * 100.0
            ));
        }
        if let (ColumnType::Categorical, Some(card)) = (column_type, cardinality) {
            if card > self.config.max_categorical_cardinality {
                issues.push(format!("High cardinality: {card} unique values"));
            }
            if card == 1 && total_rows > 1 {
                issues.push("Single unique value (constant column)".to_string());
            }
        }
        issues
    }
    pub fn get_dataset_summary(&self, profiles: &[ColumnProfile]) -> DatasetSummary {
        let record_count = profiles.first().map_or(0, |p| p.total_count);
        let (numeric_count, categorical_count, temporal_count) =
            profiles
                .iter()
                .fold((0, 0, 0), |(num, cat, temp), p| match p.column_type {
                    ColumnType::Numeric => (num + 1, cat, temp),
                    ColumnType::Categorical => (num, cat + 1, temp),
                    ColumnType::Temporal => (num, cat, temp + 1),
                });
        DatasetSummary {
            record_count,
            total_columns: profiles.len(),
            numeric_count,
            categorical_count,
            temporal_count,
            size: DatasetSize::from_record_count(record_count),
            total_issues: profiles.iter().map(|p| p.issues.len()).sum(),
        }
    }
    pub fn export_profiles_json(&self, profiles: &[ColumnProfile]) -> ProfileResult<String> {
        serde_json::to_string_pretty(profiles)
            .map_err(|e| ProfileError::Io(std::io::Error::other(e)))
    }
}
impl Default for DatasetProfiler {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_temporal(value: &str, format: &str) -> bool {
    NaiveDateTime::parse_from_str(value, format).is_ok()
        || NaiveDate::parse_from_str(value, format).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "region,revenue,recorded\n\
        north,\"1 200,5\",2023-01-01\n\
        south,880,2023-01-02\n\
        north,1.5e3,2023-01-03\n\
        west,,2023-01-04\n";

    #[test]
    fn detects_numeric_with_decimal_commas_and_scientific_notation() {
        let profiler = DatasetProfiler::new();
        let profiles = profiler.profile_csv_string(CSV).unwrap();
        let revenue = profiles.iter().find(|p| p.name == "revenue").unwrap();
        assert_eq!(revenue.column_type, ColumnType::Numeric);
        assert_eq!(revenue.null_count, 1);
    }

    #[test]
    fn detects_temporal_and_categorical_columns() {
        let profiler = DatasetProfiler::new();
        let profiles = profiler.profile_csv_string(CSV).unwrap();
        let recorded = profiles.iter().find(|p| p.name == "recorded").unwrap();
        assert_eq!(recorded.column_type, ColumnType::Temporal);
        assert!(recorded.counts_as_numeric());
        let region = profiles.iter().find(|p| p.name == "region").unwrap();
        assert_eq!(region.column_type, ColumnType::Categorical);
        assert_eq!(region.cardinality, Some(3));
    }

    #[test]
    fn summary_counts_types_and_buckets_size() {
        let profiler = DatasetProfiler::new();
        let profiles = profiler.profile_csv_string(CSV).unwrap();
        let summary = profiler.get_dataset_summary(&profiles);
        assert_eq!(summary.record_count, 4);
        assert_eq!(summary.numeric_count, 1);
        assert_eq!(summary.categorical_count, 1);
        assert_eq!(summary.temporal_count, 1);
        assert_eq!(summary.size, DatasetSize::Small);
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let profiler = DatasetProfiler::new();
        let err = profiler.profile_csv_string("a,b\n").unwrap_err();
        assert!(matches!(err, ProfileError::EmptyDataset));
    }

    #[test]
    fn strict_threshold_rejects_mixed_columns() {
        let profiler = DatasetProfiler::new();
        let profiles = profiler
            .profile_csv_string("mixed\n1\n2\nn/a\n")
            .unwrap();
        assert_eq!(profiles[0].column_type, ColumnType::Categorical);
        let lenient = DatasetProfiler::with_config(ProfilingConfig {
            numeric_confidence_threshold: 0.6,
            ..Default::default()
        });
        let profiles = lenient.profile_csv_string("mixed\n1\n2\nn/a\n").unwrap();
        assert_eq!(profiles[0].column_type, ColumnType::Numeric);
    }
}
