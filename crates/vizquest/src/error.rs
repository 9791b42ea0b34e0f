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

use crate::answers::{DataKind, VisualizationPurpose};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VizQuestError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Profiling error: {0}")]
    Profile(#[from] ProfileError),
    #[error("Recommendation error: {0}")]
    Recommendation(#[from] RecommendationError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse catalog YAML: {source}")]
    YamlParseError {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Failed to read catalog file '{path}': {source}")]
    CatalogFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Duplicate catalog entry: '{name}'")]
    DuplicateEntry { name: String },
    #[error("Chart '{name}' not found in catalog")]
    ChartNotFound { name: String },
    #[error("Catalog validation failed: {reason}")]
    ValidationFailed { reason: String },
    #[error("Chart catalog is empty")]
    EmptyCatalog,
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Empty dataset provided for profiling")]
    EmptyDataset,
    #[error("Dataset has no header row")]
    MissingHeader,
    #[error("Invalid profiling configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

#[derive(Error, Debug)]
pub enum RecommendationError {
    #[error("No chart recommendation for {data_kind} data with purpose {purpose}")]
    NoRecommendation {
        data_kind: DataKind,
        purpose: VisualizationPurpose,
    },
    #[error("Recommended chart '{name}' has no catalog entry")]
    UncataloguedChart { name: String },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Purpose {purpose} is not eligible for the current answers")]
    PurposeNotEligible { purpose: VisualizationPurpose },
    #[error("No visualization purpose chosen yet")]
    MissingPurpose,
    #[error("No rendering context chosen yet")]
    MissingContext,
    #[error("No variables selected")]
    EmptySelection,
}

pub type Result<T> = std::result::Result<T, VizQuestError>;
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
pub type ProfileResult<T> = std::result::Result<T, ProfileError>;
pub type RecommendationResult<T> = std::result::Result<T, RecommendationError>;
pub type SessionResult<T> = std::result::Result<T, SessionError>;

impl From<anyhow::Error> for VizQuestError {
    fn from(err: anyhow::Error) -> Self {
        VizQuestError::Catalog(CatalogError::ValidationFailed {
            reason: err.to_string(),
        })
    }
}

impl VizQuestError {
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VizQuestError::Recommendation(RecommendationError::NoRecommendation { .. })
                | VizQuestError::Session(_)
        )
    }
    pub fn category(&self) -> &'static str {
        match self {
            VizQuestError::Catalog(_) => "Catalog",
            VizQuestError::Profile(_) => "Profiling",
            VizQuestError::Recommendation(_) => "Recommendation",
            VizQuestError::Session(_) => "Session",
            VizQuestError::Io(_) => "I/O",
            VizQuestError::Serialisation(_) => "Serialisation",
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            VizQuestError::Recommendation(RecommendationError::NoRecommendation { .. }) => {
                "No chart fits this combination of answers. Revisit the questionnaire or pick another purpose.".to_string()
            }
            VizQuestError::Profile(ProfileError::EmptyDataset) => {
                "The dataset appears to be empty. Please provide data with at least one row.".to_string()
            }
            VizQuestError::Catalog(CatalogError::CatalogFileError { .. }) => {
                "Unable to load the chart catalog. Please check the configuration file.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}
impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "INFO",
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
}

pub fn error_severity(error: &VizQuestError) -> ErrorSeverity {
    match error {
        VizQuestError::Recommendation(RecommendationError::NoRecommendation { .. }) => {
            ErrorSeverity::Warning
        }
        VizQuestError::Session(_) => ErrorSeverity::Warning,
        VizQuestError::Catalog(CatalogError::EmptyCatalog) => ErrorSeverity::Critical,
        _ => ErrorSeverity::Error,
    }
}

pub struct ErrorReporter {
    pub show_category: bool,
    pub colored_output: bool,
}
impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            show_category: true,
            colored_output: true,
        }
    }
    pub fn report(&self, error: &VizQuestError) -> String {
        let severity = error_severity(error);
        let mut output = String::new();
        if self.colored_output {
            output.push_str(match severity {
                ErrorSeverity::Info => "\x1b[36m",
                ErrorSeverity::Warning => "\x1b[33m",
                ErrorSeverity::Error => "\x1b[31m",
                ErrorSeverity::Critical => "\x1b[35m",
            });
        }
        output.push_str(&format!("[{}] {}\n", severity.as_str(), error));
        if self.colored_output {
            output.push_str("\x1b[0m");
        }
        if self.show_category {
            output.push_str(&format!("Category: {}\n", error.category()));
        }
        output
    }
}
impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
