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

pub mod answers;
pub mod catalog;
pub mod eligibility;
pub mod error;
pub mod profiler;
pub mod recommender;
pub mod session;

pub use answers::{
    DataKind, DatasetSize, Dimensionality, GroupCount, ObservationsPerGroup, PurposeSet,
    QuestionnaireAnswers, Relation, RenderingContext, VariableOrdering, VisualizationPurpose,
};
pub use catalog::{ChartCatalog, ChartEntry, ChartKind};
pub use eligibility::{compute_eligible_purposes, EligibilityOutcome};
pub use error::{
    CatalogError, ErrorReporter, ProfileError, RecommendationError, Result, SessionError,
    VizQuestError,
};
pub use profiler::{ColumnProfile, ColumnType, DatasetProfiler, DatasetSummary, ProfilingConfig};
pub use recommender::{recommend_chart, Recommendation, RecommendationRequest};
pub use session::{FollowUpQuestion, QuestionnaireSession, Submission};

use error::{CatalogError as CatErr, RecommendationError as RecErr};

pub struct VizQuestSystem {
    catalog: ChartCatalog,
    profiler: DatasetProfiler,
}
impl VizQuestSystem {
    pub fn new() -> Result<Self> {
        Self::with_config("config/chart_catalog.yml", ProfilingConfig::default())
    }
    pub fn with_config(catalog_path: &str, profiling_config: ProfilingConfig) -> Result<Self> {
        let catalog = ChartCatalog::from_yaml_file(catalog_path).map_err(|e| {
            VizQuestError::Catalog(CatErr::ValidationFailed {
                reason: format!("Failed to load chart catalog: {e}"),
            })
        })?;
        catalog
            .validate()
            .map_err(|reason| VizQuestError::Catalog(CatErr::ValidationFailed { reason }))?;
        Ok(Self {
            catalog,
            profiler: DatasetProfiler::with_config(profiling_config),
        })
    }
    pub fn from_catalog(catalog: ChartCatalog, profiling_config: ProfilingConfig) -> Result<Self> {
        catalog
            .validate()
            .map_err(|reason| VizQuestError::Catalog(CatErr::ValidationFailed { reason }))?;
        Ok(Self {
            catalog,
            profiler: DatasetProfiler::with_config(profiling_config),
        })
    }

    pub fn profile_csv(&self, csv_path: &str) -> Result<Vec<ColumnProfile>> {
        Ok(self.profiler.profile_csv(csv_path)?)
    }
    pub fn get_summary(&self, profiles: &[ColumnProfile]) -> DatasetSummary {
        self.profiler.get_dataset_summary(profiles)
    }
    pub fn eligible_purposes(&self, answers: &QuestionnaireAnswers) -> PurposeSet {
        eligibility::compute_eligible_purposes(answers)
    }

    /// Single request/response against the in-process recommendation
    /// service, joined with catalog metadata for display.
    pub fn recommend(&self, submission: &Submission) -> Result<Recommendation> {
        let kind = recommender::recommend_chart(&submission.to_request())?;
        let entry = self.catalog.get(kind).ok_or_else(|| {
            VizQuestError::Recommendation(RecErr::UncataloguedChart {
                name: kind.to_string(),
            })
        })?;
        Ok(Recommendation {
            kind,
            description: entry.description.clone(),
            tags: entry.tags.clone(),
        })
    }

    pub fn catalog(&self) -> &ChartCatalog {
        &self.catalog
    }
    pub fn available_charts(&self) -> &[ChartEntry] {
        self.catalog.entries()
    }
    pub fn charts_for_purpose(&self, purpose: VisualizationPurpose) -> Vec<&ChartEntry> {
        self.catalog.charts_for_purpose(purpose)
    }
}
