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

use crate::answers::{
    DataKind, DatasetSize, Dimensionality, GroupCount, ObservationsPerGroup, PurposeSet,
    QuestionnaireAnswers, Relation, RenderingContext, VariableOrdering, VisualizationPurpose,
};
use crate::eligibility;
use crate::error::{SessionError, SessionResult};
use crate::profiler::ColumnProfile;
use crate::recommender::RecommendationRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maps a set of selected columns to the questionnaire's data kind and
/// dimensionality. Temporal columns count as numeric.
pub fn classify_selection(selection: &[&ColumnProfile]) -> (DataKind, Dimensionality) {
    let dimensionality = Dimensionality::from_count(selection.len());
    let numeric = selection.iter().filter(|p| p.counts_as_numeric()).count();
    let categorical = selection.len() - numeric;
    let data_kind = if selection.is_empty() {
        DataKind::Unknown
    } else if numeric == selection.len() {
        DataKind::Numeric
    } else if categorical == selection.len() {
        DataKind::Categorical
    } else if numeric == 1 && categorical == 1 {
        DataKind::OneNumOneCat
    } else if numeric == 1 && categorical >= 2 {
        DataKind::OneNumManyCat
    } else if numeric >= 2 && categorical >= 1 {
        DataKind::OneCatManyNum
    } else {
        DataKind::Unknown
    };
    (data_kind, dimensionality)
}

/// Follow-up questions the UI should surface for the current answers.
/// The flow is answer-driven only; it never depends on the purpose the
/// user has not picked yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpQuestion {
    VariableOrdering,
    Relation,
    ObservationsPerGroup,
    GroupCount,
}

/// One questionnaire pass over a loaded dataset. Answers are rebuilt as
/// a fresh value on every edit; dependent answers reset when an upstream
/// answer changes.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionnaireSession {
    answers: QuestionnaireAnswers,
    dataset_size: DatasetSize,
    group_count: GroupCount,
    purpose: Option<VisualizationPurpose>,
    context: Option<RenderingContext>,
    selected_columns: Vec<String>,
}
impl QuestionnaireSession {
    pub fn new(dataset_size: DatasetSize, selection: &[&ColumnProfile]) -> SessionResult<Self> {
        if selection.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        let (data_kind, dimensionality) = classify_selection(selection);
        let ordering = if selection.iter().any(|p| p.column_type.is_temporal()) {
            VariableOrdering::Yes
        } else {
            VariableOrdering::NotApplicable
        };
        Ok(Self {
            answers: QuestionnaireAnswers::new(data_kind, dimensionality).with_ordering(ordering),
            dataset_size,
            group_count: GroupCount::NotApplicable,
            purpose: None,
            context: None,
            selected_columns: selection.iter().map(|p| p.name.clone()).collect(),
        })
    }

    pub fn answers(&self) -> QuestionnaireAnswers {
        self.answers
    }
    pub fn dataset_size(&self) -> DatasetSize {
        self.dataset_size
    }
    pub fn group_count(&self) -> GroupCount {
        self.group_count
    }
    pub fn purpose(&self) -> Option<VisualizationPurpose> {
        self.purpose
    }
    pub fn context(&self) -> Option<RenderingContext> {
        self.context
    }
    pub fn selected_columns(&self) -> &[String] {
        &self.selected_columns
    }

    pub fn set_ordering(&mut self, ordering: VariableOrdering) {
        self.answers = self.answers.with_ordering(ordering);
        self.revalidate_purpose();
    }
    pub fn set_relation(&mut self, relation: Relation) {
        self.answers = self.answers.with_relation(relation);
        if relation != Relation::Subgroup && self.answers.data_kind != DataKind::OneCatManyNum {
            self.group_count = GroupCount::NotApplicable;
        }
        self.revalidate_purpose();
    }
    pub fn set_observations(&mut self, observations: ObservationsPerGroup) {
        self.answers = self.answers.with_observations(observations);
        self.revalidate_purpose();
    }
    pub fn set_group_count(&mut self, group_count: GroupCount) {
        self.group_count = group_count;
    }
    pub fn choose_context(&mut self, context: RenderingContext) {
        self.context = Some(context);
    }
    pub fn choose_purpose(&mut self, purpose: VisualizationPurpose) -> SessionResult<()> {
        if !self.eligible_purposes().contains(purpose) {
            return Err(SessionError::PurposeNotEligible { purpose });
        }
        self.purpose = Some(purpose);
        Ok(())
    }

    /// Recomputed on every read so the set always reflects the answers
    /// passed in, nothing cached.
    pub fn eligible_purposes(&self) -> PurposeSet {
        eligibility::compute_eligible_purposes(&self.answers)
    }

    fn revalidate_purpose(&mut self) {
        if let Some(purpose) = self.purpose {
            if !self.eligible_purposes().contains(purpose) {
                self.purpose = None;
            }
        }
    }

    pub fn active_questions(&self) -> Vec<FollowUpQuestion> {
        use crate::session::FollowUpQuestion as Q;
        let mut questions = Vec::new();
        match self.answers.data_kind {
            DataKind::Numeric => {
                if !self.answers.dimensionality.is_single() {
                    questions.push(Q::VariableOrdering);
                }
            }
            DataKind::Categorical => {
                questions.push(Q::Relation);
                if self.answers.relation == Relation::Subgroup {
                    questions.push(Q::GroupCount);
                }
            }
            DataKind::OneNumOneCat => {
                questions.push(Q::ObservationsPerGroup);
                if self.answers.observations == ObservationsPerGroup::One {
                    questions.push(Q::Relation);
                }
            }
            DataKind::OneCatManyNum => {
                questions.push(Q::ObservationsPerGroup);
                match self.answers.observations {
                    ObservationsPerGroup::Several => questions.push(Q::VariableOrdering),
                    ObservationsPerGroup::One => questions.push(Q::GroupCount),
                    ObservationsPerGroup::NotApplicable => {}
                }
            }
            DataKind::OneNumManyCat => {
                questions.push(Q::Relation);
                if self.answers.relation != Relation::Adjacency
                    && self.answers.relation != Relation::NotApplicable
                {
                    questions.push(Q::ObservationsPerGroup);
                }
                if self.answers.relation == Relation::Subgroup
                    && self.answers.observations == ObservationsPerGroup::One
                {
                    questions.push(Q::GroupCount);
                }
            }
            DataKind::Unknown => {}
        }
        questions
    }

    pub fn submission(&self) -> SessionResult<Submission> {
        let purpose = self.purpose.ok_or(SessionError::MissingPurpose)?;
        let context = self.context.ok_or(SessionError::MissingContext)?;
        Ok(Submission {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            answers: self.answers,
            purpose,
            context,
            dataset_size: self.dataset_size,
            group_count: self.group_count,
            selected_columns: self.selected_columns.clone(),
        })
    }
}

/// Finalized questionnaire record, the payload handed to the
/// recommendation service and to exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub answers: QuestionnaireAnswers,
    pub purpose: VisualizationPurpose,
    pub context: RenderingContext,
    pub dataset_size: DatasetSize,
    pub group_count: GroupCount,
    pub selected_columns: Vec<String>,
}
impl Submission {
    pub fn to_request(&self) -> RecommendationRequest {
        RecommendationRequest {
            answers: self.answers,
            purpose: self.purpose,
            context: self.context,
            dataset_size: self.dataset_size,
            group_count: self.group_count,
        }
    }
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::ColumnType;

    fn profile(name: &str, column_type: ColumnType) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            column_type,
            type_confidence: 1.0,
            total_count: 10,
            null_count: 0,
            null_percentage: 0.0,
            cardinality: None,
            sample_values: Vec::new(),
            issues: Vec::new(),
        }
    }

    #[test]
    fn classification_mirrors_variable_counts() {
        let num = profile("a", ColumnType::Numeric);
        let cat = profile("b", ColumnType::Categorical);
        let cat2 = profile("c", ColumnType::Categorical);
        let num2 = profile("d", ColumnType::Numeric);
        assert_eq!(
            classify_selection(&[&num]),
            (DataKind::Numeric, Dimensionality::D1)
        );
        assert_eq!(
            classify_selection(&[&num, &cat]),
            (DataKind::OneNumOneCat, Dimensionality::D2)
        );
        assert_eq!(
            classify_selection(&[&num, &cat, &cat2]),
            (DataKind::OneNumManyCat, Dimensionality::D3)
        );
        assert_eq!(
            classify_selection(&[&num, &num2, &cat]),
            (DataKind::OneCatManyNum, Dimensionality::D3)
        );
        assert_eq!(classify_selection(&[]), (DataKind::Unknown, Dimensionality::Unknown));
    }

    #[test]
    fn temporal_selection_defaults_ordering_to_yes() {
        let time = profile("t", ColumnType::Temporal);
        let num = profile("v", ColumnType::Numeric);
        let session =
            QuestionnaireSession::new(DatasetSize::Small, &[&time, &num]).unwrap();
        assert_eq!(session.answers().data_kind, DataKind::Numeric);
        assert_eq!(session.answers().ordering, VariableOrdering::Yes);
    }

    #[test]
    fn ineligible_purpose_is_rejected_and_cleared_on_answer_change() {
        let num = profile("a", ColumnType::Numeric);
        let mut session = QuestionnaireSession::new(DatasetSize::Small, &[&num]).unwrap();
        // Single numeric variable permits distribution only.
        assert!(session
            .choose_purpose(VisualizationPurpose::Flow)
            .is_err());
        session.choose_purpose(VisualizationPurpose::Distribution).unwrap();
        assert_eq!(session.purpose(), Some(VisualizationPurpose::Distribution));
    }

    #[test]
    fn purpose_reset_when_answers_invalidate_it() {
        let num = profile("a", ColumnType::Numeric);
        let num2 = profile("b", ColumnType::Numeric);
        let mut session =
            QuestionnaireSession::new(DatasetSize::Small, &[&num, &num2]).unwrap();
        session.set_ordering(VariableOrdering::No);
        session.choose_purpose(VisualizationPurpose::Distribution).unwrap();
        // Ordered pairs drop Distribution from the eligible set.
        session.set_ordering(VariableOrdering::Yes);
        assert_eq!(session.purpose(), None);
    }

    #[test]
    fn submission_requires_purpose_and_context() {
        let num = profile("a", ColumnType::Numeric);
        let mut session = QuestionnaireSession::new(DatasetSize::Small, &[&num]).unwrap();
        assert!(matches!(
            session.submission(),
            Err(SessionError::MissingPurpose)
        ));
        session.choose_purpose(VisualizationPurpose::Distribution).unwrap();
        assert!(matches!(
            session.submission(),
            Err(SessionError::MissingContext)
        ));
        session.choose_context(RenderingContext::TechnicalReport);
        let submission = session.submission().unwrap();
        assert_eq!(submission.purpose, VisualizationPurpose::Distribution);
        assert_eq!(submission.selected_columns, vec!["a".to_string()]);
    }

    #[test]
    fn follow_up_questions_track_the_flow() {
        let num = profile("a", ColumnType::Numeric);
        let cat = profile("b", ColumnType::Categorical);
        let cat2 = profile("c", ColumnType::Categorical);
        let mut session =
            QuestionnaireSession::new(DatasetSize::Medium, &[&num, &cat, &cat2]).unwrap();
        assert_eq!(
            session.active_questions(),
            vec![FollowUpQuestion::Relation]
        );
        session.set_relation(Relation::Subgroup);
        session.set_observations(ObservationsPerGroup::One);
        assert_eq!(
            session.active_questions(),
            vec![
                FollowUpQuestion::Relation,
                FollowUpQuestion::ObservationsPerGroup,
                FollowUpQuestion::GroupCount,
            ]
        );
        session.set_relation(Relation::Adjacency);
        assert_eq!(
            session.active_questions(),
            vec![FollowUpQuestion::Relation]
        );
    }
}
