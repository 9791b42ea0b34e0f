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

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DataKind {
    Numeric,
    Categorical,
    OneNumOneCat,
    OneCatManyNum,
    OneNumManyCat,
    Unknown,
}
impl DataKind {
    pub fn is_known(&self) -> bool {
        !matches!(self, DataKind::Unknown)
    }
    pub fn is_purely_numeric(&self) -> bool {
        matches!(self, DataKind::Numeric)
    }
    pub fn is_purely_categorical(&self) -> bool {
        matches!(self, DataKind::Categorical)
    }
    pub fn is_mixed(&self) -> bool {
        matches!(
            self,
            DataKind::OneNumOneCat | DataKind::OneCatManyNum | DataKind::OneNumManyCat
        )
    }
}
impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DataKind::Numeric => "numeric",
            DataKind::Categorical => "categorical",
            DataKind::OneNumOneCat => "one numeric + one categorical",
            DataKind::OneCatManyNum => "one categorical + several numeric",
            DataKind::OneNumManyCat => "one numeric + several categorical",
            DataKind::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimensionality {
    D1,
    D2,
    D3,
    D3Plus,
    Unknown,
}
impl Dimensionality {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Dimensionality::Unknown,
            1 => Dimensionality::D1,
            2 => Dimensionality::D2,
            3 => Dimensionality::D3,
            _ => Dimensionality::D3Plus,
        }
    }
    pub fn is_single(&self) -> bool {
        matches!(self, Dimensionality::D1)
    }
}
impl std::fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Dimensionality::D1 => "1D",
            Dimensionality::D2 => "2D",
            Dimensionality::D3 => "3D",
            Dimensionality::D3Plus => "3D+",
            Dimensionality::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableOrdering {
    Yes,
    No,
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    Independent,
    Nested,
    Subgroup,
    Adjacency,
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationsPerGroup {
    One,
    Several,
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupCount {
    High,
    Low,
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderingContext {
    Exploration,
    NonTechnicalReport,
    NonTechnicalPresentation,
    TechnicalPresentation,
    TechnicalReport,
}
impl RenderingContext {
    pub const ALL: [RenderingContext; 5] = [
        RenderingContext::Exploration,
        RenderingContext::NonTechnicalReport,
        RenderingContext::NonTechnicalPresentation,
        RenderingContext::TechnicalPresentation,
        RenderingContext::TechnicalReport,
    ];
    pub fn is_technical(&self) -> bool {
        matches!(
            self,
            RenderingContext::TechnicalPresentation | RenderingContext::TechnicalReport
        )
    }
}
impl std::fmt::Display for RenderingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RenderingContext::Exploration => "Exploration",
            RenderingContext::NonTechnicalReport => "Non-technical report",
            RenderingContext::NonTechnicalPresentation => "Non-technical presentation",
            RenderingContext::TechnicalPresentation => "Technical presentation",
            RenderingContext::TechnicalReport => "Technical report",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetSize {
    Small,
    Medium,
    Big,
}
impl DatasetSize {
    pub fn from_record_count(count: usize) -> Self {
        match count {
            0..=99 => DatasetSize::Small,
            100..=10_000 => DatasetSize::Medium,
            _ => DatasetSize::Big,
        }
    }
}
impl std::fmt::Display for DatasetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DatasetSize::Small => "Small",
            DatasetSize::Medium => "Medium",
            DatasetSize::Big => "Big",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum VisualizationPurpose {
    Distribution,
    Correlation,
    Ranking,
    PartToWhole,
    Evolution,
    Flow,
}
impl VisualizationPurpose {
    pub const ALL: [VisualizationPurpose; 6] = [
        VisualizationPurpose::Distribution,
        VisualizationPurpose::Correlation,
        VisualizationPurpose::Ranking,
        VisualizationPurpose::PartToWhole,
        VisualizationPurpose::Evolution,
        VisualizationPurpose::Flow,
    ];
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}
impl std::fmt::Display for VisualizationPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            VisualizationPurpose::Distribution => "Distribution",
            VisualizationPurpose::Correlation => "Correlation",
            VisualizationPurpose::Ranking => "Ranking",
            VisualizationPurpose::PartToWhole => "Part-to-whole",
            VisualizationPurpose::Evolution => "Evolution",
            VisualizationPurpose::Flow => "Flow",
        };
        write!(f, "{label}")
    }
}

/// Set of purposes packed into one byte; callers must treat it as an
/// unordered set, never as a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PurposeSet(u8);
impl PurposeSet {
    pub const EMPTY: PurposeSet = PurposeSet(0);
    pub const FULL: PurposeSet = PurposeSet(0b0011_1111);
    pub const fn of(purposes: &[VisualizationPurpose]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < purposes.len() {
            bits |= purposes[i].bit();
            i += 1;
        }
        PurposeSet(bits)
    }
    pub fn contains(&self, purpose: VisualizationPurpose) -> bool {
        self.0 & purpose.bit() != 0
    }
    pub fn insert(&mut self, purpose: VisualizationPurpose) {
        self.0 |= purpose.bit();
    }
    pub fn remove(&mut self, purpose: VisualizationPurpose) {
        self.0 &= !purpose.bit();
    }
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
    pub fn is_full(&self) -> bool {
        *self == PurposeSet::FULL
    }
    pub fn is_subset_of(&self, other: &PurposeSet) -> bool {
        self.0 & !other.0 == 0
    }
    pub fn iter(&self) -> impl Iterator<Item = VisualizationPurpose> + '_ {
        VisualizationPurpose::ALL
            .into_iter()
            .filter(|p| self.contains(*p))
    }
    pub fn purposes(&self) -> Vec<VisualizationPurpose> {
        self.iter().collect()
    }
}
impl FromIterator<VisualizationPurpose> for PurposeSet {
    fn from_iter<I: IntoIterator<Item = VisualizationPurpose>>(iter: I) -> Self {
        let mut set = PurposeSet::EMPTY;
        for purpose in iter {
            set.insert(purpose);
        }
        set
    }
}
impl std::fmt::Display for PurposeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<String> = self.iter().map(|p| p.to_string()).collect();
        write!(f, "{{{}}}", labels.join(", "))
    }
}

/// Snapshot of the questionnaire at some point in the flow. Unanswered
/// fields are explicit variants; a field is never "missing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionnaireAnswers {
    pub data_kind: DataKind,
    pub dimensionality: Dimensionality,
    pub ordering: VariableOrdering,
    pub relation: Relation,
    pub observations: ObservationsPerGroup,
}
impl Default for QuestionnaireAnswers {
    fn default() -> Self {
        Self {
            data_kind: DataKind::Unknown,
            dimensionality: Dimensionality::Unknown,
            ordering: VariableOrdering::NotApplicable,
            relation: Relation::NotApplicable,
            observations: ObservationsPerGroup::NotApplicable,
        }
    }
}
impl QuestionnaireAnswers {
    pub fn new(data_kind: DataKind, dimensionality: Dimensionality) -> Self {
        Self {
            data_kind,
            dimensionality,
            ..Default::default()
        }
    }
    pub fn with_ordering(mut self, ordering: VariableOrdering) -> Self {
        self.ordering = ordering;
        self
    }
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relation = relation;
        self
    }
    pub fn with_observations(mut self, observations: ObservationsPerGroup) -> Self {
        self.observations = observations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purpose_set_of_matches_inserts() {
        const SET: PurposeSet = PurposeSet::of(&[
            VisualizationPurpose::Ranking,
            VisualizationPurpose::PartToWhole,
        ]);
        let mut built = PurposeSet::EMPTY;
        built.insert(VisualizationPurpose::PartToWhole);
        built.insert(VisualizationPurpose::Ranking);
        assert_eq!(SET, built);
        assert_eq!(SET.len(), 2);
        assert!(SET.contains(VisualizationPurpose::Ranking));
        assert!(!SET.contains(VisualizationPurpose::Flow));
    }

    #[test]
    fn full_set_holds_all_six_purposes() {
        assert_eq!(PurposeSet::FULL.len(), 6);
        for purpose in VisualizationPurpose::ALL {
            assert!(PurposeSet::FULL.contains(purpose));
        }
        assert_eq!(
            PurposeSet::from_iter(VisualizationPurpose::ALL),
            PurposeSet::FULL
        );
    }

    #[test]
    fn dimensionality_buckets() {
        assert_eq!(Dimensionality::from_count(0), Dimensionality::Unknown);
        assert_eq!(Dimensionality::from_count(1), Dimensionality::D1);
        assert_eq!(Dimensionality::from_count(3), Dimensionality::D3);
        assert_eq!(Dimensionality::from_count(7), Dimensionality::D3Plus);
    }

    #[test]
    fn dataset_size_buckets() {
        assert_eq!(DatasetSize::from_record_count(99), DatasetSize::Small);
        assert_eq!(DatasetSize::from_record_count(100), DatasetSize::Medium);
        assert_eq!(DatasetSize::from_record_count(10_000), DatasetSize::Medium);
        assert_eq!(DatasetSize::from_record_count(10_001), DatasetSize::Big);
    }
}
