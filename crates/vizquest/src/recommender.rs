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
    DataKind, DatasetSize, Dimensionality, GroupCount, QuestionnaireAnswers, RenderingContext,
    VisualizationPurpose,
};
use crate::catalog::ChartKind;
use crate::error::RecommendationError;
use serde::{Deserialize, Serialize};

use crate::answers::DatasetSize as Size;
use crate::answers::GroupCount as Groups;
use crate::answers::ObservationsPerGroup as Obs;
use crate::answers::Relation as Rel;
use crate::answers::VariableOrdering as Ordering;
use crate::answers::VisualizationPurpose as P;
use crate::catalog::ChartKind as C;

/// Finalized questionnaire plus the choices made after eligibility
/// filtering. One request maps to at most one chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub answers: QuestionnaireAnswers,
    pub purpose: VisualizationPurpose,
    pub context: RenderingContext,
    pub dataset_size: DatasetSize,
    pub group_count: GroupCount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: ChartKind,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub fn recommend_chart(
    request: &RecommendationRequest,
) -> Result<ChartKind, RecommendationError> {
    let kind = match request.answers.data_kind {
        DataKind::Numeric => recommend_numeric(request),
        DataKind::Categorical => recommend_categorical(request),
        DataKind::OneNumOneCat => recommend_num_cat_pair(request),
        DataKind::OneCatManyNum => recommend_one_cat_many_num(request),
        DataKind::OneNumManyCat => recommend_one_num_many_cat(request),
        DataKind::Unknown => None,
    };
    match kind {
        Some(kind) => {
            tracing::debug!(%kind, purpose = %request.purpose, "chart recommended");
            Ok(kind)
        }
        None => Err(RecommendationError::NoRecommendation {
            data_kind: request.answers.data_kind,
            purpose: request.purpose,
        }),
    }
}

fn small_or_medium(size: DatasetSize) -> bool {
    matches!(size, Size::Small | Size::Medium)
}

fn recommend_numeric(request: &RecommendationRequest) -> Option<ChartKind> {
    let technical = request.context.is_technical();
    let size = request.dataset_size;
    match request.answers.dimensionality {
        // The ordering question is never asked for one variable, so the
        // single-dimension branch ignores it.
        Dimensionality::D1 => match request.purpose {
            P::Distribution if small_or_medium(size) => Some(C::Histogram),
            P::Distribution => Some(C::DensityPlot),
            _ => None,
        },
        Dimensionality::D2 => match request.answers.ordering {
            Ordering::No => match (request.purpose, size) {
                (P::Distribution, Size::Small | Size::Medium) => Some(if technical {
                    C::Boxplot
                } else {
                    C::Histogram
                }),
                (P::Distribution, Size::Big) => Some(if technical {
                    C::ViolinPlot
                } else {
                    C::DensityPlot
                }),
                (P::Correlation, Size::Small | Size::Medium) => Some(C::Scatter),
                (P::Correlation, Size::Big) => Some(C::TwoDimensionalDensity),
                (P::Evolution, Size::Big) => Some(C::ScatterWithMarginals),
                _ => None,
            },
            Ordering::Yes => match request.purpose {
                P::Correlation => Some(C::ConnectedScatter),
                P::Evolution => Some(C::LinePlot),
                _ => None,
            },
            Ordering::NotApplicable => None,
        },
        Dimensionality::D3 => match request.answers.ordering {
            Ordering::No => match request.purpose {
                P::Distribution => Some(if technical { C::ViolinPlot } else { C::Boxplot }),
                P::Correlation => Some(C::BubblePlot),
                _ => None,
            },
            Ordering::Yes => match request.purpose {
                P::Evolution => Some(if technical { C::AreaPlot } else { C::LinePlot }),
                _ => None,
            },
            Ordering::NotApplicable => None,
        },
        Dimensionality::D3Plus => match request.answers.ordering {
            Ordering::No => match request.purpose {
                P::Distribution if !technical => Some(C::Boxplot),
                P::Distribution if size == Size::Big => Some(C::RidgeLine),
                P::Distribution => Some(C::ViolinPlot),
                P::Evolution => Some(if technical { C::Heatmap } else { C::Correlogram }),
                P::PartToWhole if request.answers.relation == Rel::Subgroup => {
                    Some(hierarchy_chart(size, technical))
                }
                _ => None,
            },
            Ordering::Yes => match request.purpose {
                P::Evolution => Some(if technical { C::AreaPlot } else { C::LinePlot }),
                _ => None,
            },
            Ordering::NotApplicable => None,
        },
        Dimensionality::Unknown => None,
    }
}

fn recommend_categorical(request: &RecommendationRequest) -> Option<ChartKind> {
    let technical = request.context.is_technical();
    let size = request.dataset_size;
    match request.answers.dimensionality {
        Dimensionality::D1 => match request.purpose {
            P::Ranking if size == Size::Big => Some(C::Wordcloud),
            P::Ranking => Some(if technical { C::Barplot } else { C::Lollipop }),
            P::PartToWhole if request.answers.relation == Rel::Nested => {
                Some(if technical { C::Treemap } else { C::CircularPacking })
            }
            P::PartToWhole => Some(if technical { C::Waffle } else { C::Doughnut }),
            _ => None,
        },
        Dimensionality::D2 | Dimensionality::D3 | Dimensionality::D3Plus => {
            if request.answers.relation == Rel::Independent
                && request.answers.dimensionality != Dimensionality::D3Plus
            {
                return Some(C::VennDiagram);
            }
            match request.answers.relation {
                Rel::Nested => match request.purpose {
                    P::PartToWhole => Some(hierarchy_chart(size, technical)),
                    P::Ranking => Some(C::Barplot),
                    _ => None,
                },
                Rel::Subgroup => grouped_comparison_chart(request),
                Rel::Adjacency => adjacency_chart(request),
                _ => None,
            }
        }
        Dimensionality::Unknown => None,
    }
}

fn recommend_num_cat_pair(request: &RecommendationRequest) -> Option<ChartKind> {
    let technical = request.context.is_technical();
    let size = request.dataset_size;
    match request.answers.observations {
        Obs::One => match request.purpose {
            P::Distribution => Some(C::Boxplot),
            P::Ranking if size == Size::Big => Some(C::Wordcloud),
            P::Ranking => Some(if technical { C::Barplot } else { C::Lollipop }),
            P::PartToWhole if request.answers.relation == Rel::Nested => {
                Some(if technical { C::Treemap } else { C::CircularPacking })
            }
            P::PartToWhole => Some(if technical { C::Waffle } else { C::Doughnut }),
            _ => None,
        },
        _ => match request.purpose {
            P::Distribution if small_or_medium(size) => {
                Some(if technical { C::Boxplot } else { C::Histogram })
            }
            P::Distribution => Some(if technical { C::RidgeLine } else { C::DensityPlot }),
            _ => None,
        },
    }
}

fn recommend_one_cat_many_num(request: &RecommendationRequest) -> Option<ChartKind> {
    let technical = request.context.is_technical();
    let size = request.dataset_size;
    match request.answers.observations {
        Obs::Several => match request.answers.ordering {
            Ordering::No => match request.purpose {
                P::Distribution => Some(if technical { C::ViolinPlot } else { C::Boxplot }),
                P::Correlation if size == Size::Big => Some(C::TwoDimensionalDensity),
                P::Correlation => Some(if technical {
                    C::Correlogram
                } else {
                    C::GroupedScatter
                }),
                _ => None,
            },
            _ => match request.purpose {
                P::Evolution => Some(if technical { C::AreaPlot } else { C::LinePlot }),
                P::Correlation => Some(C::ConnectedScatter),
                _ => None,
            },
        },
        Obs::One => grouped_comparison_chart(request),
        Obs::NotApplicable => None,
    }
}

fn recommend_one_num_many_cat(request: &RecommendationRequest) -> Option<ChartKind> {
    let technical = request.context.is_technical();
    let size = request.dataset_size;
    match request.answers.relation {
        Rel::Subgroup => match request.answers.observations {
            Obs::One => grouped_comparison_chart(request),
            Obs::Several => match request.purpose {
                P::Distribution => Some(if technical { C::ViolinPlot } else { C::Boxplot }),
                _ => None,
            },
            Obs::NotApplicable => None,
        },
        Rel::Nested => match request.answers.observations {
            Obs::One => match request.purpose {
                P::PartToWhole => Some(hierarchy_chart(size, technical)),
                P::Ranking => Some(C::Barplot),
                _ => None,
            },
            Obs::Several => match request.purpose {
                P::Distribution => Some(if technical { C::ViolinPlot } else { C::Boxplot }),
                _ => None,
            },
            Obs::NotApplicable => None,
        },
        Rel::Adjacency => adjacency_chart(request),
        _ => None,
    }
}

/// Shared branch for "one value per group" comparisons across the
/// subgroup-shaped data kinds.
fn grouped_comparison_chart(request: &RecommendationRequest) -> Option<ChartKind> {
    let technical = request.context.is_technical();
    match request.purpose {
        P::Correlation => Some(if request.group_count == Groups::Low {
            C::GroupedScatter
        } else {
            C::Heatmap
        }),
        P::Ranking => Some(if technical { C::ParallelPlot } else { C::Lollipop }),
        P::PartToWhole => Some(if request.group_count == Groups::High {
            C::StackedBarplot
        } else {
            C::GroupedBarplot
        }),
        P::Flow => Some(C::SankeyDiagram),
        _ => None,
    }
}

fn adjacency_chart(request: &RecommendationRequest) -> Option<ChartKind> {
    let technical = request.context.is_technical();
    match request.purpose {
        P::Flow => Some(match (request.dataset_size, technical) {
            (Size::Big, false) => C::Network,
            (Size::Big, true) => C::ChordDiagram,
            (_, false) => C::SankeyDiagram,
            (_, true) => C::ArcDiagram,
        }),
        P::Correlation => Some(C::Heatmap),
        _ => None,
    }
}

/// Small hierarchies read best as a dendrogram; otherwise packing for
/// informal contexts and a treemap for technical ones.
fn hierarchy_chart(size: DatasetSize, technical: bool) -> ChartKind {
    if size == Size::Small {
        C::Dendrogram
    } else if technical {
        C::Treemap
    } else {
        C::CircularPacking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::Dimensionality as D;

    fn request(
        answers: QuestionnaireAnswers,
        purpose: VisualizationPurpose,
        context: RenderingContext,
        dataset_size: DatasetSize,
        group_count: GroupCount,
    ) -> RecommendationRequest {
        RecommendationRequest {
            answers,
            purpose,
            context,
            dataset_size,
            group_count,
        }
    }

    #[test]
    fn single_numeric_distribution_depends_on_size() {
        let answers = QuestionnaireAnswers::new(DataKind::Numeric, D::D1);
        let small = request(
            answers,
            P::Distribution,
            RenderingContext::Exploration,
            Size::Small,
            Groups::NotApplicable,
        );
        assert_eq!(recommend_chart(&small).unwrap(), C::Histogram);
        let big = request(
            answers,
            P::Distribution,
            RenderingContext::Exploration,
            Size::Big,
            Groups::NotApplicable,
        );
        assert_eq!(recommend_chart(&big).unwrap(), C::DensityPlot);
    }

    #[test]
    fn uncovered_combination_is_a_typed_error() {
        let answers = QuestionnaireAnswers::new(DataKind::Numeric, D::D1);
        let req = request(
            answers,
            P::Flow,
            RenderingContext::Exploration,
            Size::Small,
            Groups::NotApplicable,
        );
        let err = recommend_chart(&req).unwrap_err();
        assert!(matches!(
            err,
            RecommendationError::NoRecommendation { .. }
        ));
    }
}
