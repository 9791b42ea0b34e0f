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

use std::io::Write;
use std::path::PathBuf;
use vizquest::{
    recommend_chart, ChartKind, DataKind, DatasetSize, Dimensionality, GroupCount,
    ObservationsPerGroup, ProfilingConfig, QuestionnaireAnswers, QuestionnaireSession, Relation,
    RecommendationRequest, RenderingContext, VariableOrdering, VisualizationPurpose,
    VizQuestSystem,
};

use vizquest::VisualizationPurpose as P;

fn catalog_path() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config/chart_catalog.yml")
        .to_string_lossy()
        .into_owned()
}

fn system() -> VizQuestSystem {
    VizQuestSystem::with_config(&catalog_path(), ProfilingConfig::default()).unwrap()
}

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
fn adjacency_flow_depends_on_size_and_context() {
    let answers = QuestionnaireAnswers::new(DataKind::Categorical, Dimensionality::D2)
        .with_relation(Relation::Adjacency);
    let cases = [
        (DatasetSize::Big, RenderingContext::Exploration, ChartKind::Network),
        (
            DatasetSize::Big,
            RenderingContext::TechnicalReport,
            ChartKind::ChordDiagram,
        ),
        (
            DatasetSize::Small,
            RenderingContext::Exploration,
            ChartKind::SankeyDiagram,
        ),
        (
            DatasetSize::Medium,
            RenderingContext::TechnicalPresentation,
            ChartKind::ArcDiagram,
        ),
    ];
    for (size, context, expected) in cases {
        let req = request(answers, P::Flow, context, size, GroupCount::NotApplicable);
        assert_eq!(recommend_chart(&req).unwrap(), expected);
    }
}

#[test]
fn subgroup_ranking_splits_on_context() {
    let answers = QuestionnaireAnswers::new(DataKind::OneNumManyCat, Dimensionality::D3)
        .with_relation(Relation::Subgroup)
        .with_observations(ObservationsPerGroup::One);
    let informal = request(
        answers,
        P::Ranking,
        RenderingContext::Exploration,
        DatasetSize::Medium,
        GroupCount::Low,
    );
    assert_eq!(recommend_chart(&informal).unwrap(), ChartKind::Lollipop);
    let technical = request(
        answers,
        P::Ranking,
        RenderingContext::TechnicalReport,
        DatasetSize::Medium,
        GroupCount::Low,
    );
    assert_eq!(recommend_chart(&technical).unwrap(), ChartKind::ParallelPlot);
}

#[test]
fn subgroup_composition_splits_on_group_count() {
    let answers = QuestionnaireAnswers::new(DataKind::Categorical, Dimensionality::D3)
        .with_relation(Relation::Subgroup);
    let many = request(
        answers,
        P::PartToWhole,
        RenderingContext::Exploration,
        DatasetSize::Medium,
        GroupCount::High,
    );
    assert_eq!(recommend_chart(&many).unwrap(), ChartKind::StackedBarplot);
    let few = request(
        answers,
        P::PartToWhole,
        RenderingContext::Exploration,
        DatasetSize::Medium,
        GroupCount::Low,
    );
    assert_eq!(recommend_chart(&few).unwrap(), ChartKind::GroupedBarplot);
}

#[test]
fn independent_categorical_pair_maps_to_venn() {
    let answers = QuestionnaireAnswers::new(DataKind::Categorical, Dimensionality::D2)
        .with_relation(Relation::Independent);
    let req = request(
        answers,
        P::PartToWhole,
        RenderingContext::Exploration,
        DatasetSize::Small,
        GroupCount::NotApplicable,
    );
    assert_eq!(recommend_chart(&req).unwrap(), ChartKind::VennDiagram);
}

#[test]
fn small_hierarchies_prefer_dendrograms() {
    let answers = QuestionnaireAnswers::new(DataKind::Categorical, Dimensionality::D3)
        .with_relation(Relation::Nested);
    let small = request(
        answers,
        P::PartToWhole,
        RenderingContext::TechnicalReport,
        DatasetSize::Small,
        GroupCount::NotApplicable,
    );
    assert_eq!(recommend_chart(&small).unwrap(), ChartKind::Dendrogram);
    let big = request(
        answers,
        P::PartToWhole,
        RenderingContext::TechnicalReport,
        DatasetSize::Big,
        GroupCount::NotApplicable,
    );
    assert_eq!(recommend_chart(&big).unwrap(), ChartKind::Treemap);
}

/// Every recommendation reachable through an eligible purpose must have
/// a catalog entry, and that entry must serve the requested purpose.
#[test]
fn catalog_covers_every_eligible_recommendation() {
    let system = system();
    let kinds = [
        DataKind::Numeric,
        DataKind::Categorical,
        DataKind::OneNumOneCat,
        DataKind::OneCatManyNum,
        DataKind::OneNumManyCat,
    ];
    let dims = [
        Dimensionality::D1,
        Dimensionality::D2,
        Dimensionality::D3,
        Dimensionality::D3Plus,
    ];
    let orderings = [
        VariableOrdering::Yes,
        VariableOrdering::No,
        VariableOrdering::NotApplicable,
    ];
    let relations = [
        Relation::Independent,
        Relation::Nested,
        Relation::Subgroup,
        Relation::Adjacency,
        Relation::NotApplicable,
    ];
    let observations = [
        ObservationsPerGroup::One,
        ObservationsPerGroup::Several,
        ObservationsPerGroup::NotApplicable,
    ];
    let sizes = [DatasetSize::Small, DatasetSize::Medium, DatasetSize::Big];
    let groups = [GroupCount::High, GroupCount::Low, GroupCount::NotApplicable];

    let mut recommended = 0usize;
    for data_kind in kinds {
        for dimensionality in dims {
            for ordering in orderings {
                for relation in relations {
                    for observation in observations {
                        let answers = QuestionnaireAnswers {
                            data_kind,
                            dimensionality,
                            ordering,
                            relation,
                            observations: observation,
                        };
                        // Fallback outcomes permit every purpose, so only
                        // rule-hit combinations constrain what a chart may
                        // serve.
                        let outcome = vizquest::eligibility::evaluate(&answers);
                        if outcome.is_fallback() {
                            continue;
                        }
                        for purpose in outcome.purposes.iter() {
                            for context in RenderingContext::ALL {
                                for size in sizes {
                                    for group_count in groups {
                                        let req = request(
                                            answers,
                                            purpose,
                                            context,
                                            size,
                                            group_count,
                                        );
                                        if let Ok(kind) = recommend_chart(&req) {
                                            recommended += 1;
                                            let entry = system
                                                .catalog()
                                                .get(kind)
                                                .unwrap_or_else(|| {
                                                    panic!("no catalog entry for {kind}")
                                                });
                                            assert!(
                                                entry.serves(purpose),
                                                "{kind} recommended for {purpose} it does not serve"
                                            );
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    assert!(recommended > 0);
}

#[test]
fn full_pipeline_from_csv_to_recommendation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "category,value").unwrap();
    for i in 0..12 {
        writeln!(file, "group-{},{}", i % 3, i * 10).unwrap();
    }
    file.flush().unwrap();

    let system = system();
    let profiles = system
        .profile_csv(file.path().to_str().unwrap())
        .unwrap();
    let summary = system.get_summary(&profiles);
    assert_eq!(summary.size, DatasetSize::Small);

    let selection: Vec<&_> = profiles.iter().collect();
    let mut session = QuestionnaireSession::new(summary.size, &selection).unwrap();
    assert_eq!(session.answers().data_kind, DataKind::OneNumOneCat);

    session.set_observations(ObservationsPerGroup::Several);
    assert_eq!(
        session.eligible_purposes().purposes(),
        vec![P::Distribution]
    );
    session.choose_purpose(P::Distribution).unwrap();
    session.choose_context(RenderingContext::TechnicalReport);

    let submission = session.submission().unwrap();
    let recommendation = system.recommend(&submission).unwrap();
    assert_eq!(recommendation.kind, ChartKind::Boxplot);
    assert!(!recommendation.description.is_empty());
}

#[test]
fn catalog_validation_passes_for_the_shipped_file() {
    let system = system();
    assert!(system.catalog().validate().is_ok());
    assert_eq!(system.available_charts().len(), ChartKind::ALL.len());
}
