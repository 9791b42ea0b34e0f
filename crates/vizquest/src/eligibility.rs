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
    DataKind, Dimensionality, ObservationsPerGroup, PurposeSet, QuestionnaireAnswers, Relation,
    VariableOrdering,
};

use crate::answers::DataKind as K;
use crate::answers::Dimensionality as D;
use crate::answers::ObservationsPerGroup as Obs;
use crate::answers::Relation as R;
use crate::answers::VariableOrdering as Ord;
use crate::answers::VisualizationPurpose as P;

/// One row of the eligibility table. An empty slice is a wildcard; a
/// non-empty slice must contain the corresponding answer for the rule
/// to fire.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityRule {
    pub name: &'static str,
    kinds: &'static [DataKind],
    dimensionalities: &'static [Dimensionality],
    orderings: &'static [VariableOrdering],
    relations: &'static [Relation],
    observations: &'static [ObservationsPerGroup],
    result: PurposeSet,
}
impl EligibilityRule {
    pub fn matches(&self, answers: &QuestionnaireAnswers) -> bool {
        fn admits<T: PartialEq>(allowed: &[T], value: &T) -> bool {
            allowed.is_empty() || allowed.contains(value)
        }
        admits(self.kinds, &answers.data_kind)
            && admits(self.dimensionalities, &answers.dimensionality)
            && admits(self.orderings, &answers.ordering)
            && admits(self.relations, &answers.relation)
            && admits(self.observations, &answers.observations)
    }
    pub fn result(&self) -> PurposeSet {
        self.result
    }
}

/// Rules are tried top to bottom and the first hit wins. The
/// independent-relation rule sits ahead of the broad 1D categorical
/// rule; swapping them silently changes the 1D/Independent answer.
pub const RULES: &[EligibilityRule] = &[
    EligibilityRule {
        name: "numeric-single",
        kinds: &[K::Numeric],
        dimensionalities: &[D::D1],
        orderings: &[],
        relations: &[],
        observations: &[],
        result: PurposeSet::of(&[P::Distribution]),
    },
    EligibilityRule {
        name: "numeric-unordered",
        kinds: &[K::Numeric],
        dimensionalities: &[D::D2, D::D3],
        orderings: &[Ord::No, Ord::NotApplicable],
        relations: &[],
        observations: &[],
        result: PurposeSet::of(&[P::Distribution, P::Correlation]),
    },
    EligibilityRule {
        name: "numeric-ordered-pair",
        kinds: &[K::Numeric],
        dimensionalities: &[D::D2],
        orderings: &[Ord::Yes],
        relations: &[],
        observations: &[],
        result: PurposeSet::of(&[P::Evolution, P::Correlation]),
    },
    EligibilityRule {
        name: "numeric-ordered-many",
        kinds: &[K::Numeric],
        dimensionalities: &[D::D3, D::D3Plus],
        orderings: &[Ord::Yes],
        relations: &[],
        observations: &[],
        result: PurposeSet::of(&[P::Evolution]),
    },
    EligibilityRule {
        name: "numeric-unordered-wide",
        kinds: &[K::Numeric],
        dimensionalities: &[D::D3Plus],
        orderings: &[Ord::No, Ord::NotApplicable],
        relations: &[],
        observations: &[],
        result: PurposeSet::of(&[P::Distribution, P::Correlation, P::PartToWhole]),
    },
    EligibilityRule {
        name: "categorical-independent",
        kinds: &[K::Categorical],
        dimensionalities: &[D::D1, D::D2],
        orderings: &[],
        relations: &[R::Independent],
        observations: &[],
        result: PurposeSet::of(&[P::PartToWhole]),
    },
    EligibilityRule {
        name: "categorical-single",
        kinds: &[K::Categorical],
        dimensionalities: &[D::D1],
        orderings: &[],
        relations: &[],
        observations: &[],
        result: PurposeSet::of(&[P::Ranking, P::PartToWhole]),
    },
    EligibilityRule {
        name: "categorical-subgroup",
        kinds: &[K::Categorical],
        dimensionalities: &[D::D2, D::D3, D::D3Plus],
        orderings: &[],
        relations: &[R::Subgroup],
        observations: &[],
        result: PurposeSet::of(&[P::Ranking, P::PartToWhole, P::Correlation, P::Flow]),
    },
    EligibilityRule {
        name: "categorical-nested",
        kinds: &[K::Categorical],
        dimensionalities: &[D::D2, D::D3, D::D3Plus],
        orderings: &[],
        relations: &[R::Nested],
        observations: &[],
        result: PurposeSet::of(&[P::Ranking, P::PartToWhole]),
    },
    EligibilityRule {
        name: "categorical-adjacency",
        kinds: &[K::Categorical],
        dimensionalities: &[D::D2, D::D3, D::D3Plus],
        orderings: &[],
        relations: &[R::Adjacency],
        observations: &[],
        result: PurposeSet::of(&[P::Correlation, P::Flow]),
    },
    EligibilityRule {
        name: "num-cat-pair-repeated",
        kinds: &[K::OneNumOneCat],
        dimensionalities: &[],
        orderings: &[],
        relations: &[],
        observations: &[Obs::Several],
        result: PurposeSet::of(&[P::Distribution]),
    },
    EligibilityRule {
        name: "num-cat-pair-single",
        kinds: &[K::OneNumOneCat],
        dimensionalities: &[],
        orderings: &[],
        relations: &[],
        observations: &[Obs::One],
        result: PurposeSet::of(&[P::Distribution, P::PartToWhole, P::Ranking]),
    },
    EligibilityRule {
        name: "many-num-unordered",
        kinds: &[K::OneCatManyNum],
        dimensionalities: &[],
        orderings: &[Ord::No],
        relations: &[],
        observations: &[Obs::Several],
        result: PurposeSet::of(&[P::Distribution, P::Correlation]),
    },
    EligibilityRule {
        name: "many-num-ordered",
        kinds: &[K::OneCatManyNum],
        dimensionalities: &[],
        orderings: &[Ord::Yes],
        relations: &[],
        observations: &[Obs::Several],
        result: PurposeSet::of(&[P::Evolution, P::Correlation]),
    },
    EligibilityRule {
        name: "many-num-single",
        kinds: &[K::OneCatManyNum],
        dimensionalities: &[],
        orderings: &[],
        relations: &[],
        observations: &[Obs::One],
        result: PurposeSet::of(&[P::Ranking, P::PartToWhole, P::Flow, P::Correlation]),
    },
    EligibilityRule {
        name: "many-cat-subgroup-single",
        kinds: &[K::OneNumManyCat],
        dimensionalities: &[],
        orderings: &[],
        relations: &[R::Subgroup],
        observations: &[Obs::One],
        result: PurposeSet::of(&[P::Ranking, P::PartToWhole, P::Flow, P::Correlation]),
    },
    EligibilityRule {
        name: "many-cat-subgroup-repeated",
        kinds: &[K::OneNumManyCat],
        dimensionalities: &[],
        orderings: &[],
        relations: &[R::Subgroup],
        observations: &[Obs::Several],
        result: PurposeSet::of(&[P::Distribution]),
    },
    EligibilityRule {
        name: "many-cat-nested-single",
        kinds: &[K::OneNumManyCat],
        dimensionalities: &[],
        orderings: &[],
        relations: &[R::Nested],
        observations: &[Obs::One],
        result: PurposeSet::of(&[P::Ranking, P::PartToWhole]),
    },
    EligibilityRule {
        name: "many-cat-nested-repeated",
        kinds: &[K::OneNumManyCat],
        dimensionalities: &[],
        orderings: &[],
        relations: &[R::Nested],
        observations: &[Obs::Several],
        result: PurposeSet::of(&[P::Distribution]),
    },
    EligibilityRule {
        name: "many-cat-adjacency",
        kinds: &[K::OneNumManyCat],
        dimensionalities: &[],
        orderings: &[],
        relations: &[R::Adjacency],
        observations: &[],
        result: PurposeSet::of(&[P::Flow, P::Correlation]),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityOutcome {
    pub purposes: PurposeSet,
    /// Name of the rule that fired, or `None` when the permissive
    /// full-set fallback was taken.
    pub rule: Option<&'static str>,
}
impl EligibilityOutcome {
    pub fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}

pub fn evaluate(answers: &QuestionnaireAnswers) -> EligibilityOutcome {
    for rule in RULES {
        if rule.matches(answers) {
            tracing::trace!(rule = rule.name, purposes = %rule.result, "eligibility rule hit");
            return EligibilityOutcome {
                purposes: rule.result,
                rule: Some(rule.name),
            };
        }
    }
    tracing::trace!("no eligibility rule matched; permitting all purposes");
    EligibilityOutcome {
        purposes: PurposeSet::FULL,
        rule: None,
    }
}

pub fn compute_eligible_purposes(answers: &QuestionnaireAnswers) -> PurposeSet {
    evaluate(answers).purposes
}

/// Every rule that would fire for the given answers, in table order.
/// The head of the list is the winner; anything behind it is shadowed.
pub fn matching_rules(answers: &QuestionnaireAnswers) -> Vec<&'static EligibilityRule> {
    RULES.iter().filter(|rule| rule.matches(answers)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_answer_combination() -> impl Iterator<Item = QuestionnaireAnswers> {
        const KINDS: [DataKind; 6] = [
            K::Numeric,
            K::Categorical,
            K::OneNumOneCat,
            K::OneCatManyNum,
            K::OneNumManyCat,
            K::Unknown,
        ];
        const DIMS: [Dimensionality; 5] = [D::D1, D::D2, D::D3, D::D3Plus, D::Unknown];
        const ORDS: [VariableOrdering; 3] = [Ord::Yes, Ord::No, Ord::NotApplicable];
        const RELS: [Relation; 5] = [
            R::Independent,
            R::Nested,
            R::Subgroup,
            R::Adjacency,
            R::NotApplicable,
        ];
        const OBS: [ObservationsPerGroup; 3] = [Obs::One, Obs::Several, Obs::NotApplicable];
        KINDS.into_iter().flat_map(move |data_kind| {
            DIMS.into_iter().flat_map(move |dimensionality| {
                ORDS.into_iter().flat_map(move |ordering| {
                    RELS.into_iter().flat_map(move |relation| {
                        OBS.into_iter().map(move |observations| QuestionnaireAnswers {
                            data_kind,
                            dimensionality,
                            ordering,
                            relation,
                            observations,
                        })
                    })
                })
            })
        })
    }

    #[test]
    fn result_is_never_empty_over_the_whole_input_space() {
        for answers in every_answer_combination() {
            let purposes = compute_eligible_purposes(&answers);
            assert!(!purposes.is_empty(), "empty set for {answers:?}");
            assert!(purposes.is_subset_of(&PurposeSet::FULL));
        }
    }

    #[test]
    fn unknown_kind_falls_back_to_full_set() {
        let answers = QuestionnaireAnswers::default();
        let outcome = evaluate(&answers);
        assert!(outcome.is_fallback());
        assert!(outcome.purposes.is_full());
    }

    #[test]
    fn overlaps_are_confined_to_the_independent_rule() {
        // The only sanctioned overlap is categorical-independent ahead of
        // categorical-single; any other double hit is a table regression.
        for answers in every_answer_combination() {
            let hits = matching_rules(&answers);
            match hits.len() {
                0 | 1 => {}
                2 => {
                    assert_eq!(hits[0].name, "categorical-independent", "{answers:?}");
                    assert_eq!(hits[1].name, "categorical-single", "{answers:?}");
                }
                n => panic!("{n} rules fired for {answers:?}"),
            }
        }
    }

    #[test]
    fn independent_relation_wins_over_broad_single_dimension_rule() {
        let answers = QuestionnaireAnswers::new(K::Categorical, D::D1)
            .with_relation(R::Independent);
        let outcome = evaluate(&answers);
        assert_eq!(outcome.rule, Some("categorical-independent"));
        assert_eq!(outcome.purposes, PurposeSet::of(&[P::PartToWhole]));
    }
}
