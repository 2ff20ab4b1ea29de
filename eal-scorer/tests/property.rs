//! Property-based tests for class ordering and scoring using proptest

use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs;

use eal_scorer::alignment::{
    AlignmentDriver, AnswerKeyAnswerSource, AnswerSource, ByJustificationLocation,
    EntityNormalizer, SystemOutputAnswerSource, TypeRoleFillerRealis,
};
use eal_scorer::analysis::{CorpusAggregate, EalScorer};
use eal_scorer::observers::{
    AlignmentLogObserver, ConfusionMatrixObserver, CorrectnessRule, Registered,
};
use kbp_events::{
    AnswerKey, ArgumentOutput, AssessedResponse, CharOffsetSpan, JsonAnnotationStore,
    JsonArgumentStore, KbpString, Realis, Response, ResponseAssessment, SameEventTypeLinker,
    ScoredResponse, ScoringData,
};
use tempfile::TempDir;

const EVENT_TYPES: &[&str] = &["Conflict.Attack", "Life.Die"];
const ROLES: &[&str] = &["Target", "Attacker", "Place"];
const FILLERS: &[&str] = &["rebels", "the city", "Baghdad", "soldiers"];

// =========================================================================
// Generation strategies
// =========================================================================

fn arb_realis() -> impl Strategy<Value = Realis> {
    prop_oneof![Just(Realis::Actual), Just(Realis::Generic), Just(Realis::Other)]
}

fn arb_response(doc_id: &'static str) -> impl Strategy<Value = Response> {
    (
        0..EVENT_TYPES.len(),
        0..ROLES.len(),
        0..FILLERS.len(),
        0usize..500,
        arb_realis(),
        prop::option::of(0usize..500),
    )
        .prop_map(move |(event_type, role, filler, start, realis, predicate)| {
            let text = FILLERS[filler];
            let end = start + text.len() - 1;
            let response = Response::new(
                doc_id,
                EVENT_TYPES[event_type],
                ROLES[role],
                KbpString::new(text, start, end),
                CharOffsetSpan::new(start, end),
                realis,
            );
            match predicate {
                Some(p) => response.with_predicate_justification(CharOffsetSpan::new(p, p + 10)),
                None => response,
            }
        })
}

fn arb_assessment() -> impl Strategy<Value = ResponseAssessment> {
    (arb_realis(), 0..3u8).prop_map(|(realis, level)| match level {
        0 => ResponseAssessment::correct(realis),
        1 => ResponseAssessment::inexact(realis),
        _ => ResponseAssessment::incorrect(realis),
    })
}

/// An answer key plus system output drawing partly on the same responses
fn arb_document(doc_id: &'static str) -> impl Strategy<Value = (AnswerKey, ArgumentOutput)> {
    (
        prop::collection::vec((arb_response(doc_id), arb_assessment()), 0..12),
        prop::collection::vec(arb_response(doc_id), 0..6),
        prop::collection::vec(any::<bool>(), 12),
        prop::collection::vec(0.0f64..1.0, 18),
    )
        .prop_map(move |(judged, extra, reuse, confidences)| {
            let mut system: Vec<Response> = judged
                .iter()
                .zip(reuse.iter())
                .filter(|(_, keep)| **keep)
                .map(|((response, _), _)| response.clone())
                .collect();
            system.extend(extra);

            let key = AnswerKey::new(
                doc_id,
                judged
                    .into_iter()
                    .map(|(response, assessment)| AssessedResponse::new(response, assessment)),
                Vec::new(),
                Default::default(),
            );
            let output = ArgumentOutput::new(
                doc_id,
                system
                    .into_iter()
                    .zip(confidences)
                    .map(|(response, confidence)| ScoredResponse::new(response, confidence)),
            );
            (key, output)
        })
}

fn scoring_data(key: AnswerKey, output: ArgumentOutput) -> ScoringData {
    let linker = SameEventTypeLinker::default();
    let reference = linker
        .link(&key.doc_id, key.annotated.iter().map(|judged| &judged.response))
        .expect("linking of distinct responses");
    let system = linker
        .link(&output.doc_id, output.responses())
        .expect("linking of distinct responses");
    ScoringData::new(key, output, reference, system)
}

/// Display forms of every class either side of a document holds
fn class_names(key: &AnswerKey, output: &ArgumentOutput) -> BTreeSet<String> {
    let normalizer = EntityNormalizer::from_answer_key(key);
    let key_source = AnswerKeyAnswerSource::for_answer_key(key.clone(), &normalizer);
    let system_source = SystemOutputAnswerSource::for_argument_output(output.clone(), &normalizer);
    key_source
        .answerables()
        .chain(system_source.answerables())
        .map(|class| class.to_string())
        .collect()
}

fn in_unit_interval(x: f64) -> bool {
    (0.0..=1.0 + 1e-9).contains(&x)
}

// =========================================================================
// Property: class ordering is a strict total order
// =========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn ordering_is_total_and_deterministic((key, output) in arb_document("doc1")) {
        let normalizer = EntityNormalizer::from_answer_key(&key);
        let key_source = AnswerKeyAnswerSource::for_answer_key(key, &normalizer);
        let system_source = SystemOutputAnswerSource::for_argument_output(output, &normalizer);
        let order = ByJustificationLocation::new(&key_source, &system_source);

        let classes: Vec<&TypeRoleFillerRealis> =
            system_source.answerables().chain(key_source.answerables()).collect();

        for a in &classes {
            prop_assert_eq!(order.compare(a, a), Ordering::Equal);
            for b in &classes {
                let ab = order.compare(a, b);
                prop_assert_eq!(ab, order.compare(b, a).reverse());
                if ab == Ordering::Equal {
                    prop_assert_eq!(*a, *b);
                }
                for c in &classes {
                    if ab == Ordering::Less && order.compare(b, c) == Ordering::Less {
                        prop_assert_eq!(order.compare(a, c), Ordering::Less);
                    }
                }
            }
        }

        let forward = order.sorted(classes.iter().copied());
        let backward = order.sorted(classes.iter().rev().copied());
        prop_assert_eq!(forward, backward);
    }

    // =====================================================================
    // Property: every class aligns exactly once
    // =====================================================================

    #[test]
    fn every_class_aligns_exactly_once((key, output) in arb_document("doc1")) {
        let expected = class_names(&key, &output);

        let dir = TempDir::new().unwrap();
        let keys = JsonAnnotationStore::create(dir.path().join("key")).unwrap();
        let arguments = JsonArgumentStore::create(dir.path().join("arguments")).unwrap();
        keys.write(&key).unwrap();
        arguments.write(&output).unwrap();

        let out = dir.path().join("out");
        let mut log = Registered::new(AlignmentLogObserver::new("log"));
        let mut confusion = Registered::new(ConfusionMatrixObserver::new(
            "confusion",
            CorrectnessRule::Strict,
        ));
        let report = AlignmentDriver::new()
            .with_output_dir(out.clone())
            .run(&arguments, &keys, &mut [&mut log, &mut confusion])
            .unwrap();

        prop_assert_eq!(report.classes, expected.len());
        prop_assert_eq!(log.observer().counts().total(), expected.len());
        prop_assert_eq!(confusion.observer().corpus_matrix().total(), expected.len());

        let logged = fs::read_to_string(out.join("log").join("doc1").join("alignment.log"))
            .unwrap();
        let logged_classes: Vec<&str> = logged
            .lines()
            .filter_map(|line| line.split_once('\t').map(|(_, class)| class))
            .collect();
        prop_assert_eq!(logged_classes.len(), expected.len());
        let distinct: BTreeSet<String> = logged_classes.iter().map(|c| c.to_string()).collect();
        prop_assert_eq!(distinct, expected);
    }

    // =====================================================================
    // Property: document scores stay in range
    // =====================================================================

    #[test]
    fn document_scores_are_bounded(
        (key, output) in arb_document("doc1"),
        lambda in 0.0f64..=1.0,
        penalty in 0.0f64..2.0,
    ) {
        let result = EalScorer::new(lambda, penalty).score(&scoring_data(key, output));

        prop_assert!(result.unscaled_argument_score >= 0.0);
        prop_assert!(in_unit_interval(result.linking_score.precision));
        prop_assert!(in_unit_interval(result.linking_score.recall));
        prop_assert!(in_unit_interval(result.linking_score.f1));
        prop_assert!(in_unit_interval(result.scaled_linking_score()));
        prop_assert!(in_unit_interval(result.scaled_argument_score()));
        prop_assert!(in_unit_interval(result.scaled_score()));
        if result.argument_normalizer == 0.0 {
            prop_assert_eq!(result.scaled_argument_score(), 0.0);
        }
    }

    // =====================================================================
    // Property: corpus score is the lambda-weighted sum of its components
    // =====================================================================

    #[test]
    fn aggregate_combines_components(
        first in arb_document("doc1"),
        second in arb_document("doc2"),
        lambda in 0.0f64..=1.0,
    ) {
        let scorer = EalScorer::new(lambda, 0.25);
        let results = vec![
            scorer.score(&scoring_data(first.0, first.1)),
            scorer.score(&scoring_data(second.0, second.1)),
        ];
        let aggregate = CorpusAggregate::from_results(&results, lambda);

        let expected = (1.0 - lambda) * aggregate.argument_score + lambda * aggregate.linking_score;
        prop_assert!((aggregate.overall_score - expected).abs() < 1e-9);
        prop_assert!(in_unit_interval(aggregate.argument_score));
        prop_assert!(in_unit_interval(aggregate.linking_score));
        prop_assert!(in_unit_interval(aggregate.overall_score));
        prop_assert_eq!(aggregate.documents, 2);
    }
}
