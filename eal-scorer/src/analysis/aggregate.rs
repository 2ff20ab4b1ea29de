//! Corpus-level aggregation of document scores
//!
//! Raw scores and normalizers are summed separately and divided at the end,
//! so large documents weigh more than small ones.

use serde::{Deserialize, Serialize};

use super::document::DocumentResult;

/// Running sums of unscaled scores and their normalizers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSums {
    pub argument: f64,
    pub argument_normalizer: f64,
    pub linking: f64,
    pub linking_normalizer: f64,
    pub linking_precision: f64,
    pub linking_recall: f64,
}

impl RawSums {
    pub fn add(&mut self, result: &DocumentResult) {
        self.argument += result.unscaled_argument_score.max(0.0);
        self.argument_normalizer += result.argument_normalizer;
        self.linking += result.unscaled_linking_score();
        self.linking_normalizer += result.linking_normalizer;
        self.linking_precision += result.unscaled_linking_precision();
        self.linking_recall += result.unscaled_linking_recall();
    }

    pub fn merge(&mut self, other: &RawSums) {
        self.argument += other.argument;
        self.argument_normalizer += other.argument_normalizer;
        self.linking += other.linking;
        self.linking_normalizer += other.linking_normalizer;
        self.linking_precision += other.linking_precision;
        self.linking_recall += other.linking_recall;
    }
}

impl<'a> FromIterator<&'a DocumentResult> for RawSums {
    fn from_iter<I: IntoIterator<Item = &'a DocumentResult>>(iter: I) -> Self {
        let mut sums = RawSums::default();
        for result in iter {
            sums.add(result);
        }
        sums
    }
}

fn ratio(sum: f64, normalizer: f64) -> f64 {
    if normalizer > 0.0 {
        sum / normalizer
    } else {
        0.0
    }
}

/// Aggregate scores of a corpus, each in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusAggregate {
    pub argument_score: f64,
    pub linking_score: f64,
    pub overall_score: f64,
    pub linking_precision: f64,
    pub linking_recall: f64,
    pub lambda: f64,
    pub documents: usize,
    pub sums: RawSums,
}

impl CorpusAggregate {
    pub fn from_results(results: &[DocumentResult], lambda: f64) -> Self {
        Self::from_sums(results.iter().collect(), lambda, results.len())
    }

    pub fn from_sums(sums: RawSums, lambda: f64, documents: usize) -> Self {
        let argument_score = ratio(sums.argument, sums.argument_normalizer);
        let linking_score = ratio(sums.linking, sums.linking_normalizer);
        Self {
            argument_score,
            linking_score,
            overall_score: (1.0 - lambda) * argument_score + lambda * linking_score,
            linking_precision: ratio(sums.linking_precision, sums.linking_normalizer),
            linking_recall: ratio(sums.linking_recall, sums.linking_normalizer),
            lambda,
            documents,
            sums,
        }
    }
}
