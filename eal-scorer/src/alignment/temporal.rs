//! Removal of less specific temporal arguments

use kbp_events::{AnswerKey, ArgumentOutput, Response, TimexDate};
use std::collections::{BTreeMap, BTreeSet};

/// Roles whose fillers are dates
pub const TEMPORAL_ROLES: &[&str] = &["Time"];

fn is_temporal(response: &Response) -> bool {
    TEMPORAL_ROLES.contains(&response.role.as_str())
}

/// If the answer key holds a correct temporal argument, every less specific
/// version of it (`2014-05-XX` against a correct `2014-05-12`) is dropped from
/// system output before scoring.
#[derive(Debug, Clone, Default)]
pub struct OnlyMostSpecificTemporal {
    /// Correct dates by (event type, role)
    correct_dates: BTreeMap<(String, String), BTreeSet<TimexDate>>,
}

impl OnlyMostSpecificTemporal {
    pub fn for_answer_key(key: &AnswerKey) -> Self {
        let mut correct_dates: BTreeMap<(String, String), BTreeSet<TimexDate>> = BTreeMap::new();
        for judged in &key.annotated {
            let response = &judged.response;
            if !is_temporal(response) || !judged.is_correct_up_to_inexact_justifications() {
                continue;
            }
            if let Some(date) = TimexDate::parse(&response.canonical_argument.text) {
                correct_dates
                    .entry((response.event_type.clone(), response.role.clone()))
                    .or_default()
                    .insert(date);
            }
        }
        Self { correct_dates }
    }

    /// Whether a more specific correct date exists for this response
    pub fn is_superseded(&self, response: &Response) -> bool {
        if !is_temporal(response) {
            return false;
        }
        let Some(date) = TimexDate::parse(&response.canonical_argument.text) else {
            return false;
        };
        self.correct_dates
            .get(&(response.event_type.clone(), response.role.clone()))
            .map_or(false, |correct| correct.iter().any(|c| date.is_less_specific_than(c)))
    }

    pub fn apply(&self, output: &ArgumentOutput) -> ArgumentOutput {
        if self.correct_dates.is_empty() {
            return output.clone();
        }
        let filtered = output.filter(|r| !self.is_superseded(r));
        let removed = output.len() - filtered.len();
        if removed > 0 {
            tracing::debug!(
                "Removed {} less specific temporal responses from {}",
                removed,
                output.doc_id
            );
        }
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbp_events::{
        AssessedResponse, CharOffsetSpan, KbpString, Realis, ResponseAssessment, ScoredResponse,
    };

    fn time(date: &str, start: usize) -> Response {
        Response::new(
            "doc1",
            "Conflict.Attack",
            "Time",
            KbpString::new(date, start, start + 9),
            CharOffsetSpan::new(start, start + 9),
            Realis::Actual,
        )
    }

    fn key_with(judged: Vec<AssessedResponse>) -> AnswerKey {
        AnswerKey::new("doc1", judged, Vec::new(), Default::default())
    }

    #[test]
    fn test_less_specific_date_removed() {
        let key = key_with(vec![AssessedResponse::new(
            time("2014-05-12", 100),
            ResponseAssessment::correct(Realis::Actual),
        )]);
        let output = ArgumentOutput::new(
            "doc1",
            vec![
                ScoredResponse::new(time("2014-05-XX", 200), 1.0),
                ScoredResponse::new(time("2014-05-12", 100), 1.0),
                ScoredResponse::new(time("2013-XX-XX", 300), 1.0),
            ],
        );

        let filtered = OnlyMostSpecificTemporal::for_answer_key(&key).apply(&output);
        let kept: Vec<&str> = filtered
            .responses()
            .map(|r| r.canonical_argument.text.as_str())
            .collect();
        assert_eq!(kept, vec!["2013-XX-XX", "2014-05-12"]);
    }

    #[test]
    fn test_incorrect_gold_date_does_not_filter() {
        let key = key_with(vec![AssessedResponse::new(
            time("2014-05-12", 100),
            ResponseAssessment::incorrect(Realis::Actual),
        )]);
        let output =
            ArgumentOutput::new("doc1", vec![ScoredResponse::new(time("2014-05-XX", 200), 1.0)]);
        assert_eq!(OnlyMostSpecificTemporal::for_answer_key(&key).apply(&output).len(), 1);
    }

    #[test]
    fn test_other_event_type_untouched() {
        let key = key_with(vec![AssessedResponse::new(
            time("2014-05-12", 100),
            ResponseAssessment::correct(Realis::Actual),
        )]);
        let mut other = time("2014-05-XX", 200);
        other.event_type = "Life.Die".to_string();
        let filter = OnlyMostSpecificTemporal::for_answer_key(&key);
        assert!(!filter.is_superseded(&other));
    }
}
