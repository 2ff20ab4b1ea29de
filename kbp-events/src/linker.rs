//! Default linking for systems that only produce arguments

use std::collections::{BTreeMap, BTreeSet};

use crate::answer_key::{AnswerKey, ArgumentOutput};
use crate::error::Result;
use crate::linking::{ResponseLinking, ResponseSet};
use crate::response::{Realis, Response};
use crate::store::LinkingStore;

/// Links together every response of the same event type whose realis is in
/// the linkable set. Responses with any other realis are left incomplete.
#[derive(Debug, Clone)]
pub struct SameEventTypeLinker {
    linkable_realis: BTreeSet<Realis>,
}

impl SameEventTypeLinker {
    pub fn new(linkable_realis: impl IntoIterator<Item = Realis>) -> Self {
        Self {
            linkable_realis: linkable_realis.into_iter().collect(),
        }
    }

    pub fn link<'a>(
        &self,
        doc_id: &str,
        responses: impl IntoIterator<Item = &'a Response>,
    ) -> Result<ResponseLinking> {
        let mut by_type: BTreeMap<&str, ResponseSet> = BTreeMap::new();
        let mut incomplete = BTreeSet::new();

        for response in responses {
            if self.linkable_realis.contains(&response.realis) {
                by_type
                    .entry(response.event_type.as_str())
                    .or_default()
                    .insert(response.clone());
            } else {
                incomplete.insert(response.clone());
            }
        }

        tracing::debug!(
            "Default linking for {}: {} clusters, {} incomplete",
            doc_id,
            by_type.len(),
            incomplete.len()
        );
        ResponseLinking::new(doc_id, by_type.into_values(), incomplete)
    }
}

impl Default for SameEventTypeLinker {
    fn default() -> Self {
        Self::new([Realis::Actual, Realis::Other])
    }
}

impl LinkingStore for SameEventTypeLinker {
    fn read_for_answer_key(&self, key: &AnswerKey) -> Result<Option<ResponseLinking>> {
        self.link(&key.doc_id, key.all_responses()).map(Some)
    }

    fn read_for_argument_output(&self, output: &ArgumentOutput) -> Result<Option<ResponseLinking>> {
        self.link(&output.doc_id, output.responses()).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ScoredResponse;
    use crate::span::{CharOffsetSpan, KbpString};

    fn response(event_type: &str, filler: &str, realis: Realis) -> ScoredResponse {
        ScoredResponse::new(
            Response::new(
                "doc1",
                event_type,
                "Place",
                KbpString::new(filler, 0, 4),
                CharOffsetSpan::new(0, 4),
                realis,
            ),
            1.0,
        )
    }

    #[test]
    fn test_groups_by_event_type() {
        let output = ArgumentOutput::new(
            "doc1",
            vec![
                response("Conflict.Attack", "Gaza", Realis::Actual),
                response("Conflict.Attack", "Kabul", Realis::Other),
                response("Life.Die", "Gaza", Realis::Actual),
                response("Life.Die", "Kabul", Realis::Generic),
            ],
        );

        let linking = SameEventTypeLinker::default()
            .read_for_argument_output(&output)
            .unwrap()
            .unwrap();

        let sizes: Vec<usize> = linking.response_sets().iter().map(|s| s.len()).collect();
        assert_eq!(sizes, vec![2, 1]);
        assert_eq!(linking.incomplete().len(), 1);
        assert!(linking.check_against_argument_output(&output).is_ok());
    }
}
