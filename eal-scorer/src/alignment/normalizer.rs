//! Entity normalization from annotator coreference

use kbp_events::{AnswerKey, KbpString};
use std::collections::BTreeMap;

/// Maps each coreferent filler mention to one canonical mention.
///
/// Annotators may mark "Louisville" and "The Cards" as the same entity; both
/// then normalize to the same canonical mention so their responses fall into
/// the same equivalence class. Mentions outside any cluster map to themselves.
/// A mention listed in several clusters takes the smallest of their
/// representatives, whatever the cluster ids.
#[derive(Debug, Clone, Default)]
pub struct EntityNormalizer {
    canonical: BTreeMap<KbpString, KbpString>,
}

impl EntityNormalizer {
    pub fn from_answer_key(key: &AnswerKey) -> Self {
        let mut canonical: BTreeMap<KbpString, KbpString> = BTreeMap::new();
        for members in key.coref.clusters.values() {
            // smallest member represents the cluster
            if let Some(representative) = members.iter().next() {
                for mention in members {
                    canonical
                        .entry(mention.clone())
                        .and_modify(|current| {
                            if representative < current {
                                *current = representative.clone();
                            }
                        })
                        .or_insert_with(|| representative.clone());
                }
            }
        }
        Self { canonical }
    }

    pub fn normalize(&self, mention: &KbpString) -> KbpString {
        self.canonical
            .get(mention)
            .cloned()
            .unwrap_or_else(|| mention.clone())
    }
}
