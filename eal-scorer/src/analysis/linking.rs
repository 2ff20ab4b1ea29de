//! B-cubed scoring of event linking
//!
//! Items are compared through the clusters they sit in. For an item `i`,
//! `S(i)` is the union of all system clusters containing `i` (plus `i`
//! itself) and `R(i)` the same over reference clusters.
//!
//! - precision averages `|S(i) ∩ R(i)| / |S(i)|` over system items
//! - recall averages `|S(i) ∩ R(i)| / |R(i)|` over reference items, counting 0
//!   for reference items the system never produced

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Precision, recall and F1 of a linking, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkingScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl LinkingScore {
    pub fn new(precision: f64, recall: f64) -> Self {
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self { precision, recall, f1 }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

fn linked_set<'a, T: Ord>(clusters: &'a [BTreeSet<T>], item: &'a T) -> BTreeSet<&'a T> {
    let mut linked: BTreeSet<&T> = clusters
        .iter()
        .filter(|cluster| cluster.contains(item))
        .flat_map(|cluster| cluster.iter())
        .collect();
    linked.insert(item);
    linked
}

/// B-cubed score of `system_clusters` against `reference_clusters`.
///
/// The reference items are every item of a reference cluster. System items
/// are `system_items`; those not in any system cluster act as singletons.
pub fn b_cubed<T: Ord>(
    reference_clusters: &[BTreeSet<T>],
    system_clusters: &[BTreeSet<T>],
    system_items: &BTreeSet<T>,
) -> LinkingScore {
    let reference_items: BTreeSet<&T> = reference_clusters.iter().flatten().collect();

    let mut precision_sum = 0.0;
    for item in system_items {
        let system = linked_set(system_clusters, item);
        let reference = linked_set(reference_clusters, item);
        let overlap = system.intersection(&reference).count();
        precision_sum += overlap as f64 / system.len() as f64;
    }

    let mut recall_sum = 0.0;
    for &item in &reference_items {
        if !system_items.contains(item) {
            continue;
        }
        let system = linked_set(system_clusters, item);
        let reference = linked_set(reference_clusters, item);
        let overlap = system.intersection(&reference).count();
        recall_sum += overlap as f64 / reference.len() as f64;
    }

    let precision = if system_items.is_empty() {
        0.0
    } else {
        precision_sum / system_items.len() as f64
    };
    let recall = if reference_items.is_empty() {
        0.0
    } else {
        recall_sum / reference_items.len() as f64
    };
    LinkingScore::new(precision, recall)
}
