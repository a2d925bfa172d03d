//! Pleiotropy detection over resolved leaf positions.

use hiview_core::{LeafKey, LeafPositions};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Genes that occur under two or more distinct base groups.
pub type PleioSet = BTreeSet<String>;

/// Flags every gene whose occurrences in `positions` span at least two base
/// groups. Always recomputed from the full map.
pub fn detect_pleiotropy(positions: &LeafPositions) -> PleioSet {
    let mut groups_by_gene: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (key, position) in positions {
        groups_by_gene
            .entry(key.gene.as_str())
            .or_default()
            .insert(position.base.as_str());
    }
    let pleio: PleioSet = groups_by_gene
        .into_iter()
        .filter(|(_, bases)| bases.len() > 1)
        .map(|(gene, _)| gene.to_string())
        .collect();
    debug!(
        leaves = positions.len(),
        pleiotropic = pleio.len(),
        "Detected pleiotropic genes"
    );
    pleio
}

/// Number of distinct enclosing groups each gene appears under.
pub fn occurrence_counts(positions: &LeafPositions) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for LeafKey { gene, .. } in positions.keys() {
        *counts.entry(gene.clone()).or_default() += 1;
    }
    counts
}
