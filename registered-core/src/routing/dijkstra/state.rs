use std::cmp::Ordering;

use petgraph::stable_graph::{EdgeIndex, NodeIndex};

/// A node together with the edge it was entered by. The start of a search
/// has no incoming edge.
pub(crate) type SearchKey = (NodeIndex, Option<EdgeIndex>);

#[derive(Copy, Clone, Debug)]
pub(super) struct State {
    pub(super) cost: f64,
    pub(super) key: SearchKey,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap), ties
        // broken by key so the search order is deterministic
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.key.cmp(&self.key))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
