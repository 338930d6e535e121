//! Turn restrictions: forbidden (from way, via node, to way) combinations

use std::collections::BTreeSet;

use hashbrown::{HashMap, HashSet};

use crate::{NodeId, WayId};

/// Entering `via` along any of `from_ways` and then leaving along any of
/// `to_ways` is forbidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    pub via: NodeId,
    pub from_ways: BTreeSet<WayId>,
    pub to_ways: BTreeSet<WayId>,
}

impl Restriction {
    pub fn new(
        via: NodeId,
        from_ways: impl IntoIterator<Item = WayId>,
        to_ways: impl IntoIterator<Item = WayId>,
    ) -> Self {
        Self {
            via,
            from_ways: from_ways.into_iter().collect(),
            to_ways: to_ways.into_iter().collect(),
        }
    }

    /// True if a turn from an edge on `from` onto an edge on `to` matches.
    pub fn forbids(&self, from: &BTreeSet<WayId>, to: &BTreeSet<WayId>) -> bool {
        !self.from_ways.is_disjoint(from) && !self.to_ways.is_disjoint(to)
    }
}

/// All turn restrictions within a query area, indexed by via node.
///
/// Several restrictions may share a via node; they are all kept.
#[derive(Debug, Clone, Default)]
pub struct RestrictionSet {
    restricted_nodes: HashSet<NodeId>,
    restrictions: Vec<Restriction>,
    by_via: HashMap<NodeId, Vec<usize>>,
}

impl RestrictionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, restriction: Restriction) {
        self.restricted_nodes.insert(restriction.via);
        self.by_via
            .entry(restriction.via)
            .or_default()
            .push(self.restrictions.len());
        self.restrictions.push(restriction);
    }

    pub fn extend(&mut self, other: RestrictionSet) {
        for restriction in other.restrictions {
            self.push(restriction);
        }
    }

    pub fn len(&self) -> usize {
        self.restrictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restrictions.is_empty()
    }

    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    pub fn restricted_nodes(&self) -> &HashSet<NodeId> {
        &self.restricted_nodes
    }

    pub fn is_restricted_node(&self, node: NodeId) -> bool {
        self.restricted_nodes.contains(&node)
    }

    /// True if any restriction at `via` forbids turning from `from` to `to`.
    pub fn forbids(&self, via: NodeId, from: &BTreeSet<WayId>, to: &BTreeSet<WayId>) -> bool {
        self.by_via.get(&via).is_some_and(|indices| {
            indices
                .iter()
                .any(|&index| self.restrictions[index].forbids(from, to))
        })
    }
}

impl FromIterator<Restriction> for RestrictionSet {
    fn from_iter<I: IntoIterator<Item = Restriction>>(iter: I) -> Self {
        let mut set = RestrictionSet::new();
        for restriction in iter {
            set.push(restriction);
        }
        set
    }
}
