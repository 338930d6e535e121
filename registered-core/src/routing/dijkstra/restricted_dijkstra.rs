use std::collections::BinaryHeap;

use hashbrown::HashMap;
use log::trace;
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::EdgeRef;

use super::state::{SearchKey, State};
use crate::NodeId;
use crate::model::{StreetEdge, StreetGraph, Weight};

/// A movement through `via`: arriving from `origin` along `from`, then
/// leaving towards `dest` along `to`.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    pub origin: NodeId,
    pub via: NodeId,
    pub dest: NodeId,
    pub from: &'a StreetEdge,
    pub to: &'a StreetEdge,
}

/// Dijkstra's algorithm where each step may be forbidden depending on the
/// edge the current node was entered by.
///
/// The search runs over (node, incoming edge) pairs, so a node reached by
/// two different edges is expanded once for each. Returns the total cost
/// and the nodes of the cheapest allowed path, or `None` if `target` cannot
/// be reached.
pub fn restricted_dijkstra<F>(
    graph: &StreetGraph,
    start: NodeIndex,
    target: NodeIndex,
    weight: Weight,
    restricted: F,
) -> Option<(f64, Vec<NodeIndex>)>
where
    F: Fn(&Turn<'_>) -> bool,
{
    if start == target {
        return Some((0.0, vec![start]));
    }

    let estimated_states = graph.edge_count().min(1000);
    let mut costs: HashMap<SearchKey, f64> = HashMap::with_capacity(estimated_states);
    let mut predecessors: HashMap<SearchKey, SearchKey> = HashMap::with_capacity(estimated_states);
    let mut heap = BinaryHeap::with_capacity(estimated_states / 4);

    let start_key = (start, None);
    heap.push(State {
        cost: 0.0,
        key: start_key,
    });
    costs.insert(start_key, 0.0);

    while let Some(State { cost, key }) = heap.pop() {
        let (node, incoming) = key;
        if node == target {
            return Some((cost, reconstruct(&predecessors, key)));
        }

        // Skip if we've found a better path
        if costs.get(&key).is_some_and(|&best| cost > best) {
            continue;
        }

        let via = graph.graph[node].id;
        let arrival = incoming.and_then(|edge| {
            let (origin, _) = graph.graph.edge_endpoints(edge)?;
            Some((graph.graph[origin].id, &graph.graph[edge]))
        });

        for edge in graph.graph.edges(node) {
            let next = edge.target();
            if let Some((origin, from)) = arrival {
                let turn = Turn {
                    origin,
                    via,
                    dest: graph.graph[next].id,
                    from,
                    to: edge.weight(),
                };
                if restricted(&turn) {
                    trace!("restricted turn {origin} -> {via} -> {}", turn.dest);
                    continue;
                }
            }

            let next_cost = cost + edge.weight().cost(weight);
            let next_key = (next, Some(edge.id()));

            match costs.entry(next_key) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost >= *entry.get() {
                        continue;
                    }
                    *entry.get_mut() = next_cost;
                }
            }
            predecessors.insert(next_key, key);
            heap.push(State {
                cost: next_cost,
                key: next_key,
            });
        }
    }

    None
}

fn reconstruct(predecessors: &HashMap<SearchKey, SearchKey>, end: SearchKey) -> Vec<NodeIndex> {
    let mut path = vec![end.0];
    let mut current = end;
    while let Some(&previous) = predecessors.get(&current) {
        path.push(previous.0);
        current = previous;
    }
    path.reverse();
    path
}
