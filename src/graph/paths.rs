use crate::graph::edge::{EdgeId, NodeId};
use crate::graph::network::CapacityNetwork;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

/// Shortest directed hop count from `src` to every node, `None` where
/// unreachable. Edge weights play no role.
pub(crate) fn hop_distances(network: &CapacityNetwork, src: NodeId) -> Vec<Option<usize>> {
    let mut distances = vec![None; network.num_nodes()];
    distances[src.index()] = Some(0);
    let mut queue = VecDeque::from([(src, 0usize)]);
    while let Some((node, hops)) = queue.pop_front() {
        for &id in network.outgoing(node) {
            let next = network.edge_by_id(id).to();
            if distances[next.index()].is_none() {
                distances[next.index()] = Some(hops + 1);
                queue.push_back((next, hops + 1));
            }
        }
    }
    distances
}

struct Visit {
    cost: f64,
    node: NodeId,
}

impl PartialEq for Visit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Visit {}

impl PartialOrd for Visit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Visit {
    // reversed so the max-heap pops the cheapest frontier node first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.index().cmp(&self.node.index()))
    }
}

/// Dijkstra with edge cost `1 / residual capacity`, which steers flows
/// onto wide links. Edges below `min_rate` or flagged in `masked` never
/// enter the frontier, so zero-capacity residuals cannot produce an
/// infinite cost. Returns the edge sequence from `src` to `dst`.
pub(crate) fn min_rate_dijkstra(
    network: &CapacityNetwork,
    src: NodeId,
    dst: NodeId,
    min_rate: f64,
    masked: &[bool],
) -> Option<Vec<EdgeId>> {
    let mut best = vec![f64::INFINITY; network.num_nodes()];
    let mut parent: Vec<Option<EdgeId>> = vec![None; network.num_nodes()];
    best[src.index()] = 0.0;
    let mut frontier = BinaryHeap::new();
    frontier.push(Visit {
        cost: 0.0,
        node: src,
    });
    while let Some(Visit { cost, node }) = frontier.pop() {
        if cost > best[node.index()] {
            continue;
        }
        if node == dst {
            break;
        }
        for &id in network.outgoing(node) {
            if masked[id.index()] {
                continue;
            }
            let edge = network.edge_by_id(id);
            if edge.weight() < min_rate {
                continue;
            }
            let next_cost = cost + 1.0 / edge.weight();
            let to = edge.to();
            if next_cost < best[to.index()] {
                best[to.index()] = next_cost;
                parent[to.index()] = Some(id);
                frontier.push(Visit {
                    cost: next_cost,
                    node: to,
                });
            }
        }
    }
    backtrack(network, src, dst, &parent)
}

/// Breadth-first shortest hop path honouring transient edge and node
/// masks; used as the inner search of Yen's algorithm. Returns the edge
/// sequence from `src` to `dst`.
fn masked_bfs(
    network: &CapacityNetwork,
    src: NodeId,
    dst: NodeId,
    edge_mask: &[bool],
    node_mask: &[bool],
) -> Option<Vec<EdgeId>> {
    let mut parent: Vec<Option<EdgeId>> = vec![None; network.num_nodes()];
    let mut seen = vec![false; network.num_nodes()];
    seen[src.index()] = true;
    let mut queue = VecDeque::from([src]);
    while let Some(node) = queue.pop_front() {
        if node == dst {
            break;
        }
        for &id in network.outgoing(node) {
            if edge_mask[id.index()] {
                continue;
            }
            let to = network.edge_by_id(id).to();
            if seen[to.index()] || node_mask[to.index()] {
                continue;
            }
            seen[to.index()] = true;
            parent[to.index()] = Some(id);
            queue.push_back(to);
        }
    }
    backtrack(network, src, dst, &parent)
}

fn backtrack(
    network: &CapacityNetwork,
    src: NodeId,
    dst: NodeId,
    parent: &[Option<EdgeId>],
) -> Option<Vec<EdgeId>> {
    let mut path = Vec::new();
    let mut node = dst;
    while node != src {
        let id = parent[node.index()]?;
        path.push(id);
        node = network.edge_by_id(id).from();
    }
    path.reverse();
    Some(path)
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct RankedPath {
    hops: usize,
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
}

/// Yen's deviation-path enumeration of up to `k` loopless shortest paths
/// on the hop-count metric. Prefix edges of already-accepted paths are
/// excluded through a transient mask keyed by edge id; the graph itself
/// is never touched. Equal-length paths rank lexicographically by their
/// node sequence.
pub(crate) fn k_shortest_paths(
    network: &CapacityNetwork,
    src: NodeId,
    dst: NodeId,
    k: usize,
) -> Vec<Vec<EdgeId>> {
    let no_edges = vec![false; network.num_edges()];
    let no_nodes = vec![false; network.num_nodes()];
    let mut accepted: Vec<Vec<EdgeId>> = Vec::new();
    match masked_bfs(network, src, dst, &no_edges, &no_nodes) {
        Some(first) => accepted.push(first),
        None => return accepted,
    }
    let mut candidates: BinaryHeap<Reverse<RankedPath>> = BinaryHeap::new();

    while accepted.len() < k {
        let last = accepted[accepted.len() - 1].clone();
        let last_nodes = node_sequence(network, src, &last);
        for spur_idx in 0..last.len() {
            let spur_node = last_nodes[spur_idx];
            let root = &last[..spur_idx];

            let mut edge_mask = no_edges.clone();
            for path in &accepted {
                if path.len() > spur_idx && path[..spur_idx] == *root {
                    edge_mask[path[spur_idx].index()] = true;
                }
            }
            let mut node_mask = no_nodes.clone();
            for node in &last_nodes[..spur_idx] {
                node_mask[node.index()] = true;
            }

            if let Some(spur) = masked_bfs(network, spur_node, dst, &edge_mask, &node_mask) {
                let mut edges = root.to_vec();
                edges.extend(spur);
                if accepted.contains(&edges)
                    || candidates.iter().any(|Reverse(c)| c.edges == edges)
                {
                    continue;
                }
                let nodes = node_sequence(network, src, &edges);
                candidates.push(Reverse(RankedPath {
                    hops: edges.len(),
                    nodes,
                    edges,
                }));
            }
        }
        match candidates.pop() {
            Some(Reverse(best)) => accepted.push(best.edges),
            None => break,
        }
    }
    accepted
}

/// Full node sequence `[src, ..., dst]` of an edge path.
pub(crate) fn node_sequence(
    network: &CapacityNetwork,
    src: NodeId,
    edges: &[EdgeId],
) -> Vec<NodeId> {
    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(src);
    nodes.extend(edges.iter().map(|id| network.edge_by_id(*id).to()));
    nodes
}

/// Minimum residual capacity along an edge path.
pub(crate) fn bottleneck(network: &CapacityNetwork, edges: &[EdgeId]) -> f64 {
    edges
        .iter()
        .map(|id| network.edge_by_id(*id).weight())
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::network::tests::{another_example_edge_weights, example_edge_weights};

    fn hops(network: &CapacityNetwork, src: NodeId, edges: &[EdgeId]) -> Vec<usize> {
        node_sequence(network, src, edges)
            .iter()
            .skip(1)
            .map(|n| n.index())
            .collect()
    }

    #[test]
    fn test_hop_distances() {
        let network =
            CapacityNetwork::from_weighted_edges(&another_example_edge_weights()).unwrap();
        let distances = hop_distances(&network, NodeId(0));
        assert_eq!(
            vec![
                Some(0),
                Some(1),
                Some(1),
                Some(2),
                Some(3),
                Some(3),
                Some(4)
            ],
            distances
        );
        let from_sink = hop_distances(&network, NodeId(6));
        assert!(from_sink.iter().skip(1).take(5).all(|d| d.is_none()));
    }

    #[test]
    fn test_dijkstra_prefers_wide_paths() {
        let network = CapacityNetwork::from_weighted_edges(&example_edge_weights()).unwrap();
        let masked = vec![false; network.num_edges()];

        // 1/4 + 1/4 + 1/4 via 1-2 beats 1/1 + 1/4 via 4
        let path = min_rate_dijkstra(&network, NodeId(0), NodeId(3), 1.0, &masked).unwrap();
        assert_eq!(vec![1, 2, 3], hops(&network, NodeId(0), &path));

        // no directed path back
        assert!(min_rate_dijkstra(&network, NodeId(3), NodeId(0), 1.0, &masked).is_none());

        // minimum-rate filter drops the 0->4 edge
        let path = min_rate_dijkstra(&network, NodeId(0), NodeId(4), 0.5, &masked).unwrap();
        assert_eq!(vec![4], hops(&network, NodeId(0), &path));
        assert!(min_rate_dijkstra(&network, NodeId(0), NodeId(4), 2.0, &masked).is_none());
    }

    #[test]
    fn test_dijkstra_honours_mask() {
        let network = CapacityNetwork::from_weighted_edges(&example_edge_weights()).unwrap();
        let mut masked = vec![false; network.num_edges()];
        masked[0] = true; // 0->1
        let path = min_rate_dijkstra(&network, NodeId(0), NodeId(3), 1.0, &masked).unwrap();
        assert_eq!(vec![4, 3], hops(&network, NodeId(0), &path));
    }

    #[test]
    fn test_k_shortest_paths() {
        let network = CapacityNetwork::from_weighted_edges(&example_edge_weights()).unwrap();
        let paths = k_shortest_paths(&network, NodeId(0), NodeId(3), 99);
        assert_eq!(2, paths.len());
        assert_eq!(vec![4, 3], hops(&network, NodeId(0), &paths[0]));
        assert_eq!(vec![1, 2, 3], hops(&network, NodeId(0), &paths[1]));

        let only_first = k_shortest_paths(&network, NodeId(0), NodeId(3), 1);
        assert_eq!(1, only_first.len());
        assert_eq!(vec![4, 3], hops(&network, NodeId(0), &only_first[0]));

        assert!(k_shortest_paths(&network, NodeId(3), NodeId(0), 99).is_empty());
    }

    #[test]
    fn test_k_shortest_paths_rich_graph() {
        let network =
            CapacityNetwork::from_weighted_edges(&another_example_edge_weights()).unwrap();
        let paths = k_shortest_paths(&network, NodeId(0), NodeId(6), 99);
        // 0-{1,2}-3-{4,5}-6 gives four loopless routes
        assert_eq!(4, paths.len());
        assert_eq!(vec![1, 3, 4, 6], hops(&network, NodeId(0), &paths[0]));
        assert!(paths.iter().all(|p| p.len() == 4));
        let distinct: std::collections::BTreeSet<Vec<NodeId>> = paths
            .iter()
            .map(|p| node_sequence(&network, NodeId(0), p))
            .collect();
        assert_eq!(4, distinct.len());
    }
}
