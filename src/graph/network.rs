use crate::error::{Error, Result};
use crate::graph::edge::{Edge, EdgeId, NodeId};
use crate::graph::paths;
use crate::random::RealVariate;
use std::collections::BTreeSet;

/// Directed weighted multigraph of quantum repeaters. Nodes are dense
/// indices `0..num_nodes`; each edge carries the residual EPR-pair
/// generation rate still available on that directed link, the only
/// per-edge state that routing mutates.
pub struct CapacityNetwork {
    edges: Vec<Edge>,
    adj: Vec<Vec<EdgeId>>,
    /// success probability of a single entanglement swap, in [0.0, 1.0]
    measurement_probability: f64,
}

impl CapacityNetwork {
    /// Builds a network from an unweighted edge list, drawing one
    /// independent weight per directed edge. A bidirectional build adds
    /// both directions of every input edge, each with its own draw.
    pub fn from_edges(
        edges: &[(usize, usize)],
        variate: &mut dyn RealVariate,
        bidirectional: bool,
    ) -> Result<Self> {
        let mut weighted = Vec::with_capacity(edges.len() * if bidirectional { 2 } else { 1 });
        for &(u, v) in edges {
            weighted.push((u, v, variate.sample()));
            if bidirectional {
                weighted.push((v, u, variate.sample()));
            }
        }
        Self::from_weighted_edges(&weighted)
    }

    /// Builds a network from explicit `(from, to, weight)` triples, used
    /// verbatim. Parallel edges are kept as distinct capacity channels.
    pub fn from_weighted_edges(edges: &[(usize, usize, f64)]) -> Result<Self> {
        let num_nodes = edges
            .iter()
            .map(|&(u, v, _)| u.max(v) + 1)
            .max()
            .unwrap_or(0);
        let mut arena = Vec::with_capacity(edges.len());
        let mut adj: Vec<Vec<EdgeId>> = vec![Vec::new(); num_nodes];
        for &(u, v, w) in edges {
            if u == v {
                return Err(Error::InvalidArgument(format!("self-loop on node {}", u)));
            }
            if !w.is_finite() || w < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "weight {} on edge ({},{}) is not a finite non-negative number",
                    w, u, v
                )));
            }
            let id = EdgeId(arena.len());
            arena.push(Edge::new(id, NodeId(u), NodeId(v), w));
            adj[u].push(id);
        }
        Ok(Self {
            edges: arena,
            adj,
            measurement_probability: 1.0,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.adj.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn total_capacity(&self) -> f64 {
        self.edges.iter().map(|e| e.weight()).sum()
    }

    /// Weights as `(from, to, weight)` triples, in insertion order.
    pub fn weights(&self) -> Vec<(usize, usize, f64)> {
        self.edges
            .iter()
            .map(|e| (e.from().index(), e.to().index(), e.weight()))
            .collect()
    }

    /// Minimum and maximum in-degree across all nodes.
    pub fn in_degree(&self) -> (usize, usize) {
        let mut counts = vec![0usize; self.num_nodes()];
        self.edges.iter().for_each(|e| counts[e.to().index()] += 1);
        min_max(&counts)
    }

    /// Minimum and maximum out-degree across all nodes.
    pub fn out_degree(&self) -> (usize, usize) {
        let counts = self.adj.iter().map(|a| a.len()).collect::<Vec<usize>>();
        min_max(&counts)
    }

    /// Per-node sum of outgoing residual capacities.
    pub fn node_capacities(&self) -> Vec<f64> {
        self.adj
            .iter()
            .map(|out| out.iter().map(|id| self.edge_by_id(*id).weight()).sum())
            .collect()
    }

    pub fn measurement_probability(&self) -> f64 {
        self.measurement_probability
    }

    pub fn set_measurement_probability(&mut self, probability: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::InvalidArgument(format!(
                "measurement probability {} outside [0, 1]",
                probability
            )));
        }
        self.measurement_probability = probability;
        Ok(())
    }

    /// For every source, the set of other nodes whose shortest directed
    /// hop count lies in `[min_hops, max_hops]`, plus the diameter (the
    /// largest finite hop count over all ordered pairs, regardless of the
    /// bounds). Weights play no role here.
    pub fn reachable_nodes(
        &self,
        min_hops: usize,
        max_hops: usize,
    ) -> (Vec<BTreeSet<NodeId>>, usize) {
        let mut diameter = 0;
        let reachable = (0..self.num_nodes())
            .map(|u| {
                let distances = paths::hop_distances(self, NodeId(u));
                distances
                    .iter()
                    .enumerate()
                    .filter(|(v, _)| *v != u)
                    .filter_map(|(v, d)| d.map(|hops| (v, hops)))
                    .inspect(|&(_, hops)| diameter = diameter.max(hops))
                    .filter(|&(_, hops)| hops >= min_hops && hops <= max_hops)
                    .map(|(v, _)| NodeId(v))
                    .collect()
            })
            .collect();
        (reachable, diameter)
    }

    /// Adds `delta` (possibly negative) to every edge along the walk
    /// `src -> hops[0] -> hops[1] -> ...`. The whole walk is checked
    /// before anything changes: a missing edge or a weight that would go
    /// negative fails the call with the network untouched.
    pub fn add_capacity_to_path(&mut self, src: NodeId, hops: &[NodeId], delta: f64) -> Result<()> {
        self.check_node(src)?;
        for hop in hops {
            self.check_node(*hop)?;
        }
        let mut touched = Vec::with_capacity(hops.len());
        let mut prev = src;
        for &hop in hops {
            let id = self.find_edge(prev, hop).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "no edge between nodes {} and {}",
                    prev.index(),
                    hop.index()
                ))
            })?;
            let updated = self.edge_by_id(id).weight() + delta;
            if !updated.is_finite() || updated < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "adding {} to edge ({},{}) would leave weight {}",
                    delta,
                    prev.index(),
                    hop.index(),
                    updated
                )));
            }
            touched.push((id, updated));
            prev = hop;
        }
        for (id, updated) in touched {
            self.edges[id.index()].set_weight(updated);
        }
        Ok(())
    }

    pub fn edge_by_id(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn outgoing(&self, node: NodeId) -> &[EdgeId] {
        &self.adj[node.index()]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// First arena entry for the directed edge `from -> to`, if any.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.adj[from.index()]
            .iter()
            .copied()
            .find(|id| self.edge_by_id(*id).to() == to)
    }

    pub(crate) fn check_node(&self, node: NodeId) -> Result<()> {
        if node.index() >= self.num_nodes() {
            return Err(Error::InvalidArgument(format!(
                "node index {} out of range ({} nodes)",
                node.index(),
                self.num_nodes()
            )));
        }
        Ok(())
    }

    pub(crate) fn subtract_along(&mut self, edge_ids: &[EdgeId], rate: f64) {
        for id in edge_ids {
            let remaining = self.edge_by_id(*id).weight() - rate;
            self.edges[id.index()].set_weight(remaining.max(0.0));
        }
    }
}

fn min_max(counts: &[usize]) -> (usize, usize) {
    if counts.is_empty() {
        return (0, 0);
    }
    counts
        .iter()
        .fold((usize::MAX, 0), |(lo, hi), &c| (lo.min(c), hi.max(c)))
}
