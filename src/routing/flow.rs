use crate::error::{Error, Result};
use crate::graph::edge::NodeId;
use crate::graph::network::CapacityNetwork;
use crate::graph::paths;
use tracing::debug;

/// A point-to-point demand: the caller fills src, dst and the minimum
/// acceptable gross EPR rate; routing fills the outputs.
pub struct FlowDescriptor {
    src: NodeId,
    dst: NodeId,
    min_gross_rate: f64,
    path: Vec<NodeId>,
    gross_rate: f64,
    dijkstra_calls: usize,
}

impl FlowDescriptor {
    pub fn new(src: NodeId, dst: NodeId, min_gross_rate: f64) -> Self {
        Self {
            src,
            dst,
            min_gross_rate,
            path: Vec::new(),
            gross_rate: 0.0,
            dijkstra_calls: 0,
        }
    }

    pub fn src(&self) -> NodeId {
        self.src
    }

    pub fn dst(&self) -> NodeId {
        self.dst
    }

    pub fn min_gross_rate(&self) -> f64 {
        self.min_gross_rate
    }

    /// Hop sequence of the admitted path, src excluded; empty when the
    /// flow could not be routed.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub fn gross_rate(&self) -> f64 {
        self.gross_rate
    }

    /// Number of shortest-path searches the routing call had performed
    /// once this flow was settled. The count runs across the flows of a
    /// single call and resets between calls.
    pub fn dijkstra_calls(&self) -> usize {
        self.dijkstra_calls
    }
}

impl CapacityNetwork {
    /// Admits flows one by one along capacity-aware shortest paths,
    /// allocating each the bottleneck rate of its path. See
    /// [`route_flows_with`](Self::route_flows_with) for the variant with
    /// an admission predicate.
    pub fn route_flows(&mut self, flows: &mut [FlowDescriptor]) -> Result<()> {
        self.route_flows_with(flows, |_| true)
    }

    /// Routes flows in order. Every descriptor is validated before any
    /// capacity moves; a single invalid flow fails the whole call with
    /// the network untouched. Per flow: Dijkstra over reciprocal residual
    /// capacity (edges below the flow's minimum rate excluded) proposes a
    /// candidate path; `admit` sees the flow carrying that path and its
    /// bottleneck rate, and a rejection masks the bottleneck edge and
    /// retries until admission or until no path remains. Unroutable
    /// flows keep an empty path; that is an outcome, not an error.
    pub fn route_flows_with<F>(&mut self, flows: &mut [FlowDescriptor], admit: F) -> Result<()>
    where
        F: Fn(&FlowDescriptor) -> bool,
    {
        for flow in flows.iter() {
            self.check_flow(flow)?;
        }
        let mut searches = 0;
        for flow in flows.iter_mut() {
            let mut masked = vec![false; self.num_edges()];
            loop {
                searches += 1;
                let found = paths::min_rate_dijkstra(
                    self,
                    flow.src,
                    flow.dst,
                    flow.min_gross_rate,
                    &masked,
                );
                match found {
                    None => {
                        flow.path.clear();
                        flow.gross_rate = 0.0;
                        break;
                    }
                    Some(edge_path) => {
                        let rate = paths::bottleneck(self, &edge_path);
                        flow.path = paths::node_sequence(self, flow.src, &edge_path)
                            .split_off(1);
                        flow.gross_rate = rate;
                        if admit(flow) {
                            self.subtract_along(&edge_path, rate);
                            break;
                        }
                        let narrowest = edge_path
                            .iter()
                            .copied()
                            .find(|id| self.edge_by_id(*id).weight() == rate);
                        match narrowest {
                            Some(id) => masked[id.index()] = true,
                            None => break,
                        }
                    }
                }
            }
            flow.dijkstra_calls = searches;
            debug!(
                src = flow.src.index(),
                dst = flow.dst.index(),
                hops = flow.path.len(),
                gross_rate = flow.gross_rate,
                "flow settled"
            );
        }
        Ok(())
    }

    fn check_flow(&self, flow: &FlowDescriptor) -> Result<()> {
        self.check_node(flow.src)?;
        self.check_node(flow.dst)?;
        if flow.src == flow.dst {
            return Err(Error::InvalidArgument(format!(
                "flow source and destination coincide on node {}",
                flow.src.index()
            )));
        }
        if !flow.min_gross_rate.is_finite() || flow.min_gross_rate <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "flow minimum gross rate {} is not positive",
                flow.min_gross_rate
            )));
        }
        Ok(())
    }
}
