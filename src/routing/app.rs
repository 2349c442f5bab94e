use crate::error::{Error, Result};
use crate::graph::edge::{EdgeId, NodeId};
use crate::graph::network::CapacityNetwork;
use crate::graph::paths;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::debug;

/// One path serving a target, with the gross rate packed onto it and the
/// end-to-end rate left after the per-swap success factor.
pub struct AllocatedPath {
    hops: Vec<NodeId>,
    gross_rate: f64,
    net_rate: f64,
}

impl AllocatedPath {
    /// Hop sequence, source excluded.
    pub fn hops(&self) -> &[NodeId] {
        &self.hops
    }

    pub fn gross_rate(&self) -> f64 {
        self.gross_rate
    }

    pub fn net_rate(&self) -> f64 {
        self.net_rate
    }
}

/// A candidate path still competing for capacity during a routing call.
pub struct CandidatePath {
    target: NodeId,
    hops: Vec<NodeId>,
    pub(crate) edges: Vec<EdgeId>,
}

impl CandidatePath {
    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn hops(&self) -> &[NodeId] {
        &self.hops
    }
}

/// A multi-destination application demand: one source, a set of target
/// nodes and a weight steering its share of the contended capacity.
pub struct AppDescriptor {
    src: NodeId,
    targets: BTreeSet<NodeId>,
    priority: f64,
    allocated: BTreeMap<NodeId, Vec<AllocatedPath>>,
    remaining_paths: Vec<CandidatePath>,
    visits: usize,
}

impl AppDescriptor {
    pub fn new(src: NodeId, targets: &[NodeId], priority: f64) -> Self {
        Self {
            src,
            targets: targets.iter().copied().collect(),
            priority,
            allocated: BTreeMap::new(),
            remaining_paths: Vec::new(),
            visits: 0,
        }
    }

    pub fn src(&self) -> NodeId {
        self.src
    }

    pub fn targets(&self) -> &BTreeSet<NodeId> {
        &self.targets
    }

    pub fn priority(&self) -> f64 {
        self.priority
    }

    /// Paths allocated so far, keyed by target.
    pub fn allocated(&self) -> &BTreeMap<NodeId, Vec<AllocatedPath>> {
        &self.allocated
    }

    /// Candidate paths not yet drained; empty once routing has finished.
    pub fn remaining_paths(&self) -> &[CandidatePath] {
        &self.remaining_paths
    }

    /// Packing iterations spent on this app.
    pub fn visits(&self) -> usize {
        self.visits
    }

    pub fn gross_rate(&self) -> f64 {
        self.allocated
            .values()
            .flatten()
            .map(|path| path.gross_rate)
            .sum()
    }

    pub fn net_rate(&self) -> f64 {
        self.allocated
            .values()
            .flatten()
            .map(|path| path.net_rate)
            .sum()
    }
}

impl CapacityNetwork {
    /// Routes multi-destination apps by k-shortest-path enumeration and
    /// round-robin packing.
    ///
    /// Candidates: for every (app, target) pair, up to `k` loopless
    /// shortest paths on the hop-count graph, discarding any longer than
    /// `ceil(path_length_factor * shortest)` hops. Packing then rotates
    /// over the apps in input order; each turn is one visit, in which the
    /// app takes its widest candidate (ties: fewer hops, then
    /// lexicographic) and packs onto it at most its fair quantum,
    /// `path_length_factor * priority / total priority`. A visit whose
    /// best candidate has no feasible rate left discards that candidate;
    /// an app leaves the rotation once no candidates remain.
    ///
    /// Validation covers every descriptor before any capacity moves.
    /// Apps whose targets are unreachable simply end up with nothing
    /// allocated.
    pub fn route_apps(
        &mut self,
        apps: &mut [AppDescriptor],
        path_length_factor: f64,
        k: usize,
    ) -> Result<()> {
        if !path_length_factor.is_finite() || path_length_factor < 1.0 {
            return Err(Error::InvalidArgument(format!(
                "path length factor {} must be at least 1",
                path_length_factor
            )));
        }
        if k < 1 {
            return Err(Error::InvalidArgument(
                "number of shortest paths must be at least 1".to_string(),
            ));
        }
        for app in apps.iter() {
            self.check_app(app)?;
        }

        for app in apps.iter_mut() {
            app.allocated.clear();
            app.remaining_paths.clear();
            app.visits = 0;
            for &target in &app.targets {
                let enumerated = paths::k_shortest_paths(self, app.src, target, k);
                let longest = match enumerated.first() {
                    Some(shortest) => {
                        (path_length_factor * shortest.len() as f64).ceil() as usize
                    }
                    None => continue,
                };
                for edges in enumerated {
                    if edges.len() > longest {
                        continue;
                    }
                    let hops = paths::node_sequence(self, app.src, &edges).split_off(1);
                    app.remaining_paths.push(CandidatePath {
                        target,
                        hops,
                        edges,
                    });
                }
            }
        }

        let total_priority: f64 = apps.iter().map(|app| app.priority).sum();
        let mut rotation: VecDeque<usize> = (0..apps.len())
            .filter(|i| !apps[*i].remaining_paths.is_empty())
            .collect();
        while let Some(i) = rotation.pop_front() {
            let app = &mut apps[i];
            app.visits += 1;

            let mut best: Option<(usize, f64)> = None;
            for (idx, candidate) in app.remaining_paths.iter().enumerate() {
                let rate = paths::bottleneck(self, &candidate.edges);
                let better = match best {
                    None => true,
                    Some((best_idx, best_rate)) => {
                        let incumbent = &app.remaining_paths[best_idx];
                        rate > best_rate
                            || (rate == best_rate
                                && (candidate.hops.len() < incumbent.hops.len()
                                    || (candidate.hops.len() == incumbent.hops.len()
                                        && candidate.hops < incumbent.hops)))
                    }
                };
                if better {
                    best = Some((idx, rate));
                }
            }
            let (idx, rate) = match best {
                Some(found) => found,
                None => continue,
            };

            if rate > 0.0 {
                let quantum = path_length_factor * app.priority / total_priority;
                let allocation = quantum.min(rate);
                let (target, hops, edges) = {
                    let candidate = &app.remaining_paths[idx];
                    (candidate.target, candidate.hops.clone(), candidate.edges.clone())
                };
                let net = allocation
                    * self
                        .measurement_probability()
                        .powi(hops.len() as i32 - 1);
                self.subtract_along(&edges, allocation);
                let records = app.allocated.entry(target).or_default();
                match records.iter_mut().find(|record| record.hops == hops) {
                    Some(record) => {
                        record.gross_rate += allocation;
                        record.net_rate += net;
                    }
                    None => records.push(AllocatedPath {
                        hops,
                        gross_rate: allocation,
                        net_rate: net,
                    }),
                }
                rotation.push_back(i);
            } else {
                app.remaining_paths.remove(idx);
                if app.remaining_paths.is_empty() {
                    debug!(
                        src = app.src.index(),
                        visits = app.visits,
                        gross_rate = app.gross_rate(),
                        "app settled"
                    );
                } else {
                    rotation.push_back(i);
                }
            }
        }
        Ok(())
    }

    fn check_app(&self, app: &AppDescriptor) -> Result<()> {
        self.check_node(app.src)?;
        if app.targets.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "app hosted on node {} has no targets",
                app.src.index()
            )));
        }
        for &target in &app.targets {
            self.check_node(target)?;
            if target == app.src {
                return Err(Error::InvalidArgument(format!(
                    "app target coincides with its host on node {}",
                    target.index()
                )));
            }
        }
        if !app.priority.is_finite() || app.priority <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "app priority {} is not positive",
                app.priority
            )));
        }
        Ok(())
    }
}
