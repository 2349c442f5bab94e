use crate::error::{Error, Result};
use crate::graph::network::CapacityNetwork;
use crate::random::RealVariate;
use crate::topology::coordinate::Coordinate;
use crate::topology::links::{bigraph_connected, find_links};
use crate::topology::poisson::PoissonPointProcessGrid;
use tracing::debug;

const MANY_TRIES: usize = 1_000_000;
/// stride between retry seeds, so every attempt reads a disjoint stream
/// segment
const SEED_STRIDE: u64 = 1_000_000;

/// Collaborator that parses a GraphML document into an undirected edge
/// list and the aligned node coordinates.
pub trait GraphMlReader {
    fn read(&mut self) -> Result<(Vec<(usize, usize)>, Vec<Coordinate>)>;
}

/// Builds a connected network from a Poisson point process on a square
/// grid of side `grid_length`: points within `threshold` of each other
/// are linked with probability `link_probability`, and every directed
/// edge gets an independent capacity draw from `variate`. Sampling
/// retries with a fresh Poisson seed until the link set is connected,
/// failing with `CouldNotConstruct` after 1,000,000 attempts.
pub fn make_network_ppp(
    variate: &mut dyn RealVariate,
    seed: u64,
    mu: f64,
    grid_length: f64,
    threshold: f64,
    link_probability: f64,
) -> Result<(CapacityNetwork, Vec<Coordinate>)> {
    let mut ppp_seed = seed;
    for _ in 0..MANY_TRIES {
        let mut grid = PoissonPointProcessGrid::new(mu, ppp_seed, grid_length, grid_length)?;
        let coordinates = grid.sample();
        let links = find_links(&coordinates, threshold, link_probability, seed);
        if bigraph_connected(&links) {
            let network = CapacityNetwork::from_edges(&links, variate, true)?;
            return Ok((network, coordinates));
        }
        debug!(seed = ppp_seed, "graph not connected, trying again");
        ppp_seed += SEED_STRIDE;
    }
    Err(Error::CouldNotConstruct(MANY_TRIES))
}

/// Builds a bidirectional network from a GraphML collaborator, drawing
/// edge capacities from `variate`. Fails with `NotConnected` if the
/// described topology is not a single component.
pub fn make_network_graphml(
    reader: &mut dyn GraphMlReader,
    variate: &mut dyn RealVariate,
) -> Result<(CapacityNetwork, Vec<Coordinate>)> {
    let (edges, coordinates) = reader.read()?;
    if !bigraph_connected(&edges) {
        return Err(Error::NotConnected);
    }
    let network = CapacityNetwork::from_edges(&edges, variate, true)?;
    Ok((network, coordinates))
}
