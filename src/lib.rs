pub mod error;
pub mod export;
pub mod graph;
pub mod random;
pub mod routing;
pub mod topology;

pub use error::{Error, Result};
pub use graph::edge::{Edge, EdgeId, NodeId};
pub use graph::network::CapacityNetwork;
pub use random::{RealVariate, UniformVariate};
pub use routing::app::{AllocatedPath, AppDescriptor, CandidatePath};
pub use routing::flow::FlowDescriptor;
pub use topology::coordinate::Coordinate;
pub use topology::factory::{make_network_graphml, make_network_ppp, GraphMlReader};
pub use topology::links::{bigraph_connected, find_links};
pub use topology::poisson::PoissonPointProcessGrid;
