use crate::error::Result;
use crate::graph::network::CapacityNetwork;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

impl CapacityNetwork {
    /// Dumps the graph in dot format, labelling every edge with its
    /// current residual capacity.
    pub fn to_dot(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "digraph G {{")?;
        for node in 0..self.num_nodes() {
            writeln!(out, "  {};", node)?;
        }
        for edge in self.edges() {
            writeln!(
                out,
                "  {} -> {} [label=\"{}\"];",
                edge.from().index(),
                edge.to().index(),
                edge.weight()
            )?;
        }
        writeln!(out, "}}")?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::graph::network::tests::example_edge_weights;

    #[test]
    fn test_to_dot() {
        let network = CapacityNetwork::from_weighted_edges(&example_edge_weights()).unwrap();
        let path = std::env::temp_dir().join("eprnet_to_dot_test.dot");
        network.to_dot(&path).unwrap();

        let dump = std::fs::read_to_string(&path).unwrap();
        assert!(dump.starts_with("digraph G {"));
        assert!(dump.contains("0 -> 1 [label=\"4\"];"));
        assert!(dump.contains("0 -> 4 [label=\"1\"];"));
        assert!(dump.trim_end().ends_with('}'));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_to_dot_surfaces_io_errors() {
        let network = CapacityNetwork::from_weighted_edges(&example_edge_weights()).unwrap();
        let path = std::env::temp_dir()
            .join("eprnet_missing_directory")
            .join("dump.dot");
        assert!(matches!(network.to_dot(&path), Err(Error::Io(_))));
    }
}
