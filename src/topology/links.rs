use crate::topology::coordinate::Coordinate;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Candidate repeater links: every unordered pair of points within
/// `threshold` of each other is retained with independent probability
/// `probability`. The retention coin is tossed only for qualifying
/// pairs, so a given seed yields the same links regardless of how many
/// out-of-range points surround them.
pub fn find_links(
    points: &[Coordinate],
    threshold: f64,
    probability: f64,
    seed: u64,
) -> Vec<(usize, usize)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut links = Vec::new();
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            if points[i].distance(&points[j]) <= threshold
                && rng.gen_range(0.0..1.0) < probability
            {
                links.push((i, j));
            }
        }
    }
    links
}

/// Whether the undirected projection of the edge list forms a single
/// connected component over the vertices `0..=max_index`. An interior
/// vertex mentioned by no edge counts as its own component; indices
/// beyond the largest endpoint do not exist.
pub fn bigraph_connected(edges: &[(usize, usize)]) -> bool {
    let num_nodes = match edges.iter().map(|&(u, v)| u.max(v) + 1).max() {
        Some(n) => n,
        None => return false,
    };
    let mut parent: Vec<usize> = (0..num_nodes).collect();

    fn find(parent: &mut [usize], mut node: usize) -> usize {
        while parent[node] != node {
            parent[node] = parent[parent[node]];
            node = parent[node];
        }
        node
    }

    for &(u, v) in edges {
        let root_u = find(&mut parent, u);
        let root_v = find(&mut parent, v);
        parent[root_u] = root_v;
    }

    let root = find(&mut parent, 0);
    (1..num_nodes).all(|node| find(&mut parent, node) == root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(count: usize, spacing: f64) -> Vec<Coordinate> {
        (0..count)
            .map(|i| Coordinate::new(i as f64 * spacing, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn test_find_links_respects_threshold() {
        let points = line(4, 10.0);
        let links = find_links(&points, 10.0, 1.0, 42);
        // only neighbouring points are within reach
        assert_eq!(vec![(0, 1), (1, 2), (2, 3)], links);

        let all = find_links(&points, 100.0, 1.0, 42);
        assert_eq!(6, all.len());

        assert!(find_links(&points, 5.0, 1.0, 42).is_empty());
        assert!(find_links(&points, 100.0, 0.0, 42).is_empty());
    }

    #[test]
    fn test_find_links_is_reproducible() {
        let points = line(20, 1.0);
        let a = find_links(&points, 5.0, 0.5, 7);
        let b = find_links(&points, 5.0, 0.5, 7);
        assert_eq!(a, b);
        // a thinned-out draw keeps a strict subset of the pairs in range
        let dense = find_links(&points, 5.0, 1.0, 7);
        assert!(a.len() < dense.len());
        assert!(a.iter().all(|link| dense.contains(link)));
    }

    #[test]
    fn test_bigraph_connected() {
        assert!(!bigraph_connected(&[]));
        assert!(bigraph_connected(&[(0, 1)]));
        assert!(bigraph_connected(&[(0, 1), (1, 2), (0, 2)]));
        // direction plays no role
        assert!(bigraph_connected(&[(1, 0), (2, 1)]));
        // two islands
        assert!(!bigraph_connected(&[(0, 1), (2, 3)]));
        // vertex 1 appears in no edge
        assert!(!bigraph_connected(&[(0, 2)]));
    }
}
