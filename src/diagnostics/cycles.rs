//! Cycle detection over `requires:` edges.
//!
//! Enumerates elementary circuits with Johnson's algorithm: for each start
//! node in key order, search only nodes ordered at or after it, and keep
//! dead-end nodes blocked until a circuit through them is found.

use std::collections::BTreeMap;

/// Every elementary cycle in `graph`, each in edge order starting from its
/// smallest member. Self-loops are cycles of length one.
///
/// Cycles that share nodes are all reported. The result is sorted. Edge
/// targets missing from the key set are treated as leaves.
pub fn find_cycles<T>(graph: &BTreeMap<T, Vec<T>>) -> Vec<Vec<T>>
where
    T: Ord + Clone,
{
    let nodes: Vec<&T> = graph.keys().collect();
    let index: BTreeMap<&T, usize> = nodes.iter().enumerate().map(|(i, n)| (*n, i)).collect();
    let adjacency: Vec<Vec<usize>> = graph
        .values()
        .map(|targets| {
            let mut out: Vec<usize> = Vec::new();
            for target in targets {
                if let Some(&i) = index.get(target)
                    && !out.contains(&i)
                {
                    out.push(i);
                }
            }
            out
        })
        .collect();

    let mut search = CircuitSearch {
        adjacency: &adjacency,
        start: 0,
        blocked: vec![false; nodes.len()],
        blocked_by: vec![Vec::new(); nodes.len()],
        path: Vec::new(),
        found: Vec::new(),
    };
    for start in 0..nodes.len() {
        search.start = start;
        search.blocked.fill(false);
        search.blocked_by.iter_mut().for_each(Vec::clear);
        search.circuit(start);
    }

    let mut cycles: Vec<Vec<T>> = search
        .found
        .into_iter()
        .map(|cycle| cycle.into_iter().map(|i| nodes[i].clone()).collect())
        .collect();
    cycles.sort();
    cycles
}

struct CircuitSearch<'g> {
    adjacency: &'g [Vec<usize>],
    start: usize,
    blocked: Vec<bool>,
    /// `blocked_by[w]` lists nodes to unblock once `w` is unblocked.
    blocked_by: Vec<Vec<usize>>,
    path: Vec<usize>,
    found: Vec<Vec<usize>>,
}

impl CircuitSearch<'_> {
    /// Returns whether some circuit back to `start` passes through `node`.
    fn circuit(&mut self, node: usize) -> bool {
        let adjacency = self.adjacency;
        let start = self.start;
        let mut closed = false;
        self.path.push(node);
        self.blocked[node] = true;

        for &next in adjacency[node].iter().filter(|&&n| n >= start) {
            if next == start {
                self.found.push(self.path.clone());
                closed = true;
            } else if !self.blocked[next] && self.circuit(next) {
                closed = true;
            }
        }

        if closed {
            self.unblock(node);
        } else {
            for &next in adjacency[node].iter().filter(|&&n| n >= start) {
                if !self.blocked_by[next].contains(&node) {
                    self.blocked_by[next].push(node);
                }
            }
        }
        self.path.pop();
        closed
    }

    fn unblock(&mut self, node: usize) {
        self.blocked[node] = false;
        for waiting in std::mem::take(&mut self.blocked_by[node]) {
            if self.blocked[waiting] {
                self.unblock(waiting);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&'static str, &[&'static str])]) -> BTreeMap<&'static str, Vec<&'static str>> {
        edges.iter().map(|(k, v)| (*k, v.to_vec())).collect()
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let g = graph(&[("a", &["b", "c"]), ("b", &["c"]), ("c", &[])]);
        assert!(find_cycles(&g).is_empty());
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let g = graph(&[("a", &["a"])]);
        assert_eq!(find_cycles(&g), vec![vec!["a"]]);
    }

    #[test]
    fn test_cycle_is_reported_in_edge_order_from_smallest_member() {
        let g = graph(&[("c", &["a"]), ("a", &["b"]), ("b", &["c"])]);
        assert_eq!(find_cycles(&g), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_independent_cycles_are_reported_separately() {
        let g = graph(&[
            ("a", &["b"]),
            ("b", &["a"]),
            ("x", &["y"]),
            ("y", &["x", "z"]),
            ("z", &[]),
        ]);
        assert_eq!(find_cycles(&g), vec![vec!["a", "b"], vec!["x", "y"]]);
    }

    #[test]
    fn test_cycles_sharing_nodes_are_all_reported() {
        let g = graph(&[("a", &["b", "c"]), ("b", &["c"]), ("c", &["a"])]);
        assert_eq!(find_cycles(&g), vec![vec!["a", "b", "c"], vec!["a", "c"]]);
    }

    #[test]
    fn test_cycle_reached_through_a_finished_branch() {
        let g = graph(&[
            ("a", &["b"]),
            ("b", &["c", "d"]),
            ("c", &[]),
            ("d", &["b", "c"]),
        ]);
        assert_eq!(find_cycles(&g), vec![vec!["b", "d"]]);

        let g = graph(&[("a", &["b", "c"]), ("b", &["a"]), ("c", &["b"])]);
        assert_eq!(find_cycles(&g), vec![vec!["a", "b"], vec!["a", "c", "b"]]);
    }

    #[test]
    fn test_edges_to_unknown_nodes_are_leaves() {
        let g = graph(&[("a", &["missing"])]);
        assert!(find_cycles(&g).is_empty());
    }
}
