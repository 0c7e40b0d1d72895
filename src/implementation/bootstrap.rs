// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the spanning tree bootstrap: a one-time pass which
//! picks a connected backbone before the general rounding begins.

use binary_heap_plus::BinaryHeap;
use bit_set::BitSet;

use crate::{Edge, Failure, MaxLoad, Registry, Snapshot};

/// Grows a maximum-load spanning tree (Prim style) over the routers of the
/// topology, where the weight of an edge is the fractional value of its `x`
/// variable in the relaxation. Edges which the relaxation uses heavily are
/// thus preferred.
///
/// # Example
/// ```
/// # use sth::*;
/// let registry = Registry::new(3,
///     vec![(Edge::new(0, 1), VarId(0)), (Edge::new(1, 2), VarId(1)), (Edge::new(0, 2), VarId(2))],
///     vec![None; 3], vec![None; 3]);
/// let snapshot = Snapshot::capture(&registry, &Assignment::new(vec![0.9, 0.6, 0.3], 1.8));
///
/// let tree = SpanningTree::new(&registry).grow(&snapshot).unwrap();
/// assert_eq!(vec![Edge::new(0, 1), Edge::new(1, 2)], tree);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SpanningTree<'a> {
    registry: &'a Registry,
}
impl <'a> SpanningTree<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Returns the edges of the spanning tree, in the order they were picked.
    /// That is, `routers - 1` edges, starting from router 0.
    ///
    /// It fails with `Failure::Disconnected` when some router cannot be
    /// reached from router 0.
    pub fn grow(&self, snapshot: &Snapshot) -> Result<Vec<Edge>, Failure> {
        let n = self.registry.routers();
        if n == 0 {
            return Ok(vec![]);
        }

        let mut connected = BitSet::with_capacity(n);
        let mut frontier  = BinaryHeap::from_vec_cmp(vec![], MaxLoad::new(snapshot));
        let mut tree      = Vec::with_capacity(n - 1);

        connected.insert(0);
        self.expand(0, &connected, &mut frontier);

        while connected.len() < n {
            let Some(edge) = frontier.pop() else {
                return Err(Failure::Disconnected { reached: connected.len(), routers: n });
            };

            let v = if !connected.contains(edge.a) {
                edge.a
            } else if !connected.contains(edge.b) {
                edge.b
            } else {
                continue;
            };

            log::trace!("Router {} reached through {}", v, edge);
            connected.insert(v);
            tree.push(edge);
            self.expand(v, &connected, &mut frontier);
        }

        Ok(tree)
    }

    /// Pushes all the edges from `v` to an unconnected router onto the frontier
    fn expand(&self, v: usize, connected: &BitSet, frontier: &mut BinaryHeap<Edge, MaxLoad>) {
        for w in self.registry.neighbours(v).iter().copied() {
            if !connected.contains(w) {
                frontier.push(Edge::new(v, w));
            }
        }
    }
}

#[cfg(test)]
mod test_spanning_tree {
    use crate::*;
    use crate::test_utils::*;

    #[test]
    fn a_ring_keeps_all_edges_but_one() {
        let reg    = ring_registry(4, false);
        let mut oracle = PinningOracle::uniform(&reg, 0.5);
        let snap   = capture(&reg, &mut oracle);
        let tree   = SpanningTree::new(&reg).grow(&snap).unwrap();

        assert_eq!(3, tree.len());
        assert!(is_spanning_tree(4, &tree));
    }
    #[test]
    fn the_least_loaded_edge_of_a_ring_is_left_out() {
        let reg    = ring_registry(4, false);
        let mut oracle = PinningOracle::uniform(&reg, 0.8);
        oracle.set(reg.x_var(Edge::new(1, 2)).unwrap(), 0.1);
        let snap   = capture(&reg, &mut oracle);
        let tree   = SpanningTree::new(&reg).grow(&snap).unwrap();

        assert!(!tree.contains(&Edge::new(1, 2)));
        assert!(is_spanning_tree(4, &tree));
    }
    #[test]
    fn ties_are_broken_in_ascending_edge_order() {
        let reg    = ring_registry(4, false);
        let mut oracle = PinningOracle::uniform(&reg, 0.5);
        let snap   = capture(&reg, &mut oracle);
        let tree   = SpanningTree::new(&reg).grow(&snap).unwrap();

        // from 0: (0,1) beats (0,3); then (0,3) beats (1,2); then (1,2)
        assert_eq!(vec![Edge::new(0, 1), Edge::new(0, 3), Edge::new(1, 2)], tree);
    }
    #[test]
    fn heavily_loaded_edges_are_preferred_even_far_from_the_root() {
        // 0 - 1 - 2 and a chord 0 - 2
        let reg = registry(3, &[(0, 1), (1, 2), (0, 2)], false);
        let mut oracle = PinningOracle::uniform(&reg, 0.0);
        oracle.set(reg.x_var(Edge::new(0, 1)).unwrap(), 0.4);
        oracle.set(reg.x_var(Edge::new(1, 2)).unwrap(), 1.0);
        oracle.set(reg.x_var(Edge::new(0, 2)).unwrap(), 0.3);
        let snap = capture(&reg, &mut oracle);

        let tree = SpanningTree::new(&reg).grow(&snap).unwrap();
        assert_eq!(vec![Edge::new(0, 1), Edge::new(1, 2)], tree);
    }
    #[test]
    fn a_disconnected_topology_cannot_be_spanned() {
        let reg = registry(4, &[(0, 1), (2, 3)], false);
        let mut oracle = PinningOracle::uniform(&reg, 0.5);
        let snap = capture(&reg, &mut oracle);

        assert_eq!(
            Err(Failure::Disconnected { reached: 2, routers: 4 }),
            SpanningTree::new(&reg).grow(&snap));
    }
    #[test]
    fn a_single_router_needs_no_edge() {
        let reg = registry(1, &[], false);
        let mut oracle = PinningOracle::uniform(&reg, 0.5);
        let snap = capture(&reg, &mut oracle);

        assert_eq!(Ok(vec![]), SpanningTree::new(&reg).grow(&snap));
    }
    #[test]
    fn an_empty_topology_needs_no_edge() {
        let reg = registry(0, &[], false);
        let mut oracle = PinningOracle::uniform(&reg, 0.5);
        let snap = capture(&reg, &mut oracle);

        assert_eq!(Ok(vec![]), SpanningTree::new(&reg).grow(&snap));
    }
}
