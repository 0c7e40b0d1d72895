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

//! This module provides some utilities to write unit tests, the most notable
//! of which is a fake oracle which honors the equality constraints it is given.
#![cfg(test)]

use std::cell::Cell;

use fxhash::FxHashMap;

use crate::*;

/// Creates a registry over `n` routers with the given edges. The variables
/// are numbered as follows: first the `x` of each edge (in the given order),
/// then the `y` of each router and finally the `z` of each router. When
/// `caches` is false, no router is a cache candidate.
pub fn registry(n: usize, edges: &[(usize, usize)], caches: bool) -> Registry {
    let m = edges.len();
    let x = edges.iter().enumerate()
        .map(|(k, (i, j))| (Edge::new(*i, *j), VarId(k)))
        .collect();
    let y = (0..n).map(|i| if caches { Some(VarId(m + i)) } else { None }).collect();
    let z = (0..n).map(|i| if caches { Some(VarId(m + n + i)) } else { None }).collect();
    Registry::new(n, x, y, z)
}

/// Creates a registry over a ring of `n` routers: 0 - 1 - ... - (n-1) - 0
pub fn ring_registry(n: usize, caches: bool) -> Registry {
    let edges = (0..n).map(|i| (i, (i + 1) % n)).collect::<Vec<_>>();
    registry(n, &edges, caches)
}

/// Solves the relaxation and captures its snapshot
pub fn capture(registry: &Registry, oracle: &mut PinningOracle) -> Snapshot {
    match oracle.solve() {
        Outcome::Optimal(assignment) => Snapshot::capture(registry, &assignment),
        other => panic!("the relaxation should be feasible, got {other:?}"),
    }
}

/// Returns true iff the given edges form a spanning tree over `n` routers
pub fn is_spanning_tree(n: usize, edges: &[Edge]) -> bool {
    if edges.len() + 1 != n {
        return false;
    }
    let mut parent = (0..n).collect::<Vec<_>>();
    fn root(parent: &[usize], mut v: usize) -> usize {
        while parent[v] != v {
            v = parent[v];
        }
        v
    }
    for e in edges {
        let ra = root(&parent, e.a);
        let rb = root(&parent, e.b);
        if ra == rb {
            return false;
        }
        parent[ra] = rb;
    }
    true
}

/// A fake oracle. Each variable takes its `base` value unless an equality
/// constraint pinned it to some other value. The objective is the sum of
/// all values.
#[derive(Debug, Clone, Default)]
pub struct PinningOracle {
    pub base: Vec<f64>,
    pub pinned: FxHashMap<VarId, f64>,
    /// All equality constraints received so far, in order
    pub equalities: Vec<(VarId, f64)>,
    /// The number of times solve has been called
    pub calls: usize,
    /// The call (counting from 0) from which the oracle fails, and how
    pub failure: Option<(usize, Outcome)>,
}
impl PinningOracle {
    /// All variables of the registry take the value `v`
    pub fn uniform(registry: &Registry, v: f64) -> Self {
        let nb_vars = registry.edges().len() + 2 * registry.routers();
        PinningOracle { base: vec![v; nb_vars], ..Default::default() }
    }
    /// Changes the base value of one variable
    pub fn set(&mut self, var: VarId, v: f64) {
        self.base[var.id()] = v;
    }
    /// All solves from the given call on report infeasibility
    pub fn infeasible_from(mut self, call: usize) -> Self {
        self.failure = Some((call, Outcome::Infeasible));
        self
    }
    /// All solves from the given call on fail with the given reason
    pub fn failing_from(mut self, call: usize, reason: &str) -> Self {
        self.failure = Some((call, Outcome::Other(reason.to_string())));
        self
    }
}
impl Oracle for PinningOracle {
    fn solve(&mut self) -> Outcome {
        let call = self.calls;
        self.calls += 1;

        if let Some((from, outcome)) = self.failure.as_ref() {
            if call >= *from {
                return outcome.clone();
            }
        }

        let values = self.base.iter().enumerate()
            .map(|(i, v)| self.pinned.get(&VarId(i)).copied().unwrap_or(*v))
            .collect::<Vec<_>>();
        let objective = values.iter().sum();
        Outcome::Optimal(Assignment::new(values, objective))
    }
    fn add_equality(&mut self, var: VarId, value: f64) {
        self.pinned.insert(var, value);
        self.equalities.push((var, value));
    }
}

/// A policy which counts how many times it is invoked and otherwise behaves
/// like `GreedySingle`
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Cell<usize>,
}
impl FreezePolicy for Recorder {
    fn select(&self, snapshot: &Snapshot, todo: &ToDo) -> Vec<Target> {
        self.calls.set(self.calls.get() + 1);
        GreedySingle.select(snapshot, todo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_path_is_a_spanning_tree() {
        assert!(is_spanning_tree(3, &[Edge::new(0, 1), Edge::new(1, 2)]));
    }
    #[test]
    fn a_cycle_is_no_spanning_tree() {
        assert!(!is_spanning_tree(3, &[Edge::new(0, 1), Edge::new(1, 2), Edge::new(0, 2)]));
        assert!(!is_spanning_tree(4, &[Edge::new(0, 1), Edge::new(1, 2), Edge::new(0, 2)]));
    }
    #[test]
    fn the_fake_oracle_honors_equalities() {
        let reg = ring_registry(3, false);
        let mut oracle = PinningOracle::uniform(&reg, 0.5);
        oracle.add_equality(VarId(1), 1.0);
        let Outcome::Optimal(a) = oracle.solve() else { panic!() };
        assert_eq!(0.5, a[VarId(0)]);
        assert_eq!(1.0, a[VarId(1)]);
    }
}
