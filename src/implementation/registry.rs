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

//! This module provides the decision variable registry: it knows the handle
//! of every binary variable of the network design problem and tracks which
//! of them are still undecided.

use fxhash::{FxHashMap, FxHashSet};

use crate::{Decision, Edge, Oracle, Target, VarId};

/// The sets of binary variables whose value has not been frozen yet.
///
/// A target leaves its set exactly once (when it gets frozen) and it never
/// re-enters it: there is no way to insert a target into a `ToDo` after it
/// was created.
#[derive(Debug, Clone, Default)]
pub struct ToDo {
    edges : FxHashSet<Edge>,
    caches: FxHashSet<usize>,
}
impl ToDo {
    /// The undecided edges (in no particular order)
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }
    /// The undecided caches (in no particular order)
    pub fn caches(&self) -> impl Iterator<Item = &usize> + '_ {
        self.caches.iter()
    }
    /// Returns true iff the given target is still undecided
    pub fn contains(&self, target: Target) -> bool {
        match target {
            Target::Edge(e)  => self.edges.contains(&e),
            Target::Cache(i) => self.caches.contains(&i),
        }
    }
    /// The number of undecided edges
    pub fn nb_edges(&self) -> usize {
        self.edges.len()
    }
    /// The number of undecided caches
    pub fn nb_caches(&self) -> usize {
        self.caches.len()
    }
    /// The total number of undecided variables
    pub fn len(&self) -> usize {
        self.edges.len() + self.caches.len()
    }
    /// Returns true iff there is nothing left to decide
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// All undecided targets, edges first, each kind in ascending order.
    pub fn sorted(&self) -> Vec<Target> {
        let mut edges = self.edges.iter().copied().collect::<Vec<_>>();
        let mut caches= self.caches.iter().copied().collect::<Vec<_>>();
        edges.sort_unstable();
        caches.sort_unstable();

        edges.into_iter().map(Target::Edge)
            .chain(caches.into_iter().map(Target::Cache))
            .collect()
    }

    fn remove(&mut self, target: Target) -> bool {
        match target {
            Target::Edge(e)  => self.edges.remove(&e),
            Target::Cache(i) => self.caches.remove(&i),
        }
    }
    fn clear(&mut self) {
        self.edges.clear();
        self.caches.clear();
    }
}

/// The registry holds the handles to the binary edge-activation variables
/// `x`, the binary cache-activation variables `y` and the cache usage
/// indicators `z`. It is created once, when the constraint model is built.
#[derive(Debug, Clone)]
pub struct Registry {
    /// The number of routers in the topology
    routers: usize,
    /// All edges of the topology (positive capacity), in ascending order
    edges: Vec<Edge>,
    /// For each router, the list of its neighbours in ascending order
    adjacency: Vec<Vec<usize>>,
    /// The handle of the `x` variable of each edge
    x: FxHashMap<Edge, VarId>,
    /// The handle of the `y` variable of each router that may host a cache
    y: Vec<Option<VarId>>,
    /// The handle of the `z` variable of each router that may host a cache
    z: Vec<Option<VarId>>,
    /// What remains to be decided
    todo: ToDo,
    /// All the freezes that have been applied so far, in chronological order
    decisions: Vec<Decision>,
}

impl Registry {
    /// Creates a new registry where every known variable is undecided.
    ///
    /// `x` lists the edges of the topology together with their variable,
    /// `y` and `z` must both have one entry per router (`None` when the
    /// router is no cache candidate).
    pub fn new(routers: usize, x: Vec<(Edge, VarId)>, y: Vec<Option<VarId>>, z: Vec<Option<VarId>>) -> Self {
        assert_eq!(routers, y.len(), "there must be one y entry per router");
        assert_eq!(routers, z.len(), "there must be one z entry per router");

        let mut edges     = x.iter().map(|(e, _)| *e).collect::<Vec<_>>();
        let mut adjacency = vec![vec![]; routers];
        edges.sort_unstable();
        edges.dedup();
        for e in edges.iter() {
            adjacency[e.a].push(e.b);
            adjacency[e.b].push(e.a);
        }
        adjacency.iter_mut().for_each(|n| n.sort_unstable());

        let todo = ToDo {
            edges : edges.iter().copied().collect(),
            caches: y.iter().enumerate().filter(|(_, v)| v.is_some()).map(|(i, _)| i).collect(),
        };

        Registry {
            routers,
            edges,
            adjacency,
            x: x.into_iter().collect(),
            y,
            z,
            todo,
            decisions: vec![],
        }
    }

    /// The number of routers in the topology
    pub fn routers(&self) -> usize {
        self.routers
    }
    /// The edges of the topology in ascending order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
    /// The routers linked to `v` in ascending order
    pub fn neighbours(&self, v: usize) -> &[usize] {
        &self.adjacency[v]
    }
    /// The variable telling whether `edge` is built
    pub fn x_var(&self, edge: Edge) -> Option<VarId> {
        self.x.get(&edge).copied()
    }
    /// The variable telling whether router `i` hosts a cache
    pub fn y_var(&self, i: usize) -> Option<VarId> {
        self.y.get(i).copied().flatten()
    }
    /// The variable telling whether the cache of router `i` is in use
    pub fn z_var(&self, i: usize) -> Option<VarId> {
        self.z.get(i).copied().flatten()
    }
    /// The variable behind some target
    pub fn var_of(&self, target: Target) -> Option<VarId> {
        match target {
            Target::Edge(e)  => self.x_var(e),
            Target::Cache(i) => self.y_var(i),
        }
    }
    /// What remains to be decided
    pub fn todo(&self) -> &ToDo {
        &self.todo
    }
    /// All freezes applied so far, in chronological order
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }
    /// The edges that have been frozen to the given value
    pub fn frozen_edges(&self, value: isize) -> Vec<Edge> {
        self.decisions.iter()
            .filter(|d| d.value == value)
            .filter_map(|d| match d.target { Target::Edge(e) => Some(e), _ => None })
            .collect()
    }

    /// Permanently pins `target` to `value` by adding an equality constraint
    /// to the oracle, and removes it from the undecided variables.
    ///
    /// Returns false (and does nothing) when the target was not undecided.
    pub fn freeze<O: Oracle + ?Sized>(&mut self, oracle: &mut O, target: Target, value: isize) -> bool {
        let Some(var) = self.var_of(target) else {
            return false;
        };
        if !self.todo.remove(target) {
            return false;
        }
        oracle.add_equality(var, value as f64);
        self.decisions.push(Decision { target, value });
        true
    }

    /// Forgets about everything that remained to be decided. This is how a
    /// failed run is brought to an end.
    pub fn clear_todo(&mut self) {
        self.todo.clear();
    }
}
