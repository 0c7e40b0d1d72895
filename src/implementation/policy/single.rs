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

//! This module provides the greedy-single freeze policy.

use compare::Compare;

use crate::{FreezePolicy, MaxLoad, Snapshot, Target, ToDo};

/// _This is the default freeze policy._ It selects exactly one variable per
/// iteration: the undecided edge or cache having the highest fractional value.
///
/// The most loaded edge and the most loaded cache are first identified (ties
/// being broken in ascending index order). The edge is then chosen iff its
/// value is strictly greater than that of the cache; otherwise, the cache is.
///
/// # Example
/// ```
/// # use sth::*;
/// let registry = Registry::new(3,
///     vec![(Edge::new(0, 1), VarId(0))],
///     vec![None, None, Some(VarId(1))],
///     vec![None, None, Some(VarId(2))]);
/// let snapshot = Snapshot::capture(&registry, &Assignment::new(vec![0.7, 0.9, 0.9], 2.5));
///
/// let chosen = GreedySingle.select(&snapshot, registry.todo());
/// assert_eq!(vec![Target::Cache(2)], chosen);
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct GreedySingle;
impl FreezePolicy for GreedySingle {
    fn select(&self, snapshot: &Snapshot, todo: &ToDo) -> Vec<Target> {
        let order      = MaxLoad::new(snapshot);
        let best_edge  = todo.edges().copied().max_by(|l, r| order.compare(l, r));
        let best_cache = todo.caches().copied().max_by(|l, r| order.compare(l, r));

        let chosen = match (best_edge, best_cache) {
            (None, None)    => return vec![],
            (Some(e), None) => Target::Edge(e),
            (None, Some(c)) => Target::Cache(c),
            (Some(e), Some(c)) => {
                if snapshot.load(e) > snapshot.cache(c) {
                    Target::Edge(e)
                } else {
                    Target::Cache(c)
                }
            }
        };
        vec![chosen]
    }
}
