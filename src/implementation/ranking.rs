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

//! This module provides the ranking used to order edges and caches by their
//! fractional load in a snapshot.

use std::cmp::Ordering;

use compare::Compare;
use ordered_float::OrderedFloat;

use crate::{Edge, Snapshot};

/// The MaxLoad ranking deems an edge (resp. a cache) greater than an other
/// one when its fractional value in the snapshot is higher. In case of
/// equality, the one with the smallest index is deemed the greatest. Hence,
/// a max-heap parameterized with `MaxLoad` pops the most loaded entity first
/// and breaks ties deterministically in ascending index order.
///
/// # Example
/// ```
/// # use sth::*;
/// # use binary_heap_plus::BinaryHeap;
/// let registry   = Registry::new(3,
///     vec![(Edge::new(0, 1), VarId(0)), (Edge::new(1, 2), VarId(1)), (Edge::new(0, 2), VarId(2))],
///     vec![None; 3], vec![None; 3]);
/// let assignment = Assignment::new(vec![0.2, 0.7, 0.2], 1.1);
/// let snapshot   = Snapshot::capture(&registry, &assignment);
///
/// let edges    = registry.edges().to_vec();
/// let mut heap = BinaryHeap::from_vec_cmp(edges, MaxLoad::new(&snapshot));
///
/// assert_eq!(Some(Edge::new(1, 2)), heap.pop()); // because 0.7 is the highest load
/// assert_eq!(Some(Edge::new(0, 1)), heap.pop()); // tie at 0.2, smallest edge first
/// assert_eq!(Some(Edge::new(0, 2)), heap.pop());
/// assert_eq!(None, heap.pop());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MaxLoad<'a>(&'a Snapshot);
impl <'a> MaxLoad<'a> {
    /// Creates a new instance
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self(snapshot)
    }
}
impl Compare<Edge> for MaxLoad<'_> {
    fn compare(&self, l: &Edge, r: &Edge) -> Ordering {
        OrderedFloat(self.0.load(*l)).cmp(&OrderedFloat(self.0.load(*r)))
            .then_with(|| r.cmp(l))
    }
}
/// Caches are designated by the index of the router hosting them
impl Compare<usize> for MaxLoad<'_> {
    fn compare(&self, l: &usize, r: &usize) -> Ordering {
        OrderedFloat(self.0.cache(*l)).cmp(&OrderedFloat(self.0.cache(*r)))
            .then_with(|| r.cmp(l))
    }
}
