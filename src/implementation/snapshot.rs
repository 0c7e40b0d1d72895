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

//! This module provides the snapshot of a relaxation: an immutable copy of
//! the fractional values of all binary variables.

use std::ops::Index;

use crate::{Assignment, Edge, Registry, Target};

/// A per-iteration copy of the fractional values the oracle gave to every
/// `x` and `y` variable. A snapshot is never updated: it is captured anew
/// after each solve and remains valid until the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    routers: usize,
    /// Dense `routers x routers` matrix, only the cells `[a][b]` with `a < b`
    /// of existing edges are populated. Everything else is zero.
    x: Vec<f64>,
    y: Vec<f64>,
    objective: f64,
}

impl Snapshot {
    /// Copies the values of all binary variables known to the `registry`
    /// from the given `assignment`.
    pub fn capture(registry: &Registry, assignment: &Assignment) -> Self {
        let n = registry.routers();
        let mut x = vec![0.0; n * n];
        for e in registry.edges().iter().copied() {
            if let Some(var) = registry.x_var(e) {
                x[e.a * n + e.b] = assignment[var];
            }
        }
        let y = (0..n)
            .map(|i| registry.y_var(i).map(|v| assignment[v]).unwrap_or(0.0))
            .collect();

        Snapshot { routers: n, x, y, objective: assignment.objective() }
    }

    /// The number of routers covered by this snapshot
    pub fn routers(&self) -> usize {
        self.routers
    }
    /// The fractional value of the `x` variable of `edge`
    pub fn load(&self, edge: Edge) -> f64 {
        self.x[edge.a * self.routers + edge.b]
    }
    /// The fractional value of the `y` variable of router `i`
    pub fn cache(&self, i: usize) -> f64 {
        self.y[i]
    }
    /// The fractional value of the variable behind `target`
    pub fn value(&self, target: Target) -> f64 {
        match target {
            Target::Edge(e)  => self.load(e),
            Target::Cache(i) => self.cache(i),
        }
    }
    /// The objective value of the relaxation
    pub fn objective(&self) -> f64 {
        self.objective
    }
}
impl Index<(usize, usize)> for Snapshot {
    type Output = f64;
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        let e = Edge::new(i, j);
        &self.x[e.a * self.routers + e.b]
    }
}
