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

//! This module defines the data of one network design instance.

use std::ops::{Index, IndexMut};

use crate::Edge;

/// A dense row major matrix of reals
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}
impl Matrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Matrix { rows, cols, data: vec![0.0; rows * cols] }
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    /// The sum of all entries on the given row
    pub fn row_sum(&self, row: usize) -> f64 {
        self.data[row * self.cols..(row + 1) * self.cols].iter().sum()
    }
    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.rows && j < self.cols);
        i * self.cols + j
    }
}
impl Index<(usize, usize)> for Matrix {
    type Output = f64;
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[self.offset(i, j)]
    }
}
impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        let off = self.offset(i, j);
        &mut self.data[off]
    }
}

/// This structure represents one instance of the network design problem
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// The number of routers
    pub routers: usize,
    /// The number of content distribution networks
    pub cdns: usize,
    /// The strict demand between any two routers (routers x routers)
    pub r2r: Matrix,
    /// The flexible demand of each router towards each cdn (routers x cdns)
    pub r2cdn: Matrix,
    /// The symmetric link capacities (routers x routers). A zero means that
    /// no link can be installed between the two routers.
    pub topo: Matrix,
    /// The routers hosting the servers of each cdn
    pub locations: Vec<Vec<usize>>,
    /// The capacity of each server, aligned with `locations`
    pub capacities: Vec<Vec<f64>>,
}
impl Instance {
    /// Creates an instance without any demand, link or server
    pub fn empty(routers: usize, cdns: usize) -> Self {
        Instance {
            routers,
            cdns,
            r2r: Matrix::new(routers, routers),
            r2cdn: Matrix::new(routers, cdns),
            topo: Matrix::new(routers, routers),
            locations: vec![vec![]; cdns],
            capacities: vec![vec![]; cdns],
        }
    }
    /// Installs a potential link of the given capacity between i and j
    pub fn add_link(&mut self, i: usize, j: usize, capacity: f64) {
        self.topo[(i, j)] = capacity;
        self.topo[(j, i)] = capacity;
    }
    /// All the potential links (those having a positive capacity), in
    /// ascending order.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = vec![];
        for a in 0..self.routers {
            for b in a + 1..self.routers {
                if self.topo[(a, b)] > 0.0 {
                    edges.push(Edge::new(a, b));
                }
            }
        }
        edges
    }
}
