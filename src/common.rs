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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client code is likely to work with.

use std::fmt;

use crate::Assignment;

// ----------------------------------------------------------------------------
// --- VARIABLE ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a decision variable as it is known by the relaxation
/// oracle. It is nothing but an opaque handle: the rounding heuristic never
/// reads nor writes a variable except through the `Oracle` abstraction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VarId(pub usize);
impl VarId {
    #[inline]
    /// This function returns the id (numeric value) of the variable.
    ///
    /// # Examples:
    /// ```
    /// # use sth::VarId;
    /// assert_eq!(0, VarId(0).id());
    /// assert_eq!(7, VarId(7).id());
    /// ```
    pub fn id(self) -> usize {
        self.0
    }
}

// ----------------------------------------------------------------------------
// --- EDGE -------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// An undirected topology link between two routers. The endpoints are always
/// stored so that `a < b`, which makes `(i, j)` and `(j, i)` the same edge.
///
/// Edges are ordered lexicographically on their endpoints. This is the order
/// used to break ties between equally loaded edges.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}
impl Edge {
    /// Creates the edge connecting `i` and `j` (in whatever order).
    ///
    /// # Examples:
    /// ```
    /// # use sth::Edge;
    /// assert_eq!(Edge::new(3, 1), Edge::new(1, 3));
    /// assert_eq!(1, Edge::new(3, 1).a);
    /// ```
    pub fn new(i: usize, j: usize) -> Self {
        debug_assert_ne!(i, j, "a router cannot be linked to itself");
        Edge { a: i.min(j), b: i.max(j) }
    }
    /// Returns the endpoint opposite to `v`
    pub fn other(self, v: usize) -> usize {
        if self.a == v { self.b } else { self.a }
    }
}
impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.a, self.b)
    }
}

// ----------------------------------------------------------------------------
// --- TARGET & DECISION ------------------------------------------------------
// ----------------------------------------------------------------------------
/// A binary decision of the network design problem which the heuristic must
/// eventually freeze: either the activation of a link or the activation of
/// a cache on some router.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Target {
    /// The `x` variable of the given edge
    Edge(Edge),
    /// The `y` variable of the given router
    Cache(usize),
}
impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Edge(e)  => write!(f, "edge {e}"),
            Target::Cache(i) => write!(f, "cache {i}"),
        }
    }
}

/// This denotes a freeze that was made during the search. It pins the given
/// `target` to the specified `value` (either 0 or 1). Any given `Decision`
/// should be understood as ```[[ target = value ]]```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Decision {
    pub target : Target,
    pub value  : isize,
}

// ----------------------------------------------------------------------------
// --- Results ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A reason explaining why the rounding could not produce an integral solution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// The oracle proved that the current constraint set has no solution
    #[error("the relaxation is infeasible")]
    Infeasible,
    /// The oracle failed to produce an assignment for some other reason
    #[error("the oracle failed: {0}")]
    Solver(String),
    /// The topology does not allow to connect all routers
    #[error("only {reached} out of {routers} routers could be connected")]
    Disconnected { reached: usize, routers: usize },
    /// The freeze policy selected no undecided variable while some remained
    #[error("the freeze policy made no progress with {undecided} variables left")]
    Stalled { undecided: usize },
}

/// The terminal state of a rounding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// All binary variables have been frozen and the final relaxation is
    /// feasible: its assignment is integral on `x` and `y`.
    Integral,
    /// The run was abandoned. No partial result is to be trusted.
    Failed(Failure),
}

/// The outcome of a rounding run, which is handed over to the output stage.
#[derive(Debug, Clone)]
pub struct Completion {
    /// did the run succeed or did it fail ?
    pub status: Status,
    /// the number of times the oracle has been invoked. On success, this
    /// count includes the final solve which yields the assignment.
    pub relaxations: usize,
    /// if present, the assignment of the final relaxation
    pub assignment: Option<Assignment>,
}
impl Completion {
    /// Returns true iff the run produced an integral solution
    pub fn is_success(&self) -> bool {
        self.status == Status::Integral
    }
    /// The objective value of the final solution (if any)
    pub fn objective(&self) -> Option<f64> {
        self.assignment.as_ref().map(|a| a.objective())
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################
