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

//! This module defines the `Oracle` trait: the black box which solves the
//! linear relaxation of the network design problem.

use std::ops::Index;

use crate::VarId;

/// The values of all decision variables in an optimal solution of the
/// relaxation, along with the value of the objective function.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    values: Vec<f64>,
    objective: f64,
}
impl Assignment {
    /// Creates a new assignment where `values[i]` is the value of `VarId(i)`
    pub fn new(values: Vec<f64>, objective: f64) -> Self {
        Self { values, objective }
    }
    /// The value of the objective function
    pub fn objective(&self) -> f64 {
        self.objective
    }
    /// The value taken by the given variable
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.id()]
    }
    /// The number of variables in this assignment
    pub fn len(&self) -> usize {
        self.values.len()
    }
    /// Returns true iff the assignment bears on no variable at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
impl Index<VarId> for Assignment {
    type Output = f64;
    fn index(&self, var: VarId) -> &f64 {
        &self.values[var.id()]
    }
}

/// What the oracle tells when asked to solve the current relaxation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The relaxation was solved to optimality
    Optimal(Assignment),
    /// The relaxation has no feasible solution
    Infeasible,
    /// The oracle did not produce a usable assignment (unbounded problem,
    /// numerical trouble, ...)
    Other(String),
}

/// This is the oracle abstraction. It is implemented by a structure that
/// wraps some linear programming backend and holds the complete constraint
/// model of the problem.
///
/// # Note:
/// The constraint set of an oracle is append only. The rounding heuristic
/// freezes a variable by adding an equality constraint and never removes it.
pub trait Oracle {
    /// Solves the current relaxation (one blocking call).
    fn solve(&mut self) -> Outcome;
    /// Adds the constraint `var == value` to the model.
    fn add_equality(&mut self, var: VarId, value: f64);
}

#[cfg(test)]
mod tests {
    use crate::{Assignment, VarId};

    #[test]
    fn values_are_indexed_by_variable() {
        let a = Assignment::new(vec![0.5, 1.0, 0.0], 12.0);
        assert_eq!(0.5, a[VarId(0)]);
        assert_eq!(1.0, a.value(VarId(1)));
        assert_eq!(0.0, a[VarId(2)]);
        assert_eq!(3, a.len());
        assert_eq!(12.0, a.objective());
    }
    #[test]
    fn empty_assignment() {
        let a = Assignment::new(vec![], 0.0);
        assert!(a.is_empty());
    }
}
