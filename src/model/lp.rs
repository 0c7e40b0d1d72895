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

//! This module provides a relaxation oracle backed by the `microlp` solver.

use std::time::{Duration, Instant};

use microlp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};

use crate::{Assignment, Oracle, Outcome, VarId};

/// A linear program (minimization) whose constraint set can only grow.
/// Each call to `solve` solves the current program from scratch.
#[derive(Debug, Clone)]
pub struct LpOracle {
    problem: Problem,
    /// The solver variable behind each `VarId`
    vars: Vec<Variable>,
    /// The time any solve is expected to take at most
    time_limit: Option<Duration>,
}

impl Default for LpOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl LpOracle {
    pub fn new() -> Self {
        LpOracle {
            problem: Problem::new(OptimizationDirection::Minimize),
            vars: vec![],
            time_limit: None,
        }
    }
    pub fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }
    pub fn nb_vars(&self) -> usize {
        self.vars.len()
    }
    /// Adds a variable with the given objective coefficient and bounds
    pub fn add_var(&mut self, cost: f64, bounds: (f64, f64)) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(self.problem.add_var(cost, bounds));
        id
    }
    /// Adds the constraint `sum(coef * var) op rhs`. A variable may occur at
    /// most once among the terms.
    pub fn add_constraint(&mut self, terms: &[(VarId, f64)], op: ComparisonOp, rhs: f64) {
        let expr = terms.iter()
            .map(|(var, coef)| (self.vars[var.id()], *coef))
            .collect::<LinearExpr>();
        self.problem.add_constraint(expr, op, rhs);
    }
}

impl Oracle for LpOracle {
    fn solve(&mut self) -> Outcome {
        let start = Instant::now();
        let result = self.problem.solve();
        let elapsed = start.elapsed();

        if let Some(limit) = self.time_limit {
            if elapsed > limit {
                log::warn!("Solve took {:.3}s, beyond the time limit of {:.3}s", elapsed.as_secs_f64(), limit.as_secs_f64());
            }
        }

        match result {
            Ok(solution) => {
                let values = self.vars.iter().map(|v| *solution.var_value(*v)).collect();
                Outcome::Optimal(Assignment::new(values, solution.objective()))
            },
            Err(microlp::Error::Infeasible) => Outcome::Infeasible,
            Err(error) => Outcome::Other(error.to_string()),
        }
    }

    fn add_equality(&mut self, var: VarId, value: f64) {
        self.add_constraint(&[(var, 1.0)], ComparisonOp::Eq, value);
    }
}

#[cfg(test)]
mod test_lp {
    use microlp::ComparisonOp;

    use crate::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn variables_are_numbered_in_creation_order() {
        let mut lp = LpOracle::new();
        assert_eq!(VarId(0), lp.add_var(1.0, (0.0, 1.0)));
        assert_eq!(VarId(1), lp.add_var(1.0, (0.0, 1.0)));
        assert_eq!(2, lp.nb_vars());
    }
    #[test]
    fn solve_finds_the_optimum() {
        let mut lp = LpOracle::new();
        let x = lp.add_var(1.0, (0.0, 1.0));
        let y = lp.add_var(2.0, (0.0, 1.0));
        lp.add_constraint(&[(x, 1.0), (y, 1.0)], ComparisonOp::Ge, 1.5);

        let Outcome::Optimal(a) = lp.solve() else { panic!("should be feasible") };
        assert!((a.objective() - 2.0).abs() < EPS);
        assert!((a[x] - 1.0).abs() < EPS);
        assert!((a[y] - 0.5).abs() < EPS);
    }
    #[test]
    fn equalities_are_enforced_by_later_solves() {
        let mut lp = LpOracle::new();
        let x = lp.add_var(1.0, (0.0, 1.0));
        let y = lp.add_var(2.0, (0.0, 1.0));
        lp.add_constraint(&[(x, 1.0), (y, 1.0)], ComparisonOp::Ge, 1.0);
        lp.add_equality(x, 0.0);

        let Outcome::Optimal(a) = lp.solve() else { panic!("should be feasible") };
        assert!(a[x].abs() < EPS);
        assert!((a[y] - 1.0).abs() < EPS);
        assert!((a.objective() - 2.0).abs() < EPS);
    }
    #[test]
    fn contradicting_equalities_make_it_infeasible() {
        let mut lp = LpOracle::new();
        let x = lp.add_var(1.0, (0.0, 1.0));
        let y = lp.add_var(1.0, (0.0, 1.0));
        lp.add_constraint(&[(x, 1.0), (y, 1.0)], ComparisonOp::Ge, 1.0);
        lp.add_equality(x, 0.0);
        lp.add_equality(y, 0.0);
        assert_eq!(Outcome::Infeasible, lp.solve());
    }
    #[test]
    fn an_overrun_of_the_time_limit_does_not_abort_the_solve() {
        let mut lp = LpOracle::new().with_time_limit(Some(std::time::Duration::ZERO));
        let x = lp.add_var(1.0, (0.0, 1.0));
        lp.add_constraint(&[(x, 1.0)], ComparisonOp::Ge, 0.25);
        assert!(matches!(lp.solve(), Outcome::Optimal(_)));
    }
}
