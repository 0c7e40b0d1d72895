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

//! This module provides the driver of the rounding heuristic. That is the
//! loop which alternates between solving a relaxation and freezing binary
//! variables until none of them remains fractional.
//!
//! The driver is single threaded: each iteration blocks on exactly one call
//! to the oracle.

use crate::{Assignment, Completion, Failure, FreezePolicy, Oracle, Outcome, Registry, Snapshot, SpanningTree, Status, Target};

/// What the driver must do next
enum WorkLoad {
    /// There is nothing left to decide: the loop can safely terminate
    Complete,
    /// The run failed, no further relaxation should be solved
    Aborted,
    /// Some variables are still undecided
    Pending,
}

pub struct RoundingDriver<'a> {
    /// The oracle solving the relaxations. It holds the constraint model.
    oracle: &'a mut dyn Oracle,
    /// The registry of binary decision variables
    registry: &'a mut Registry,
    /// The policy used to pick the variables to freeze when a relaxation
    /// leaves some of them fractional
    policy: &'a dyn FreezePolicy,
    /// A value within `tolerance` of 0 (resp. 1) is deemed integral by the
    /// auto-freeze pass. Zero means an exact comparison.
    tolerance: f64,

    /// The number of times the oracle has been invoked
    relaxations: usize,
    /// Whether or not the spanning tree bootstrap has been carried out
    bootstrapped: bool,
    /// If set, the reason why this run failed
    failure: Option<Failure>,
}

impl <'a> RoundingDriver<'a> {
    pub fn new(
        oracle: &'a mut dyn Oracle,
        registry: &'a mut Registry,
        policy: &'a dyn FreezePolicy,
    ) -> Self {
        Self::custom(oracle, registry, policy, 0.0)
    }

    pub fn custom(
        oracle: &'a mut dyn Oracle,
        registry: &'a mut Registry,
        policy: &'a dyn FreezePolicy,
        tolerance: f64,
    ) -> Self {
        RoundingDriver {
            oracle,
            registry,
            policy,
            tolerance,
            //
            relaxations: 0,
            bootstrapped: false,
            failure: None,
        }
    }

    /// The number of relaxations solved so far
    pub fn relaxations(&self) -> usize {
        self.relaxations
    }
    /// The registry of binary variables
    pub fn registry(&self) -> &Registry {
        self.registry
    }
    /// If the run failed, this tells why
    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }
    /// Returns true iff there is nothing left to decide (either because all
    /// variables have been frozen or because the run failed).
    pub fn is_finished(&self) -> bool {
        self.registry.todo().is_empty()
    }

    /// Solves the current relaxation.
    fn solve(&mut self) -> Result<Assignment, Failure> {
        self.relaxations += 1;
        match self.oracle.solve() {
            Outcome::Optimal(assignment) => {
                log::info!("Relaxation {} status = Optimal value = {}", self.relaxations, assignment.objective());
                Ok(assignment)
            },
            Outcome::Infeasible => {
                log::info!("Relaxation {} status = Infeasible", self.relaxations);
                Err(Failure::Infeasible)
            },
            Outcome::Other(reason) => {
                log::info!("Relaxation {} status = {}", self.relaxations, reason);
                Err(Failure::Solver(reason))
            },
        }
    }

    /// Solves the relaxation and captures a snapshot of it. A failure to
    /// solve terminates the run.
    fn relax(&mut self) -> Option<Snapshot> {
        match self.solve() {
            Ok(assignment) => Some(Snapshot::capture(self.registry, &assignment)),
            Err(failure)   => {
                self.fail(failure);
                None
            }
        }
    }

    /// Declares the run finished, but failed.
    fn fail(&mut self, failure: Failure) {
        log::error!("Rounding failed: {failure}");
        self.registry.clear_todo();
        self.failure = Some(failure);
    }

    /// Returns true iff the target was still undecided
    fn freeze(&mut self, target: Target, value: isize, load: f64) -> bool {
        let frozen = self.registry.freeze(&mut *self.oracle, target, value);
        if frozen {
            if value == 1 {
                log::debug!("Taking {target} with load = {load}");
            } else {
                log::debug!("Killing {target} with load = {load}");
            }
        }
        frozen
    }

    /// Grows a spanning tree over the routers based on the first relaxation
    /// and freezes its edges to 1. This guarantees that the final solution
    /// connects all routers. It only has an effect the first time it is called.
    pub fn bootstrap(&mut self) {
        if self.bootstrapped {
            return;
        }
        self.bootstrapped = true;

        let Some(snapshot) = self.relax() else {
            return;
        };
        let tree = SpanningTree::new(self.registry).grow(&snapshot);
        match tree {
            Ok(tree) => {
                for edge in tree {
                    self.freeze(Target::Edge(edge), 1, snapshot.load(edge));
                }
                log::info!("Spanning tree calculated, {} variables left", self.registry.todo().len());
            },
            Err(failure) => self.fail(failure),
        }
    }

    /// Freezes every undecided variable whose relaxed value is already
    /// integral. The variables are visited in ascending order.
    fn auto_freeze(&mut self, snapshot: &Snapshot) {
        for target in self.registry.todo().sorted() {
            let v = snapshot.value(target);
            if (v - 1.0).abs() <= self.tolerance {
                self.freeze(target, 1, v);
            } else if v.abs() <= self.tolerance {
                self.freeze(target, 0, v);
            }
        }
    }

    fn get_workload(&self) -> WorkLoad {
        if self.failure.is_some() {
            WorkLoad::Aborted
        } else if self.is_finished() {
            WorkLoad::Complete
        } else {
            WorkLoad::Pending
        }
    }

    /// Performs one iteration of the rounding loop: it solves the relaxation,
    /// freezes the variables which happen to be integral and, if some remain
    /// fractional, lets the policy pick those to freeze to 1. A policy
    /// picking no undecided variable fails the run with `Failure::Stalled`.
    ///
    /// This is a no-op once the run is finished.
    pub fn step(&mut self) {
        if !matches!(self.get_workload(), WorkLoad::Pending) {
            return;
        }
        let Some(snapshot) = self.relax() else {
            return;
        };

        self.auto_freeze(&snapshot);
        if self.is_finished() {
            return;
        }

        let mut progress = false;
        for target in self.policy.select(&snapshot, self.registry.todo()) {
            progress |= self.freeze(target, 1, snapshot.value(target));
        }
        // without progress, the next relaxation would be the same
        if !progress {
            let undecided = self.registry.todo().len();
            self.fail(Failure::Stalled { undecided });
        }
    }

    /// Runs the complete heuristic: the bootstrap, then as many iterations
    /// as needed to freeze all binary variables and eventually one last
    /// relaxation whose assignment is the final solution.
    pub fn round(&mut self) -> Completion {
        self.bootstrap();

        loop {
            match self.get_workload() {
                WorkLoad::Complete => break,
                WorkLoad::Aborted  => break,
                WorkLoad::Pending  => self.step(),
            }
        }

        if let Some(failure) = self.failure.clone() {
            return Completion { status: Status::Failed(failure), relaxations: self.relaxations, assignment: None };
        }

        match self.solve() {
            Ok(assignment) => {
                log::info!("Final objective value = {}", assignment.objective());
                Completion { status: Status::Integral, relaxations: self.relaxations, assignment: Some(assignment) }
            },
            Err(failure) => {
                log::error!("Final relaxation failed: {failure}");
                self.failure = Some(failure.clone());
                Completion { status: Status::Failed(failure), relaxations: self.relaxations, assignment: None }
            }
        }
    }
}
