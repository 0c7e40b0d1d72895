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

//! This module provides the implementation of the freeze policies that can
//! be used to tune the behavior of the rounding heuristic.

mod single;
mod batch;

pub use single::*;
pub use batch::*;

use crate::FreezePolicy;

/// This enumeration selects which freeze policy is used by a rounding run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PolicyKind {
    /// Freeze the single most loaded edge or cache per iteration
    #[default]
    Single,
    /// Freeze a fraction `speed` of the undecided variables per iteration
    Batch { speed: f64 },
}
impl PolicyKind {
    /// Instantiates the selected policy
    ///
    /// # Panics
    /// When a batch speed does not belong to (0, 1]. `HeuristicConfigBuilder`
    /// rejects such speeds beforehand.
    pub fn policy(self) -> Box<dyn FreezePolicy> {
        match self {
            PolicyKind::Single          => Box::new(GreedySingle),
            PolicyKind::Batch { speed } => Box::new(GreedyBatch::new(speed)),
        }
    }
}
