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

//! # STH
//! STH is a relaxation-guided rounding heuristic for the joint design of a
//! network topology and the placement of content caches. It repeatedly
//! solves the linear relaxation of the design problem and freezes the binary
//! variables (links and caches) until none of them remains fractional.
//!
//! A run proceeds as follows:
//! 1. The first relaxation is used to grow a maximum load spanning tree
//!    over the routers. All of its links are frozen to 1, which guarantees
//!    that the final design connects every router.
//! 2. Each subsequent relaxation freezes the variables whose value is already
//!    integral, and then lets a `FreezePolicy` pick the most loaded fractional
//!    link(s) or cache(s) which are frozen to 1.
//! 3. Once all binary variables are frozen, one last relaxation yields the
//!    final design. Should any relaxation be infeasible, the run fails.
//!
//! ## Quick Example
//! The relaxations are solved by an `Oracle`. The crate provides one backed
//! by a linear programming solver (see `NetworkModel`), but any type
//! implementing the trait will do.
//! ```
//! # use sth::*;
//! // 1. Describe the instance: three routers on a path, with some demand
//! //    between both extremities.
//! let mut instance = Instance::empty(3, 0);
//! instance.add_link(0, 1, 2.0);
//! instance.add_link(1, 2, 2.0);
//! instance.r2r[(0, 2)] = 1.0;
//! // 2. Build its model
//! let config = ModelConfigBuilder::default()
//!     .alpha(0.5)
//!     .cache_cost(1.0)
//!     .activation_cost(1.0)
//!     .cache_bandwidth(10.0)
//!     .build()
//!     .unwrap();
//! let mut model = NetworkModel::build(&instance, &config);
//! // 3. Round it (here, freezing half of the undecided variables at a time)
//! let heuristic = HeuristicConfigBuilder::default()
//!     .policy(PolicyKind::Batch { speed: 0.5 })
//!     .build()
//!     .unwrap();
//! let completion = model.round(&heuristic);
//!
//! assert!(completion.is_success());
//! assert!(model.registry().todo().is_empty());
//! ```

mod common;
mod abstraction;
mod implementation;
mod config;
mod model;
pub mod io_utils;

pub use common::*;
pub use abstraction::*;
pub use implementation::*;
pub use config::*;
pub use model::*;

#[cfg(test)]
mod test_utils;
