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

//! This module defines the `FreezePolicy` trait: the rounding step which is
//! invoked whenever a relaxation leaves some binary variable fractional.

use crate::{Snapshot, Target, ToDo};

/// A freeze policy decides which of the undecided variables are to be pinned
/// to one after a relaxation has been solved.
///
/// # Note:
/// A policy only ever *chooses*. The driver is the one freezing the chosen
/// targets and it always pins them to 1. The policy is called with a fresh
/// snapshot each time, which it may not retain past the call.
pub trait FreezePolicy {
    /// Returns the targets to freeze to 1 (in that order). All of them must
    /// belong to `todo`. The driver only invokes this method when `todo` is
    /// not empty, and an implementation must then select at least one target:
    /// a selection with no undecided target ends the run as stalled.
    fn select(&self, snapshot: &Snapshot, todo: &ToDo) -> Vec<Target>;
}
