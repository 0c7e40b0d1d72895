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

//! This module provides the greedy-batch ("fast") freeze policy.

use binary_heap_plus::BinaryHeap;

use crate::{Edge, FreezePolicy, MaxLoad, Snapshot, Target, ToDo};

/// This policy freezes several variables per iteration in order to reduce
/// the number of relaxations that must be solved. It trades granularity for
/// speed.
///
/// With `n` undecided variables, each call selects `max(1, floor(n * speed))`
/// targets. Edges and caches are kept in two queues, each ordered by
/// decreasing fractional value (ties broken by ascending index), and the
/// queues are consumed as follows:
///
/// * when no edge is left, the top cache is taken;
/// * else, when no cache is left or when the top edge has a value strictly
///   lower than that of the top cache, the top edge is taken;
/// * otherwise, the top cache is taken (ties favor caches).
///
/// # Note:
/// The whole batch is selected against one single snapshot. The values are
/// never re-derived in the middle of a batch even though earlier freezes of
/// that batch would affect the next relaxation.
#[derive(Debug, Clone, Copy)]
pub struct GreedyBatch {
    speed: f64,
}
impl GreedyBatch {
    /// Creates a new batch policy freezing a fraction `speed` of the
    /// undecided variables at each iteration.
    ///
    /// # Panics
    /// When speed does not belong to the (0, 1] interval.
    pub fn new(speed: f64) -> Self {
        assert!(speed > 0.0 && speed <= 1.0, "speed must belong to (0, 1], got {speed}");
        Self { speed }
    }
    /// The fraction of undecided variables frozen per iteration
    pub fn speed(&self) -> f64 {
        self.speed
    }
    /// The number of variables to freeze when `undecided` remain
    pub fn quota(&self, undecided: usize) -> usize {
        ((undecided as f64 * self.speed).floor() as usize).max(1)
    }
}
impl FreezePolicy for GreedyBatch {
    fn select(&self, snapshot: &Snapshot, todo: &ToDo) -> Vec<Target> {
        let quota      = self.quota(todo.len());
        let mut edges  = BinaryHeap::from_vec_cmp(todo.edges().copied().collect::<Vec<Edge>>(),   MaxLoad::new(snapshot));
        let mut caches = BinaryHeap::from_vec_cmp(todo.caches().copied().collect::<Vec<usize>>(), MaxLoad::new(snapshot));

        let mut chosen = Vec::with_capacity(quota);
        for _ in 0..quota {
            let take_edge = match (edges.peek(), caches.peek()) {
                (None, None)       => break,
                (None, Some(_))    => false,
                (Some(_), None)    => true,
                (Some(e), Some(c)) => snapshot.load(*e) < snapshot.cache(*c),
            };

            if take_edge {
                chosen.extend(edges.pop().map(Target::Edge));
            } else {
                chosen.extend(caches.pop().map(Target::Cache));
            }
        }
        chosen
    }
}

#[cfg(test)]
mod test_greedy_batch {
    use crate::*;
    use crate::test_utils::*;

    #[test]
    fn the_quota_is_a_fraction_of_the_undecided_variables() {
        assert_eq!(5, GreedyBatch::new(0.5).quota(10));
        assert_eq!(3, GreedyBatch::new(0.3).quota(11));
        assert_eq!(10, GreedyBatch::new(1.0).quota(10));
        assert_eq!(0.3, GreedyBatch::new(0.3).speed());
    }
    #[test]
    fn the_quota_is_at_least_one() {
        assert_eq!(1, GreedyBatch::new(0.01).quota(10));
        assert_eq!(1, GreedyBatch::new(0.5).quota(1));
    }
    #[test]
    #[should_panic]
    fn a_null_speed_is_refused() {
        GreedyBatch::new(0.0);
    }
    #[test]
    #[should_panic]
    fn a_speed_above_one_is_refused() {
        GreedyBatch::new(1.5);
    }
    #[test]
    fn exactly_quota_variables_are_selected() {
        // 4 edges + 4 caches = 8 undecided; 8 * 0.5 = 4
        let reg = ring_registry(4, true);
        let mut oracle = PinningOracle::uniform(&reg, 0.5);
        let snap = capture(&reg, &mut oracle);

        let chosen = GreedyBatch::new(0.5).select(&snap, reg.todo());
        assert_eq!(4, chosen.len());
        assert!(chosen.iter().all(|t| reg.todo().contains(*t)));
    }
    #[test]
    fn the_selection_never_exceeds_what_is_left() {
        let reg = ring_registry(4, false);
        let mut oracle = PinningOracle::uniform(&reg, 0.5);
        let snap = capture(&reg, &mut oracle);

        let chosen = GreedyBatch::new(1.0).select(&snap, reg.todo());
        assert_eq!(4, chosen.len());
        let mut sorted = chosen.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(4, sorted.len());
    }
    #[test]
    fn edges_are_taken_in_decreasing_load_order_when_no_cache_is_left() {
        let reg = ring_registry(4, false);
        let mut oracle = PinningOracle::uniform(&reg, 0.2);
        oracle.set(reg.x_var(Edge::new(2, 3)).unwrap(), 0.9);
        oracle.set(reg.x_var(Edge::new(0, 1)).unwrap(), 0.6);
        let snap = capture(&reg, &mut oracle);

        let chosen = GreedyBatch::new(0.75).select(&snap, reg.todo());
        assert_eq!(vec![
            Target::Edge(Edge::new(2, 3)),
            Target::Edge(Edge::new(0, 1)),
            Target::Edge(Edge::new(0, 3)),
        ], chosen);
    }
    #[test]
    fn caches_are_taken_in_decreasing_load_order_when_no_edge_is_left() {
        let reg = registry(3, &[], true);
        let mut oracle = PinningOracle::uniform(&reg, 0.2);
        oracle.set(reg.y_var(2).unwrap(), 0.7);
        let snap = capture(&reg, &mut oracle);

        let chosen = GreedyBatch::new(0.7).select(&snap, reg.todo());
        assert_eq!(vec![Target::Cache(2), Target::Cache(0)], chosen);
    }
    #[test]
    fn the_edge_is_taken_when_it_is_strictly_less_loaded_than_the_cache() {
        let reg = registry(2, &[(0, 1)], true);
        let mut oracle = PinningOracle::uniform(&reg, 0.0);
        oracle.set(reg.x_var(Edge::new(0, 1)).unwrap(), 0.4);
        oracle.set(reg.y_var(0).unwrap(), 0.8);
        oracle.set(reg.y_var(1).unwrap(), 0.1);
        let snap = capture(&reg, &mut oracle);

        // 3 undecided * 0.34 = 1
        let chosen = GreedyBatch::new(0.34).select(&snap, reg.todo());
        assert_eq!(vec![Target::Edge(Edge::new(0, 1))], chosen);
    }
    #[test]
    fn ties_between_edge_and_cache_favor_the_cache() {
        let reg = registry(2, &[(0, 1)], true);
        let mut oracle = PinningOracle::uniform(&reg, 0.0);
        oracle.set(reg.x_var(Edge::new(0, 1)).unwrap(), 0.5);
        oracle.set(reg.y_var(1).unwrap(), 0.5);
        let snap = capture(&reg, &mut oracle);

        let chosen = GreedyBatch::new(0.34).select(&snap, reg.todo());
        assert_eq!(vec![Target::Cache(1)], chosen);
    }
    #[test]
    fn a_full_batch_interleaves_both_queues() {
        let reg = registry(2, &[(0, 1)], true);
        let mut oracle = PinningOracle::uniform(&reg, 0.0);
        oracle.set(reg.x_var(Edge::new(0, 1)).unwrap(), 0.4);
        oracle.set(reg.y_var(0).unwrap(), 0.8);
        oracle.set(reg.y_var(1).unwrap(), 0.1);
        let snap = capture(&reg, &mut oracle);

        // edge (0.4) < cache 0 (0.8) -> edge; then no edge left -> caches
        let chosen = GreedyBatch::new(1.0).select(&snap, reg.todo());
        assert_eq!(vec![
            Target::Edge(Edge::new(0, 1)),
            Target::Cache(0),
            Target::Cache(1),
        ], chosen);
    }
    #[test]
    fn policy_kind_builds_the_right_policy() {
        let reg = registry(2, &[(0, 1)], true);
        let mut oracle = PinningOracle::uniform(&reg, 0.5);
        let snap = capture(&reg, &mut oracle);

        assert_eq!(1, PolicyKind::Single.policy().select(&snap, reg.todo()).len());
        assert_eq!(3, PolicyKind::Batch { speed: 1.0 }.policy().select(&snap, reg.todo()).len());
    }
}
