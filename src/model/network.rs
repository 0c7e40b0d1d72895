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

//! This module builds the linear relaxation of the network design problem
//! and ties it to the registry of binary decisions.
//!
//! The model minimizes `link_cost * sum(x) + cache_cost * sum(y) +
//! activation_cost * sum(z)` subject to:
//! * flow conservation for each source and router, where part of the demand
//!   of a source may be served from its local cache (`cr`, `cc`) and the
//!   flexible demand is served by the cdn servers (`sv`);
//! * link capacities `sum_src f[src][a][b] + f[src][b][a] <= topo[a][b] * x[a][b]`;
//! * server capacities;
//! * cache bandwidth `sum(cr[i]) + sum(cc[i]) <= cache_bandwidth * z[i]`;
//! * `z[i] <= y[i]`.
//!
//! Flow variables only exist on the arcs of potential links, and the
//! service variables only at the server locations.

use fxhash::FxHashMap;
use microlp::ComparisonOp;

use crate::{Completion, Edge, HeuristicConfig, Instance, LpOracle, ModelConfig, Registry, RoundingDriver, VarId};

/// The continuous (non binary) variables of the model
#[derive(Debug, Clone)]
pub struct FlowVars {
    routers: usize,
    cdns: usize,
    /// flow[(src, i, j)] is the traffic from `src` carried from i to j
    flow: FxHashMap<(usize, usize, usize), VarId>,
    /// The strict demand of each source served by its own cache (n x n)
    cached: Vec<VarId>,
    /// The flexible demand of each source served by its own cache (n x cdns)
    cached_cdn: Vec<VarId>,
    /// served[(cdn, src, loc)] is the traffic of src served by the server
    /// of cdn located at loc
    served: FxHashMap<(usize, usize, usize), VarId>,
}
impl FlowVars {
    pub fn flow(&self, src: usize, i: usize, j: usize) -> Option<VarId> {
        self.flow.get(&(src, i, j)).copied()
    }
    pub fn cached(&self, src: usize, dst: usize) -> VarId {
        self.cached[src * self.routers + dst]
    }
    pub fn cached_cdn(&self, src: usize, cdn: usize) -> VarId {
        self.cached_cdn[src * self.cdns + cdn]
    }
    pub fn served(&self, cdn: usize, src: usize, loc: usize) -> Option<VarId> {
        self.served.get(&(cdn, src, loc)).copied()
    }
}

/// The complete model of one instance: the LP oracle, the registry of its
/// binary variables and its flow variables.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    registry: Registry,
    flows: FlowVars,
    oracle: LpOracle,
}

impl NetworkModel {
    pub fn build(instance: &Instance, config: &ModelConfig) -> Self {
        let n = instance.routers;
        let c = instance.cdns;
        let mut lp = LpOracle::new().with_time_limit(config.time_limit);

        // binary decisions
        let edges = instance.edges();
        let x = edges.iter()
            .map(|e| (*e, lp.add_var(config.link_cost, (0.0, 1.0))))
            .collect::<Vec<_>>();
        let y = (0..n).map(|_| lp.add_var(config.cache_cost, (0.0, 1.0))).collect::<Vec<_>>();
        let z = (0..n).map(|_| lp.add_var(config.activation_cost, (0.0, 1.0))).collect::<Vec<_>>();

        // continuous variables
        let mut flow = FxHashMap::default();
        for src in 0..n {
            for e in edges.iter() {
                flow.insert((src, e.a, e.b), lp.add_var(0.0, (0.0, f64::INFINITY)));
                flow.insert((src, e.b, e.a), lp.add_var(0.0, (0.0, f64::INFINITY)));
            }
        }
        let mut cached = Vec::with_capacity(n * n);
        for src in 0..n {
            for dst in 0..n {
                cached.push(lp.add_var(0.0, (0.0, config.alpha * instance.r2r[(src, dst)])));
            }
        }
        let mut cached_cdn = Vec::with_capacity(n * c);
        for src in 0..n {
            for cdn in 0..c {
                cached_cdn.push(lp.add_var(0.0, (0.0, config.alpha * instance.r2cdn[(src, cdn)])));
            }
        }
        let mut served = FxHashMap::default();
        for (cdn, locations) in instance.locations.iter().enumerate() {
            for loc in locations.iter().copied() {
                for src in 0..n {
                    served.insert((cdn, src, loc), lp.add_var(0.0, (0.0, f64::INFINITY)));
                }
            }
        }

        let x_vars = x.clone();
        let registry = Registry::new(n, x, y.iter().copied().map(Some).collect(), z.iter().copied().map(Some).collect());
        let flows = FlowVars { routers: n, cdns: c, flow, cached, cached_cdn, served };

        // flow conservation: incoming - outgoing == demand
        for src in 0..n {
            for middle in 0..n {
                let mut terms = vec![];
                for other in registry.neighbours(middle).iter().copied() {
                    terms.push((flows.flow[&(src, other, middle)], 1.0));
                    terms.push((flows.flow[&(src, middle, other)], -1.0));
                }
                let total = if middle == src {
                    for dst in 0..n {
                        terms.push((flows.cached(src, dst), -1.0));
                    }
                    for cdn in 0..c {
                        terms.push((flows.cached_cdn(src, cdn), -1.0));
                    }
                    -instance.r2r.row_sum(src) - instance.r2cdn.row_sum(src)
                } else {
                    terms.push((flows.cached(src, middle), 1.0));
                    for cdn in 0..c {
                        if let Some(sv) = flows.served(cdn, src, middle) {
                            terms.push((sv, -1.0));
                        }
                    }
                    instance.r2r[(src, middle)]
                };
                lp.add_constraint(&terms, ComparisonOp::Eq, total);
            }
        }

        // link capacities
        for (e, var) in x_vars {
            let mut terms = vec![(var, -instance.topo[(e.a, e.b)])];
            for src in 0..n {
                terms.push((flows.flow[&(src, e.a, e.b)], 1.0));
                terms.push((flows.flow[&(src, e.b, e.a)], 1.0));
            }
            lp.add_constraint(&terms, ComparisonOp::Le, 0.0);
        }

        // server capacities
        for (cdn, locations) in instance.locations.iter().enumerate() {
            for (loc, capacity) in locations.iter().copied().zip(instance.capacities[cdn].iter().copied()) {
                let terms = (0..n)
                    .filter_map(|src| flows.served(cdn, src, loc))
                    .map(|sv| (sv, 1.0))
                    .collect::<Vec<_>>();
                lp.add_constraint(&terms, ComparisonOp::Le, capacity);
            }
        }

        // cache bandwidth and activation
        for src in 0..n {
            let mut terms = vec![(z[src], -config.cache_bandwidth)];
            terms.extend((0..n).map(|dst| (flows.cached(src, dst), 1.0)));
            terms.extend((0..c).map(|cdn| (flows.cached_cdn(src, cdn), 1.0)));
            lp.add_constraint(&terms, ComparisonOp::Le, 0.0);
            lp.add_constraint(&[(z[src], 1.0), (y[src], -1.0)], ComparisonOp::Le, 0.0);
        }

        log::info!("Model constructed: {} routers, {} links, {} variables", n, edges.len(), lp.nb_vars());
        NetworkModel { registry, flows, oracle: lp }
    }

    pub fn routers(&self) -> usize {
        self.registry.routers()
    }
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
    pub fn flows(&self) -> &FlowVars {
        &self.flows
    }
    pub fn edges(&self) -> &[Edge] {
        self.registry.edges()
    }

    /// Runs the rounding heuristic over this model. The equality constraints
    /// it adds remain part of the model afterwards.
    pub fn round(&mut self, heuristic: &HeuristicConfig) -> Completion {
        let policy = heuristic.policy().policy();
        let mut driver = RoundingDriver::custom(&mut self.oracle, &mut self.registry, policy.as_ref(), heuristic.tolerance());
        driver.round()
    }
}

#[cfg(test)]
mod test_network {
    use crate::*;

    const EPS: f64 = 1e-6;

    fn config() -> ModelConfig {
        ModelConfigBuilder::default()
            .alpha(0.5)
            .cache_cost(1.0)
            .activation_cost(1.0)
            .cache_bandwidth(10.0)
            .build()
            .unwrap()
    }
    fn triangle() -> Instance {
        let mut inst = Instance::empty(3, 0);
        inst.add_link(0, 1, 10.0);
        inst.add_link(1, 2, 10.0);
        inst.add_link(0, 2, 10.0);
        inst.r2r[(0, 2)] = 1.0;
        inst
    }

    #[test]
    fn variables_are_created_for_every_part_of_the_model() {
        let model = NetworkModel::build(&triangle(), &config());
        assert_eq!(3, model.routers());
        assert_eq!(&[Edge::new(0, 1), Edge::new(0, 2), Edge::new(1, 2)], model.edges());
        // 3 x + 3 y + 3 z + 18 flows + 9 cached
        assert_eq!(36, model.oracle.nb_vars());
        assert!(model.flows().flow(0, 2, 1).is_some());
        assert!(model.flows().flow(0, 1, 1).is_none());
    }
    #[test]
    fn flows_only_exist_on_potential_links() {
        let mut inst = triangle();
        inst.add_link(0, 2, 0.0);
        let model = NetworkModel::build(&inst, &config());
        assert!(model.flows().flow(1, 0, 2).is_none());
        assert!(model.flows().flow(1, 2, 0).is_none());
        assert!(model.registry().x_var(Edge::new(0, 2)).is_none());
    }
    #[test]
    fn service_variables_only_exist_at_the_server_locations() {
        let mut inst = Instance::empty(2, 1);
        inst.add_link(0, 1, 5.0);
        inst.locations[0] = vec![1];
        inst.capacities[0] = vec![3.0];
        let model = NetworkModel::build(&inst, &config());
        assert!(model.flows().served(0, 0, 1).is_some());
        assert!(model.flows().served(0, 0, 0).is_none());
    }
    #[test]
    fn the_relaxation_of_a_path_routes_the_demand_through_the_middle() {
        let mut inst = Instance::empty(3, 0);
        inst.add_link(0, 1, 2.0);
        inst.add_link(1, 2, 2.0);
        inst.r2r[(0, 2)] = 1.0;
        let mut model = NetworkModel::build(&inst, &config());

        let Outcome::Optimal(a) = model.oracle.solve() else { panic!("should be feasible") };
        let xv = model.registry().x_var(Edge::new(0, 1)).unwrap();
        // at most half the demand may be cached, the rest must fit in 2 * x
        assert!(a[xv] > 0.25 - EPS);
        let f = model.flows().flow(0, 1, 2).unwrap();
        assert!(a[f] > 0.5 - EPS);
    }
    #[test]
    fn rounding_a_path_takes_both_links() {
        let mut inst = Instance::empty(3, 0);
        inst.add_link(0, 1, 2.0);
        inst.add_link(1, 2, 2.0);
        inst.r2r[(0, 2)] = 1.0;
        let mut model = NetworkModel::build(&inst, &config());

        let completion = model.round(&HeuristicConfig::default());
        assert!(completion.is_success());
        let a = completion.assignment.unwrap();
        for e in model.edges() {
            let xv = model.registry().x_var(*e).unwrap();
            assert!((a[xv] - 1.0).abs() < EPS);
        }
        assert!(model.registry().todo().is_empty());
    }
    #[test]
    fn demand_beyond_every_capacity_is_infeasible() {
        let mut inst = Instance::empty(2, 0);
        inst.add_link(0, 1, 1.0);
        inst.r2r[(0, 1)] = 4.0;
        let mut model = NetworkModel::build(&inst, &config());

        let completion = model.round(&HeuristicConfig::default());
        assert_eq!(Status::Failed(Failure::Infeasible), completion.status);
        assert_eq!(1, completion.relaxations);
        assert!(completion.assignment.is_none());
    }
}
