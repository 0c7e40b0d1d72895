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

//! This module groups the parameters of the model and those of the rounding
//! heuristic. Both are assembled with a builder which validates them.

use std::time::Duration;

use derive_builder::{Builder, UninitializedFieldError};

use crate::PolicyKind;

/// The kind of errors that can occur when building a configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A mandatory parameter was not given
    #[error("missing parameter {0}")]
    Missing(&'static str),
    /// A parameter was given a meaningless value
    #[error("invalid parameter: {0}")]
    Invalid(String),
}
impl From<UninitializedFieldError> for ConfigError {
    fn from(e: UninitializedFieldError) -> Self {
        ConfigError::Missing(e.field_name())
    }
}
impl From<String> for ConfigError {
    fn from(e: String) -> Self {
        ConfigError::Invalid(e)
    }
}

/// The parameters of the network design model
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
#[builder(build_fn(validate = "Self::validate", error = "ConfigError"))]
pub struct ModelConfig {
    /// The fraction of each demand which may be served from a cache
    pub alpha: f64,
    /// The cost of installing one link
    #[builder(default = "1.0")]
    pub link_cost: f64,
    /// The cost of installing one cache (beta)
    pub cache_cost: f64,
    /// The cost of activating one cache (gamma)
    pub activation_cost: f64,
    /// The bandwidth of an active cache
    pub cache_bandwidth: f64,
    /// The duration one relaxation is expected to take at most
    #[builder(default, setter(strip_option))]
    pub time_limit: Option<Duration>,
}
impl ModelConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(alpha) = self.alpha {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(format!("alpha must lie in [0, 1], got {alpha}"));
            }
        }
        let costs = [
            ("link_cost", self.link_cost),
            ("cache_cost", self.cache_cost),
            ("activation_cost", self.activation_cost),
            ("cache_bandwidth", self.cache_bandwidth),
        ];
        for (name, value) in costs {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(format!("{name} must be a non negative number, got {v}"));
                }
            }
        }
        Ok(())
    }
}

/// The parameters of the rounding heuristic. They can only be assembled
/// through `HeuristicConfigBuilder` (or `default()`), hence they are always
/// valid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Builder)]
#[builder(build_fn(validate = "Self::validate", error = "ConfigError"))]
pub struct HeuristicConfig {
    /// The freeze policy
    #[builder(default)]
    policy: PolicyKind,
    /// Relaxed values within this distance of 0 or 1 are deemed integral.
    /// The default (0) requires exact values.
    #[builder(default)]
    tolerance: f64,
}
impl HeuristicConfig {
    /// The freeze policy
    pub fn policy(&self) -> PolicyKind {
        self.policy
    }
    /// The integrality tolerance
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}
impl HeuristicConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(PolicyKind::Batch { speed }) = self.policy {
            if !(speed > 0.0 && speed <= 1.0) {
                return Err(format!("speed must lie in (0, 1], got {speed}"));
            }
        }
        if let Some(tolerance) = self.tolerance {
            if !(0.0..0.5).contains(&tolerance) {
                return Err(format!("tolerance must lie in [0, 0.5), got {tolerance}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_config {
    use std::time::Duration;

    use crate::*;

    fn model_builder() -> ModelConfigBuilder {
        let mut builder = ModelConfigBuilder::default();
        builder.alpha(0.5).cache_cost(2.0).activation_cost(3.0).cache_bandwidth(10.0);
        builder
    }

    #[test]
    fn model_config_has_sensible_defaults() {
        let config = model_builder().build().unwrap();
        assert_eq!(1.0, config.link_cost);
        assert_eq!(None, config.time_limit);
        assert_eq!(2.0, config.cache_cost);
    }
    #[test]
    fn time_limit_can_be_set() {
        let config = model_builder().time_limit(Duration::from_secs(3)).build().unwrap();
        assert_eq!(Some(Duration::from_secs(3)), config.time_limit);
    }
    #[test]
    fn alpha_is_mandatory() {
        let result = ModelConfigBuilder::default()
            .cache_cost(1.0).activation_cost(1.0).cache_bandwidth(1.0)
            .build();
        assert_eq!(Err(ConfigError::Missing("alpha")), result);
    }
    #[test]
    fn alpha_must_be_a_fraction() {
        assert!(matches!(model_builder().alpha(1.5).build(), Err(ConfigError::Invalid(_))));
    }
    #[test]
    fn costs_cannot_be_negative() {
        assert!(matches!(model_builder().cache_cost(-1.0).build(), Err(ConfigError::Invalid(_))));
        assert!(matches!(model_builder().link_cost(f64::NAN).build(), Err(ConfigError::Invalid(_))));
    }
    #[test]
    fn heuristic_defaults_to_a_single_freeze_per_step() {
        let config = HeuristicConfigBuilder::default().build().unwrap();
        assert_eq!(PolicyKind::Single, config.policy());
        assert_eq!(0.0, config.tolerance());
        assert_eq!(HeuristicConfig::default(), config);
    }
    #[test]
    fn speed_must_lie_in_the_unit_interval() {
        for speed in [0.0, -0.5, 1.5, f64::NAN] {
            let result = HeuristicConfigBuilder::default()
                .policy(PolicyKind::Batch { speed })
                .build();
            assert!(matches!(result, Err(ConfigError::Invalid(_))), "speed {speed} accepted");
        }
        for speed in [0.1, 1.0] {
            let result = HeuristicConfigBuilder::default()
                .policy(PolicyKind::Batch { speed })
                .build();
            assert!(result.is_ok());
        }
    }
    #[test]
    fn a_valid_batch_config_yields_a_working_policy() {
        let config = HeuristicConfigBuilder::default()
            .policy(PolicyKind::Batch { speed: 0.5 })
            .tolerance(1e-6)
            .build()
            .unwrap();
        assert_eq!(PolicyKind::Batch { speed: 0.5 }, config.policy());
        assert_eq!(1e-6, config.tolerance());

        let reg = crate::test_utils::ring_registry(4, false);
        let mut oracle = crate::test_utils::PinningOracle::uniform(&reg, 0.5);
        let snap = crate::test_utils::capture(&reg, &mut oracle);
        assert_eq!(2, config.policy().policy().select(&snap, reg.todo()).len());
    }
    #[test]
    fn tolerance_must_be_small() {
        let result = HeuristicConfigBuilder::default().tolerance(0.5).build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
