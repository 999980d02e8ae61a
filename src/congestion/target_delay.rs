//! 目标排队延迟估计
//! Target queueing delay estimation
//!
//! The target grows as the window shrinks so that flows with small windows
//! are allowed more queueing, which pulls competing flows toward fairness.
//!
//! 窗口越小目标延迟越大，使小窗口的流可以容忍更多排队，从而趋向公平。

use crate::config::Config;
use crate::error::{Error, Result};
use std::time::Duration;

/// Computes the target delay for a given window.
///
/// The fairness coefficients are derived once from the configuration and
/// never recomputed per call.
///
/// 根据窗口计算目标延迟。公平性系数只在构造时由配置推导一次。
#[derive(Debug, Clone, PartialEq)]
pub struct DelayTargetEstimator {
    fixed_delay_ms: f64,
    fairness_scaling_range: f64,
    alpha_coefficient: f64,
    beta: f64,
}

impl DelayTargetEstimator {
    /// Validates `config` and derives the fairness coefficients from it.
    ///
    /// 由 `config` 推导公平性系数。
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let inv_sqrt_min = 1.0 / config.min_window.sqrt();
        let inv_sqrt_max = 1.0 / config.max_window.sqrt();
        let alpha_coefficient = config.fairness_scaling_range / (inv_sqrt_min - inv_sqrt_max);
        let beta = -alpha_coefficient * inv_sqrt_max;

        Ok(Self {
            fixed_delay_ms: config.fixed_delay_ms(),
            fairness_scaling_range: config.fairness_scaling_range,
            alpha_coefficient,
            beta,
        })
    }

    /// Target delay for `window`, which must be positive.
    ///
    /// 计算 `window` 对应的目标延迟，`window` 必须为正。
    pub fn target_delay(&self, window: f64) -> Result<Duration> {
        if window.is_nan() || window <= 0.0 || window.is_infinite() {
            return Err(Error::Precondition(format!(
                "target delay needs a positive window, got {}",
                window
            )));
        }
        Ok(Duration::try_from_secs_f64(self.target_delay_ms(window) / 1000.0)
            .unwrap_or(Duration::MAX))
    }

    /// Unchecked variant in milliseconds; `window` has already been clamped.
    pub(crate) fn target_delay_ms(&self, window: f64) -> f64 {
        let scaled = (1.0 / window.sqrt() + self.beta).clamp(0.0, self.fairness_scaling_range);
        self.fixed_delay_ms + scaled
    }

    pub fn alpha_coefficient(&self) -> f64 {
        self.alpha_coefficient
    }

    /// Negative offset of the fairness term. Its magnitude also scales the
    /// delay-based decrease.
    pub fn beta(&self) -> f64 {
        self.beta
    }
}
