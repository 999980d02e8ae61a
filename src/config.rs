//! 定义了拥塞控制器的可配置参数。
//! Defines the configurable parameters of the congestion controller.

use crate::error::{Error, Result};
use std::time::Duration;

/// All tunables of the Swift controller.
///
/// Window bounds are expressed in segments. Delay components are combined in
/// milliseconds when the target delay is computed.
///
/// Swift 控制器的全部可调参数。窗口边界以报文段为单位，
/// 计算目标延迟时各延迟分量以毫秒为单位相加。
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Smoothing gain for the marking-fraction estimate, in `[0, 1]`.
    /// 标记比例估计的平滑增益，取值 `[0, 1]`。
    pub gain: f64,
    /// Value of the marking-fraction estimate before any observation.
    /// 尚未观测时标记比例估计的初始值。
    pub initial_alpha: f64,
    /// Request ECT(0) instead of ECT(1).
    /// 使用 ECT(0) 而不是 ECT(1)。
    pub use_ect0: bool,
    /// The smallest congestion window, in segments.
    /// 最小拥塞窗口（以报文段为单位）。
    pub min_window: f64,
    /// The largest congestion window, in segments.
    /// 最大拥塞窗口（以报文段为单位）。
    pub max_window: f64,
    /// Upper bound of the window-dependent term of the target delay, in ms.
    /// 目标延迟中与窗口相关分量的上限（毫秒）。
    pub fairness_scaling_range: f64,
    /// Fixed part of the target delay.
    pub base_delay: Duration,
    /// Number of hops on the path.
    pub hop_count: u32,
    /// Delay added per hop.
    pub hop_delay_scale: Duration,
    /// Additive increase constant applied per acknowledged segment.
    /// 每个被确认报文段对应的加性增长常数。
    pub additive_increase_step: f64,
    /// Largest fraction of the window a delay-based decrease may remove.
    /// 一次基于延迟的减小最多可移除的窗口比例。
    pub max_decrease_fraction: f64,
    /// Fraction of the window removed by the coarse cut on loss or recovery.
    /// 丢包或快速恢复时粗粒度削减所移除的窗口比例。
    pub loss_decrease_fraction: f64,
    /// Consecutive loss evaluations before the window is forced to the minimum.
    /// 窗口被强制降到最小值前允许的连续丢包评估次数。
    pub max_retransmit_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gain: 0.0625,
            initial_alpha: 1.0,
            use_ect0: true,
            min_window: 1.0,
            max_window: 100_000.0,
            fairness_scaling_range: 2.0,
            base_delay: Duration::from_millis(1),
            hop_count: 3,
            hop_delay_scale: Duration::from_millis(1),
            additive_increase_step: 10.0,
            max_decrease_fraction: 0.5,
            loss_decrease_fraction: 0.5,
            max_retransmit_retries: 10,
        }
    }
}

impl Config {
    /// Checks every parameter against its domain.
    ///
    /// Values are never clamped; the first offending field is reported.
    ///
    /// 检查每个参数是否在其取值范围内。不会自动截断，返回第一个非法字段。
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("gain", self.gain)?;
        check_unit_interval("initial_alpha", self.initial_alpha)?;
        check_positive("min_window", self.min_window)?;
        check_positive("max_window", self.max_window)?;
        if self.min_window >= self.max_window {
            return Err(Error::configuration(
                "min_window",
                format!("{} (max_window = {})", self.min_window, self.max_window),
                "must be smaller than max_window",
            ));
        }
        check_positive("fairness_scaling_range", self.fairness_scaling_range)?;
        check_positive("additive_increase_step", self.additive_increase_step)?;
        check_fraction("max_decrease_fraction", self.max_decrease_fraction)?;
        check_fraction("loss_decrease_fraction", self.loss_decrease_fraction)?;
        if self.max_retransmit_retries == 0 {
            return Err(Error::configuration(
                "max_retransmit_retries",
                0,
                "must be at least 1",
            ));
        }
        let max_target_ms = self.fixed_delay_ms() + self.fairness_scaling_range;
        if !max_target_ms.is_finite()
            || Duration::try_from_secs_f64(max_target_ms / 1000.0).is_err()
        {
            return Err(Error::configuration(
                "base_delay",
                format!(
                    "{:?} + {} * {:?}",
                    self.base_delay, self.hop_count, self.hop_delay_scale
                ),
                "target delay does not fit in a Duration",
            ));
        }
        Ok(())
    }

    /// The hop-independent part of the target delay, in milliseconds.
    pub(crate) fn fixed_delay_ms(&self) -> f64 {
        duration_ms(self.base_delay) + f64::from(self.hop_count) * duration_ms(self.hop_delay_scale)
    }
}

pub(crate) fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

pub(crate) fn check_unit_interval(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::configuration(field, value, "must lie in [0, 1]"))
    }
}

fn check_fraction(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::configuration(field, value, "must lie in (0, 1]"))
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<()> {
    // NaN fails this comparison as well.
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::configuration(field, value, "must be positive and finite"))
    }
}
