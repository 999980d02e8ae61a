//! Swift窗口控制器 - 专门处理拥塞窗口的增减
//! Swift window controller - Specialized congestion window adjustment
//!
//! 职责：
//! - 基于目标延迟的加性增长与按比例减小
//! - 丢包和快速恢复时的粗粒度削减
//! - 每个RTT最多减小一次的速率门限
//!
//! Responsibilities:
//! - Additive increase and proportional decrease around the target delay
//! - Coarse cuts on loss and fast recovery
//! - A gate allowing at most one decrease per round trip

use super::target_delay::DelayTargetEstimator;
use crate::config::{Config, duration_ms};
use crate::error::Result;
use crate::transport::CongestionState;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

/// 窗口调整决策结果
/// Window adjustment decision
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDecision {
    /// 新的拥塞窗口（报文段）
    /// New congestion window, in segments
    pub new_window: f64,

    /// 本次评估使用的目标延迟
    /// Target delay used for this evaluation
    pub target_delay: Duration,

    /// 窗口是否低于上一次评估的值
    /// Whether the window fell below the previous evaluation
    pub decreased: bool,
}

/// Swift窗口控制器
/// Swift window controller
#[derive(Debug, Clone)]
pub struct WindowController {
    config: Config,

    estimator: DelayTargetEstimator,

    /// 最近一次评估得到的窗口
    /// Window produced by the latest evaluation
    window: f64,

    /// 上一次评估时的窗口，用于检测减小
    /// Window at the previous evaluation, used to detect decreases
    previous_window: Option<f64>,

    /// 目标延迟（毫秒），每次评估重新计算
    /// Target delay in ms, recomputed on every evaluation
    target_delay_ms: f64,

    /// 连续处于丢包状态的评估次数
    /// Consecutive evaluations in the loss state
    retransmit_count: u32,

    /// 最近一次减小窗口的时刻
    /// Time of the most recent decrease
    last_decrease: Option<Instant>,

    can_decrease: bool,
}

impl WindowController {
    /// 创建新的窗口控制器
    /// Create a new window controller
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let estimator = DelayTargetEstimator::new(&config)?;
        let window = config.min_window;
        let target_delay_ms = estimator.target_delay_ms(window);
        Ok(Self {
            config,
            estimator,
            window,
            previous_window: None,
            target_delay_ms,
            retransmit_count: 0,
            last_decrease: None,
            can_decrease: true,
        })
    }

    /// Processes one acknowledgment event and returns the adjusted window.
    ///
    /// `window` is the connection's current window. It is clamped into the
    /// configured bounds before use, so the target delay is always computed
    /// for a positive window.
    ///
    /// 处理一次确认事件并返回调整后的窗口。
    pub fn on_ack(
        &mut self,
        window: f64,
        last_rtt: Duration,
        segments_acked: u32,
        state: CongestionState,
        now: Instant,
    ) -> WindowDecision {
        self.refresh_decrease_gate(now, last_rtt);

        if state != CongestionState::Loss {
            self.retransmit_count = 0;
        }

        let observed = self.clamp(window);
        let mut window = observed;
        let rtt_ms = duration_ms(last_rtt);
        self.target_delay_ms = self.estimator.target_delay_ms(window);
        let segments = f64::from(segments_acked);

        if rtt_ms < self.target_delay_ms {
            if window > 1.0 {
                window += self.config.additive_increase_step / window * segments;
            } else {
                window += self.config.additive_increase_step * segments;
            }
            trace!(
                cwnd = window,
                rtt_ms,
                target_ms = self.target_delay_ms,
                "Below target delay: additive increase"
            );
        } else if self.can_decrease {
            let excess_ms = rtt_ms - self.target_delay_ms;
            let factor = (1.0 - self.estimator.beta().abs() * excess_ms)
                .max(1.0 - self.config.max_decrease_fraction);
            window *= factor;
            debug!(
                cwnd = window,
                factor,
                excess_ms,
                "Above target delay: proportional decrease"
            );
        } else {
            trace!(
                cwnd = window,
                rtt_ms,
                target_ms = self.target_delay_ms,
                "Above target delay: decrease gated"
            );
        }

        match state {
            CongestionState::Loss => {
                self.retransmit_count += 1;
                if self.retransmit_count >= self.config.max_retransmit_retries {
                    window = self.config.min_window;
                    debug!(
                        retries = self.retransmit_count,
                        "Retransmit limit reached: window forced to minimum"
                    );
                } else if self.can_decrease {
                    window *= 1.0 - self.config.loss_decrease_fraction;
                    debug!(cwnd = window, retries = self.retransmit_count, "Loss: window cut");
                }
            }
            CongestionState::Recovery if self.can_decrease => {
                window *= 1.0 - self.config.loss_decrease_fraction;
                debug!(cwnd = window, "Recovery: window cut");
            }
            _ => {}
        }

        window = self.clamp(window);

        let reference = self.previous_window.unwrap_or(observed);
        let decreased = window < reference;
        if decreased {
            self.last_decrease = Some(now);
            self.can_decrease = false;
        }
        self.previous_window = Some(window);
        self.window = window;

        WindowDecision {
            new_window: window,
            target_delay: self.target_delay(),
            decreased,
        }
    }

    /// Re-arms the decrease gate once a round trip has passed since the last
    /// decrease. Equal timestamps only count when `rtt` is zero.
    ///
    /// 距离上次减小已超过一个RTT时重新开启减小门限。
    fn refresh_decrease_gate(&mut self, now: Instant, rtt: Duration) {
        self.can_decrease = match self.last_decrease {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= rtt,
        };
    }

    fn clamp(&self, window: f64) -> f64 {
        if window.is_nan() {
            return self.config.min_window;
        }
        window.clamp(self.config.min_window, self.config.max_window)
    }

    /// Starts tracking from the connection's window without evaluating it.
    pub(crate) fn sync_window(&mut self, window: f64) {
        self.window = self.clamp(window);
    }

    /// 获取当前拥塞窗口
    /// Get current congestion window
    pub fn congestion_window(&self) -> f64 {
        self.window
    }

    pub fn previous_window(&self) -> Option<f64> {
        self.previous_window
    }

    pub fn target_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.target_delay_ms / 1000.0).unwrap_or(Duration::MAX)
    }

    pub fn retransmit_count(&self) -> u32 {
        self.retransmit_count
    }

    pub fn can_decrease(&self) -> bool {
        self.can_decrease
    }

    pub fn last_decrease(&self) -> Option<Instant> {
        self.last_decrease
    }
}
