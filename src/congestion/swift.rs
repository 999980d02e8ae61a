//! Swift拥塞控制器 - 组合窗口控制、标记估计与标记状态机
//! Swift congestion controller - composes window control, marking estimation
//! and the marking state machine into the lifecycle a connection drives.

use super::estimate::{CongestionEstimate, MarkingEstimator};
use super::marking::{AckReissue, MarkingStateMachine};
use super::window::WindowController;
use super::CongestionControl;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::transport::{
    CongestionEvent, EcnMode, EcnState, EctCodepoint, TransportState,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info, trace};

/// Capacity of the estimate channel; slow subscribers observe a lag error.
const ESTIMATE_CHANNEL_CAPACITY: usize = 64;

/// A Swift congestion controller for one connection.
///
/// 单个连接的 Swift 拥塞控制器。
#[derive(Debug)]
pub struct Swift {
    config: Config,
    window: WindowController,
    marking: MarkingStateMachine,
    estimator: MarkingEstimator,
    clock: Arc<dyn Clock>,
    initialized: bool,
    estimates: broadcast::Sender<CongestionEstimate>,
}

impl Swift {
    /// Creates a controller after validating `config`.
    ///
    /// 校验 `config` 后创建控制器。
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let window = WindowController::new(config.clone())?;
        let estimator = MarkingEstimator::new(config.gain, config.initial_alpha)?;
        let (estimates, _) = broadcast::channel(ESTIMATE_CHANNEL_CAPACITY);
        Ok(Self {
            config,
            window,
            marking: MarkingStateMachine::new(),
            estimator,
            clock,
            initialized: false,
            estimates,
        })
    }

    /// Replaces the configuration. Only allowed before initialization.
    ///
    /// 替换配置，仅允许在初始化之前进行。
    pub fn set_config(&mut self, config: Config) -> Result<()> {
        if self.initialized {
            error!("Configuration change attempted after initialization");
            return Err(Error::Misuse(
                "configuration cannot change after initialization",
            ));
        }
        let window = WindowController::new(config.clone())?;
        let estimator = MarkingEstimator::new(config.gain, config.initial_alpha)?;
        self.window = window;
        self.estimator = estimator;
        self.config = config;
        Ok(())
    }

    /// Overrides the starting marking-fraction estimate.
    ///
    /// 覆盖标记比例估计的初始值。
    pub fn set_initial_alpha(&mut self, alpha: f64) -> Result<()> {
        if self.initialized {
            error!(alpha, "Initial alpha set after initialization");
            return Err(Error::Misuse("initial alpha set after initialization"));
        }
        let config = Config {
            initial_alpha: alpha,
            ..self.config.clone()
        };
        config.validate()?;
        self.estimator.set_alpha(alpha);
        self.config = config;
        Ok(())
    }

    /// Subscribes to marking-fraction estimates. Nothing is buffered for
    /// estimates published before the call.
    ///
    /// 订阅标记比例估计的更新。
    pub fn subscribe(&self) -> broadcast::Receiver<CongestionEstimate> {
        self.estimates.subscribe()
    }

    /// A deep copy with its own estimate channel and no subscribers.
    ///
    /// 深拷贝，拥有独立的估计通道且没有订阅者。
    pub fn duplicate(&self) -> Swift {
        let (estimates, _) = broadcast::channel(ESTIMATE_CHANNEL_CAPACITY);
        Swift {
            config: self.config.clone(),
            window: self.window.clone(),
            marking: self.marking.clone(),
            estimator: self.estimator.clone(),
            clock: Arc::clone(&self.clock),
            initialized: self.initialized,
            estimates,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn window_controller(&self) -> &WindowController {
        &self.window
    }

    pub fn marking(&self) -> &MarkingStateMachine {
        &self.marking
    }

    pub fn alpha(&self) -> f64 {
        self.estimator.alpha()
    }

    pub fn target_delay(&self) -> Duration {
        self.window.target_delay()
    }

    pub fn stats(&self) -> SwiftStats {
        SwiftStats {
            congestion_window: self.window.congestion_window(),
            target_delay: self.window.target_delay(),
            alpha: self.estimator.alpha(),
            retransmit_count: self.window.retransmit_count(),
            can_decrease: self.window.can_decrease(),
            congestion_experienced: self.marking.congestion_experienced(),
            delayed_ack_reserved: self.marking.delayed_ack_reserved(),
        }
    }
}

impl CongestionControl for Swift {
    fn initialize(&mut self, transport: &mut dyn TransportState) {
        let codepoint = if self.config.use_ect0 {
            EctCodepoint::Ect0
        } else {
            EctCodepoint::Ect1
        };
        transport.set_ecn(EcnMode::Swift, codepoint);
        if !self.initialized {
            self.window.sync_window(transport.congestion_window());
            self.initialized = true;
            info!(?codepoint, "Swift initialized with ECN enabled");
        }
    }

    fn on_ack(&mut self, transport: &mut dyn TransportState, segments_acked: u32) -> f64 {
        let now = self.clock.now();
        let decision = self.window.on_ack(
            transport.congestion_window(),
            transport.last_rtt(),
            segments_acked,
            transport.congestion_state(),
            now,
        );
        transport.set_congestion_window(decision.new_window);
        trace!(
            cwnd = decision.new_window,
            decreased = decision.decreased,
            "Acknowledgment processed"
        );

        let acked_bytes = u64::from(segments_acked) * u64::from(transport.segment_size());
        if let Some(estimate) = self.estimator.on_ack(
            acked_bytes,
            transport.ecn_state() == EcnState::EceReceived,
            transport.last_acked_sequence(),
            transport.next_tx_sequence(),
        ) {
            // No subscribers is fine.
            let _ = self.estimates.send(estimate);
        }

        decision.new_window
    }

    fn on_congestion_event(
        &mut self,
        transport: &mut dyn TransportState,
        event: CongestionEvent,
    ) -> Option<AckReissue> {
        match event {
            CongestionEvent::EcnIsCe => self.marking.marking_started(transport),
            CongestionEvent::EcnNoCe => self.marking.marking_ended(transport),
            CongestionEvent::DelayedAck => {
                self.marking.delayed_ack_begin();
                None
            }
            CongestionEvent::NonDelayedAck => {
                self.marking.delayed_ack_end();
                None
            }
            _ => None,
        }
    }

    fn fork(&self) -> Box<dyn CongestionControl> {
        Box::new(self.duplicate())
    }

    fn congestion_window(&self) -> f64 {
        self.window.congestion_window()
    }

    fn name(&self) -> &'static str {
        "Swift"
    }
}

/// Swift拥塞控制统计信息
/// Swift congestion control statistics
#[derive(Debug, Clone, PartialEq)]
pub struct SwiftStats {
    pub congestion_window: f64,
    pub target_delay: Duration,
    pub alpha: f64,
    pub retransmit_count: u32,
    pub can_decrease: bool,
    pub congestion_experienced: bool,
    pub delayed_ack_reserved: bool,
}

impl fmt::Display for SwiftStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Swift[cwnd:{:.2}, target:{:.3}ms, alpha:{:.4}, retx:{}, can_decrease:{}, ce:{}, delayed_ack:{}]",
            self.congestion_window,
            self.target_delay.as_secs_f64() * 1000.0,
            self.alpha,
            self.retransmit_count,
            self.can_decrease,
            self.congestion_experienced,
            self.delayed_ack_reserved
        )
    }
}
