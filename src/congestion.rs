//! Defines the pluggable congestion control interface.
//! 定义了可插拔的拥塞控制接口。

use crate::transport::{CongestionEvent, TransportState};

pub mod estimate;
pub mod marking;
pub mod swift;
pub mod target_delay;
pub mod window;


pub use estimate::{CongestionEstimate, MarkingEstimator};
pub use marking::{AckReissue, MarkingStateMachine};
pub use swift::{Swift, SwiftStats};
pub use target_delay::DelayTargetEstimator;
pub use window::{WindowController, WindowDecision};

/// A trait for congestion control algorithms.
///
/// The connection lends a view of its state for the duration of each call.
///
/// 拥塞控制算法的 trait。每次调用期间连接借出其状态视图。
pub trait CongestionControl: Send + Sync + 'static {
    /// Called once the connection is ready to use the controller.
    ///
    /// 在连接准备好使用控制器时调用。
    fn initialize(&mut self, transport: &mut dyn TransportState);

    /// Called for every acknowledgment; returns the new window, which has
    /// also been written back to `transport`.
    ///
    /// 每次收到确认时调用，返回新窗口（同时已写回 `transport`）。
    fn on_ack(&mut self, transport: &mut dyn TransportState, segments_acked: u32) -> f64;

    /// Called for congestion-relevant events other than acknowledgments.
    ///
    /// 在确认之外的拥塞相关事件发生时调用。
    fn on_congestion_event(
        &mut self,
        transport: &mut dyn TransportState,
        event: CongestionEvent,
    ) -> Option<AckReissue>;

    /// Returns an independent copy for a derived connection.
    ///
    /// 为派生连接返回一个独立的副本。
    fn fork(&self) -> Box<dyn CongestionControl>;

    /// Gets the current congestion window in segments.
    ///
    /// 获取当前的拥塞窗口大小（以报文段为单位）。
    fn congestion_window(&self) -> f64;

    fn name(&self) -> &'static str;
}
