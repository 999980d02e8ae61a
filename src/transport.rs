//! The view of the owning connection that the controller reads and writes.
//!
//! The controller never keeps a reference to the connection; a view is
//! borrowed for the duration of a single call.
//!
//! 控制器读写的所属连接视图。控制器不会持有连接的引用，
//! 视图只在单次调用期间被借用。

use std::fmt;
use std::ops::Add;
use std::time::Duration;

/// A 32-bit sequence position with wrap-around ordering.
///
/// 带回绕比较的 32 位序列号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SequenceNumber(pub u32);

impl SequenceNumber {
    /// Whether `self` is the same as or later than `other`, modulo 2^32.
    /// 在模 2^32 意义下 `self` 是否等于或晚于 `other`。
    pub fn is_at_or_after(self, other: SequenceNumber) -> bool {
        (self.0.wrapping_sub(other.0) as i32) >= 0
    }
}

impl Add<u32> for SequenceNumber {
    type Output = SequenceNumber;

    fn add(self, rhs: u32) -> SequenceNumber {
        SequenceNumber(self.0.wrapping_add(rhs))
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Congestion state of the connection, as tracked by its recovery logic.
/// 连接恢复逻辑所维护的拥塞状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CongestionState {
    /// Normal operation.
    #[default]
    Open,
    /// Duplicate acknowledgments or reordering observed.
    Disorder,
    /// Window reduced in response to an ECN echo.
    Cwr,
    /// Fast recovery after a detected loss.
    Recovery,
    /// Retransmission timeout.
    Loss,
}

/// Events the connection reports besides acknowledgments.
/// 除确认之外连接上报的事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CongestionEvent {
    TxStart,
    CwndRestart,
    CompleteCwr,
    Loss,
    /// A received segment no longer carries the CE mark.
    EcnNoCe,
    /// A received segment carries the CE mark.
    EcnIsCe,
    /// The connection started deferring its acknowledgment.
    DelayedAck,
    /// The connection sent an immediate acknowledgment.
    NonDelayedAck,
}

/// Receiver/sender ECN echo state of the connection.
/// 连接的 ECN 回显状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EcnState {
    #[default]
    Disabled,
    Idle,
    CeReceived,
    SendingEce,
    EceReceived,
    CwrSent,
}

/// How the connection reacts to ECN.
/// 连接对 ECN 的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcnMode {
    /// Per-segment echo driven by this controller.
    /// 由本控制器驱动的逐报文段回显。
    Swift,
}

/// The ECT codepoint placed on outgoing segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EctCodepoint {
    Ect0,
    Ect1,
}

/// Flags of an acknowledgment emitted on the controller's request.
///
/// The ACK bit is always present; ECE is optional.
///
/// 应控制器请求发送的确认报文的标志位。ACK 始终置位，ECE 可选。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckFlags {
    ece: bool,
}

impl AckFlags {
    pub const ACK: AckFlags = AckFlags { ece: false };
    pub const ACK_ECE: AckFlags = AckFlags { ece: true };

    pub fn has_ece(self) -> bool {
        self.ece
    }
}

/// Read/write access to the connection state the controller depends on.
///
/// Implemented by the transport that owns the controller.
///
/// 控制器所依赖的连接状态的读写接口，由拥有控制器的传输层实现。
pub trait TransportState {
    /// Current congestion window, in segments.
    /// 当前拥塞窗口（以报文段为单位）。
    fn congestion_window(&self) -> f64;

    /// Replaces the congestion window with the controller's decision.
    /// 用控制器的决策替换拥塞窗口。
    fn set_congestion_window(&mut self, window: f64);

    /// RTT measured for the acknowledgment being processed.
    /// 正在处理的确认所测得的RTT。
    fn last_rtt(&self) -> Duration;

    /// Segment size in bytes.
    /// 报文段大小（字节）。
    fn segment_size(&self) -> u32;

    /// Congestion state of the connection's recovery logic.
    /// 连接恢复逻辑所处的拥塞状态。
    fn congestion_state(&self) -> CongestionState;

    /// Next sequence number expected from the peer.
    /// 期望从对端收到的下一个序列号。
    fn receive_cursor(&self) -> SequenceNumber;

    /// Moves the receive cursor; acknowledgments are emitted for its value.
    /// 移动接收游标，发送的确认以其当前值为准。
    fn set_receive_cursor(&mut self, cursor: SequenceNumber);

    /// Current ECN echo state.
    /// 当前的 ECN 回显状态。
    fn ecn_state(&self) -> EcnState;

    /// Updates the ECN echo state.
    /// 更新 ECN 回显状态。
    fn set_ecn_state(&mut self, state: EcnState);

    /// Next sequence number this side will transmit.
    /// 本端将要发送的下一个序列号。
    fn next_tx_sequence(&self) -> SequenceNumber;

    /// Highest sequence number acknowledged by the peer.
    /// 对端已确认的最高序列号。
    fn last_acked_sequence(&self) -> SequenceNumber;

    /// Sends an empty acknowledgment for the current receive cursor.
    /// 按当前接收游标发送一个空确认。
    fn emit_acknowledgment(&mut self, flags: AckFlags);

    /// Enables ECN with the given mode and codepoint.
    /// 以给定模式和码点启用 ECN。
    fn set_ecn(&mut self, mode: EcnMode, codepoint: EctCodepoint);
}
