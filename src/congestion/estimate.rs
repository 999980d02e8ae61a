//! Smoothed estimate of the fraction of acknowledged bytes that were marked.
//!
//! Observation windows are delimited by sequence numbers: a window opens at
//! the sender's next transmit sequence and closes on the first acknowledgment
//! that reaches it, i.e. roughly once per round trip. On close, the marked
//! fraction is folded into `alpha` and the accumulators start over.
//!
//! 被确认字节中带标记比例的平滑估计。观测窗口以序列号为界：
//! 窗口在发送方的下一个发送序号处开启，在首个到达该序号的确认时关闭，
//! 大约每个RTT一次。

use crate::config::check_unit_interval;
use crate::error::Result;
use crate::transport::SequenceNumber;
use tracing::debug;

/// One closed observation window.
/// 一个已结束的观测窗口。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CongestionEstimate {
    pub bytes_acked: u64,
    pub bytes_marked: u64,
    pub alpha: f64,
}

#[derive(Debug, Clone)]
pub struct MarkingEstimator {
    gain: f64,
    alpha: f64,
    acked_bytes_marked: u64,
    acked_bytes_total: u64,
    /// Sequence number that closes the current observation window.
    next_seq: Option<SequenceNumber>,
}

impl MarkingEstimator {
    /// Both `gain` and `initial_alpha` must lie in `[0, 1]`.
    pub fn new(gain: f64, initial_alpha: f64) -> Result<Self> {
        check_unit_interval("gain", gain)?;
        check_unit_interval("initial_alpha", initial_alpha)?;
        Ok(Self {
            gain,
            alpha: initial_alpha,
            acked_bytes_marked: 0,
            acked_bytes_total: 0,
            next_seq: None,
        })
    }

    /// Accounts for `acked_bytes` and closes the observation window if
    /// `last_acked` has reached its boundary.
    pub fn on_ack(
        &mut self,
        acked_bytes: u64,
        echo_received: bool,
        last_acked: SequenceNumber,
        next_tx: SequenceNumber,
    ) -> Option<CongestionEstimate> {
        self.acked_bytes_total = self.acked_bytes_total.saturating_add(acked_bytes);
        if echo_received {
            self.acked_bytes_marked = self.acked_bytes_marked.saturating_add(acked_bytes);
        }

        let boundary = *self.next_seq.get_or_insert(next_tx);
        if !last_acked.is_at_or_after(boundary) {
            return None;
        }

        let fraction = self.marking_fraction();
        self.alpha = ((1.0 - self.gain) * self.alpha + self.gain * fraction).clamp(0.0, 1.0);
        let estimate = CongestionEstimate {
            bytes_acked: self.acked_bytes_total,
            bytes_marked: self.acked_bytes_marked,
            alpha: self.alpha,
        };
        debug!(
            bytes_acked = estimate.bytes_acked,
            bytes_marked = estimate.bytes_marked,
            fraction,
            alpha = self.alpha,
            "Marking estimate updated"
        );

        self.next_seq = Some(next_tx);
        self.acked_bytes_marked = 0;
        self.acked_bytes_total = 0;
        Some(estimate)
    }

    /// Marked share of the bytes acknowledged in the open window, zero when
    /// nothing has been acknowledged yet.
    pub fn marking_fraction(&self) -> f64 {
        if self.acked_bytes_total == 0 {
            0.0
        } else {
            self.acked_bytes_marked as f64 / self.acked_bytes_total as f64
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub(crate) fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn acked_bytes_total(&self) -> u64 {
        self.acked_bytes_total
    }

    pub fn acked_bytes_marked(&self) -> u64 {
        self.acked_bytes_marked
    }
}
