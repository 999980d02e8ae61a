//! ECN标记状态机
//! Congestion-experienced marking state machine
//!
//! When the CE state flips while an acknowledgment is being delayed, the
//! withheld acknowledgment covers data received under the old state. It is
//! sent right away, at the cursor saved at the previous flip, with the echo
//! flag of the old state. The live receive cursor is restored afterwards.
//!
//! 在延迟确认期间CE状态翻转时，被暂缓的确认覆盖的是旧状态下收到的数据，
//! 因此立即以上次翻转时保存的接收游标、按旧状态的回显标志重发该确认，
//! 之后恢复实时接收游标。

use crate::transport::{AckFlags, EcnState, SequenceNumber, TransportState};
use tracing::debug;

/// An acknowledgment re-sent on behalf of a delayed one.
/// 代替延迟确认重新发送的确认。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckReissue {
    pub cursor: SequenceNumber,
    pub flags: AckFlags,
}

#[derive(Debug, Clone, Default)]
pub struct MarkingStateMachine {
    congestion_experienced: bool,
    /// Receive cursor saved at the last CE transition; `None` until the first.
    prior_receive_cursor: Option<SequenceNumber>,
    delayed_ack_reserved: bool,
}

impl MarkingStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// A CE-marked segment arrived.
    /// 收到带CE标记的报文段。
    pub fn marking_started<T>(&mut self, transport: &mut T) -> Option<AckReissue>
    where
        T: TransportState + ?Sized,
    {
        let reissue = if !self.congestion_experienced {
            self.reissue_delayed(transport, AckFlags::ACK)
        } else {
            None
        };

        self.prior_receive_cursor = Some(transport.receive_cursor());
        self.congestion_experienced = true;
        transport.set_ecn_state(EcnState::CeReceived);
        debug!(cursor = %transport.receive_cursor(), "CE state 0 -> 1");
        reissue
    }

    /// An unmarked segment arrived.
    /// 收到不带CE标记的报文段。
    pub fn marking_ended<T>(&mut self, transport: &mut T) -> Option<AckReissue>
    where
        T: TransportState + ?Sized,
    {
        let reissue = if self.congestion_experienced {
            self.reissue_delayed(transport, AckFlags::ACK_ECE)
        } else {
            None
        };

        self.prior_receive_cursor = Some(transport.receive_cursor());
        self.congestion_experienced = false;
        if matches!(
            transport.ecn_state(),
            EcnState::CeReceived | EcnState::SendingEce
        ) {
            transport.set_ecn_state(EcnState::Idle);
        }
        debug!(cursor = %transport.receive_cursor(), "CE state 1 -> 0");
        reissue
    }

    pub fn delayed_ack_begin(&mut self) {
        self.delayed_ack_reserved = true;
    }

    pub fn delayed_ack_end(&mut self) {
        self.delayed_ack_reserved = false;
    }

    fn reissue_delayed<T>(&self, transport: &mut T, flags: AckFlags) -> Option<AckReissue>
    where
        T: TransportState + ?Sized,
    {
        if !self.delayed_ack_reserved {
            return None;
        }
        let prior = self.prior_receive_cursor?;

        let live = transport.receive_cursor();
        transport.set_receive_cursor(prior);
        transport.emit_acknowledgment(flags);
        transport.set_receive_cursor(live);

        debug!(
            cursor = %prior,
            ece = flags.has_ece(),
            "Reissued delayed acknowledgment"
        );
        Some(AckReissue {
            cursor: prior,
            flags,
        })
    }

    pub fn congestion_experienced(&self) -> bool {
        self.congestion_experienced
    }

    pub fn prior_receive_cursor(&self) -> Option<SequenceNumber> {
        self.prior_receive_cursor
    }

    pub fn delayed_ack_reserved(&self) -> bool {
        self.delayed_ack_reserved
    }
}
