//! 测试辅助工具模块
//! Test utilities module

#![cfg(test)]

use crate::transport::{
    AckFlags, CongestionState, EcnMode, EcnState, EctCodepoint, SequenceNumber, TransportState,
};
use std::sync::Once;
use std::time::Duration;

/// Initializes tracing for unit tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "swift_cc=debug".to_string());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// An in-memory connection that records what the controller asks of it.
#[derive(Debug, Clone)]
pub struct MockTransport {
    pub window: f64,
    pub rtt: Duration,
    pub segment_size: u32,
    pub state: CongestionState,
    pub receive_cursor: SequenceNumber,
    pub ecn_state: EcnState,
    pub next_tx: SequenceNumber,
    pub last_acked: SequenceNumber,
    /// Acknowledgments emitted, with the receive cursor at emission time.
    pub emitted: Vec<(SequenceNumber, AckFlags)>,
    pub ecn_settings: Vec<(EcnMode, EctCodepoint)>,
}

impl MockTransport {
    pub fn new(window: f64) -> Self {
        Self {
            window,
            rtt: Duration::ZERO,
            segment_size: 1000,
            state: CongestionState::Open,
            receive_cursor: SequenceNumber(0),
            ecn_state: EcnState::Disabled,
            next_tx: SequenceNumber(0),
            last_acked: SequenceNumber(0),
            emitted: Vec::new(),
            ecn_settings: Vec::new(),
        }
    }
}

impl TransportState for MockTransport {
    fn congestion_window(&self) -> f64 {
        self.window
    }

    fn set_congestion_window(&mut self, window: f64) {
        self.window = window;
    }

    fn last_rtt(&self) -> Duration {
        self.rtt
    }

    fn segment_size(&self) -> u32 {
        self.segment_size
    }

    fn congestion_state(&self) -> CongestionState {
        self.state
    }

    fn receive_cursor(&self) -> SequenceNumber {
        self.receive_cursor
    }

    fn set_receive_cursor(&mut self, cursor: SequenceNumber) {
        self.receive_cursor = cursor;
    }

    fn ecn_state(&self) -> EcnState {
        self.ecn_state
    }

    fn set_ecn_state(&mut self, state: EcnState) {
        self.ecn_state = state;
    }

    fn next_tx_sequence(&self) -> SequenceNumber {
        self.next_tx
    }

    fn last_acked_sequence(&self) -> SequenceNumber {
        self.last_acked
    }

    fn emit_acknowledgment(&mut self, flags: AckFlags) {
        self.emitted.push((self.receive_cursor, flags));
    }

    fn set_ecn(&mut self, mode: EcnMode, codepoint: EctCodepoint) {
        self.ecn_settings.push((mode, codepoint));
        if self.ecn_state == EcnState::Disabled {
            self.ecn_state = EcnState::Idle;
        }
    }
}
