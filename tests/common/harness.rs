//! tests/common/harness.rs
use std::sync::Once;
use std::time::Duration;
use swift_cc::transport::{
    AckFlags, CongestionState, EcnMode, EcnState, EctCodepoint, SequenceNumber, TransportState,
};

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "swift_cc=info".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// A sender behind a single bottleneck queue.
///
/// Every segment above the bandwidth-delay product waits in the queue, adding
/// `per_segment_delay` to the RTT. Acks carry an ECN echo once the queue holds
/// more than `mark_threshold` segments.
#[derive(Debug, Clone)]
pub struct SimulatedPath {
    pub window: f64,
    pub base_rtt: Duration,
    pub per_segment_delay: Duration,
    pub bdp_segments: f64,
    pub mark_threshold: f64,
    pub segment_size: u32,
    pub state: CongestionState,
    pub rtt: Duration,
    pub receive_cursor: SequenceNumber,
    pub ecn_state: EcnState,
    pub ecn_mode: Option<(EcnMode, EctCodepoint)>,
    pub next_tx: SequenceNumber,
    pub last_acked: SequenceNumber,
    pub emitted: Vec<(SequenceNumber, AckFlags)>,
}

impl SimulatedPath {
    pub fn new() -> Self {
        Self {
            window: 1.0,
            base_rtt: Duration::from_millis(2),
            per_segment_delay: Duration::from_micros(100),
            bdp_segments: 50.0,
            mark_threshold: 10.0,
            segment_size: 1448,
            state: CongestionState::Open,
            rtt: Duration::from_millis(2),
            receive_cursor: SequenceNumber(0),
            ecn_state: EcnState::Disabled,
            ecn_mode: None,
            next_tx: SequenceNumber(0),
            last_acked: SequenceNumber(0),
            emitted: Vec::new(),
        }
    }

    /// Sends one window's worth of data and returns the delay until the next
    /// acknowledgment arrives.
    pub fn transmit(&mut self) -> Duration {
        let queued = (self.window - self.bdp_segments).max(0.0);
        self.rtt = self.base_rtt + self.per_segment_delay.mul_f64(queued);

        self.last_acked = self.next_tx;
        self.next_tx = self.next_tx + self.segment_size;
        if self.ecn_mode.is_some() {
            self.ecn_state = if queued > self.mark_threshold {
                EcnState::EceReceived
            } else {
                EcnState::Idle
            };
        }
        self.rtt.div_f64(self.window.max(1.0))
    }
}

impl TransportState for SimulatedPath {
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
        self.ecn_mode = Some((mode, codepoint));
        self.ecn_state = EcnState::Idle;
    }
}
