#![deny(clippy::expect_used, clippy::unwrap_used)]

//! A delay- and marking-based congestion window controller.
//! 基于延迟和ECN标记的拥塞窗口控制器。

pub mod clock;
pub mod config;
pub mod error;
pub mod transport;

pub mod congestion;

#[cfg(test)]
mod testing;

pub use clock::{Clock, ManualClock, TokioClock};
pub use config::Config;
pub use congestion::{CongestionControl, CongestionEstimate, Swift, SwiftStats};
pub use error::{Error, Result};
