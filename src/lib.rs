//! # RustEegSampler
//!
//! Four-channel biosignal sampler. A periodic timer callback reads every
//! ADC channel once per tick into a fixed acquisition window; when the
//! window is full, the main loop encodes it as one JSON record and sends
//! it over UART, then starts the next window.
//!
//! ## Architecture
//!
//! All shared state lives in [`AcquisitionSession`]:
//! - The timer callback is the only writer (until it signals completion)
//! - The main loop is the only reader (after it observes completion)
//! - Handoff is a single atomic flag with release/acquire ordering
//!
//! Everything hardware-facing sits behind narrow traits ([`AdcSource`],
//! [`RecordSink`], [`WindowTimer`]) so the whole pipeline runs on the host.

#![cfg_attr(not(test), no_std)]

pub mod acquire;
pub mod config;
pub mod encode;
pub mod fault;
pub mod logging;
pub mod run;
pub mod sample;
pub mod transmit;
pub mod window;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use acquire::{AcquisitionDriver, AdcSource, TickOutcome};
pub use encode::{encode_window, max_record_len, EncodeError};
pub use fault::{FaultCode, FaultState};
pub use logging::{LogLevel, LogStream};
pub use run::{MainLoop, Poll, WindowTimer};
pub use transmit::RecordSink;
pub use window::{AcquisitionSession, SampleWindow};
