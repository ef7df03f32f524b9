//! Module: config
//!
//! Purpose: build-time configuration for the sampler. Channel count,
//! window length and tick period are fixed at compile time; changing any
//! of them changes the wire record with no negotiation.

use crate::encode::{max_record_len, SAMPLE_DIGITS};

/// Number of analog channels sampled per tick.
pub const CHANNEL_COUNT: usize = 4;

/// Samples per channel in one acquisition window.
pub const WINDOW_TICKS: usize = 1125;

/// Tick period in microseconds (250 Hz sampling rate).
///
/// The period is measured callback-start to callback-start: the timer
/// re-arms relative to the previous scheduled expiry, not relative to
/// when the callback finished.
pub const TICK_PERIOD_US: u64 = 4000;

/// ADC resolution in bits (raw readings span 0..4096).
pub const ADC_RESOLUTION_BITS: u32 = 12;

/// Largest raw reading the ADC can produce.
pub const ADC_RAW_MAX: u16 = (1 << ADC_RESOLUTION_BITS) - 1;

/// Full-scale input voltage expressed in millivolts.
pub const FULL_SCALE_MV: u16 = 3300;

/// Baud rate of the record UART (8 data bits, 1 stop bit, no parity).
pub const UART_BAUD_RATE: u32 = 115200;

/// ADC1 channel indices, in acquisition order.
///
/// On the ESP32-S3 these are GPIO1..GPIO4.
pub const ADC1_CHANNELS: [u32; CHANNEL_COUNT] = [0, 1, 2, 3];

/// GPIO used as UART1 TX for record output.
pub const RECORD_TX_PIN: u8 = 17;

/// Worst-case encoded record size for the build configuration.
///
/// The scratch buffer for the encoder is sized with this, so a window can
/// never truncate mid-record.
pub const MAX_RECORD_LEN: usize = max_record_len(CHANNEL_COUNT, WINDOW_TICKS, SAMPLE_DIGITS);
