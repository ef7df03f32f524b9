//! Hardware Abstraction Layer for the sampler.
//!
//! Thin wrappers around ESP-IDF peripherals. Acquisition, encoding and
//! the main loop stay platform-free; the HAL is just I/O.

pub mod adc;
pub mod timer;
pub mod uart;
