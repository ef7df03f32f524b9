//! Module: transmit
//!
//! Purpose: the record output seam. One blocking write per record; no
//! chunking, acknowledgement or retransmission beyond what the serial
//! driver itself provides. A slow transmit delays the start of the next
//! acquisition window by design, acquisition and transmission never
//! overlap.

/// Sink for encoded records.
///
/// The espidf implementation wraps the UART TX driver; tests substitute
/// an in-memory sink.
pub trait RecordSink {
    type Error;

    /// Write the record in full, blocking until the driver accepted
    /// every byte.
    fn write_all(&mut self, record: &[u8]) -> Result<(), Self::Error>;
}
