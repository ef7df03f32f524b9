//! Module: run
//!
//! Purpose: the foreground state machine. Two states:
//!
//! - `ARMED`: busy-poll the completion flag (a deliberate spin, not a
//!   suspend)
//! - `DRAINING`: flag observed true — encode the window, transmit the
//!   record, clear the flag, re-arm the timer
//!
//! There is no terminal state and no cancellation; the loop runs for as
//! long as the firmware does. A lost record (encode or transmit failure)
//! is logged and counted, and the next window proceeds regardless.

use crate::encode::{encode_window, EncodeError};
use crate::fault::{FaultCode, FaultState};
use crate::logging::LogStream;
use crate::transmit::RecordSink;
use crate::window::AcquisitionSession;
use crate::{rt_error, rt_warn};

/// Periodic timer binding, owned by the main loop.
///
/// Disarming is not part of this trait: the driver requests cancellation
/// from inside the tick callback and the platform glue performs it there.
pub trait WindowTimer {
    type Error;

    /// Begin (or replace) periodic invocation of the acquisition driver
    /// at the tick period. Re-entrant: arming while armed simply
    /// replaces the prior schedule.
    fn arm(&mut self) -> Result<(), Self::Error>;
}

/// Result of one main-loop poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Poll {
    /// Window still filling.
    Idle,
    /// Record of this many bytes was transmitted; next window armed.
    Sent(usize),
    /// Window was dropped (encode or transmit failure); next window
    /// armed anyway.
    Dropped,
}

/// Foreground consumer of completed windows.
pub struct MainLoop<'a, const C: usize, const N: usize> {
    session: &'a AcquisitionSession<C, N>,
    faults: &'a FaultState,
    log: &'a LogStream,
}

impl<'a, const C: usize, const N: usize> MainLoop<'a, C, N> {
    pub fn new(
        session: &'a AcquisitionSession<C, N>,
        faults: &'a FaultState,
        log: &'a LogStream,
    ) -> Self {
        Self {
            session,
            faults,
            log,
        }
    }

    /// One iteration of the foreground loop.
    ///
    /// If the window is incomplete this returns immediately; the caller
    /// spins. Once the flag is observed, the record is produced into
    /// `scratch`, sent, the flag cleared and the timer re-armed — in that
    /// order, so acquisition never overlaps transmission.
    pub fn poll<S, T>(
        &mut self,
        now_us: i64,
        scratch: &mut [u8],
        sink: &mut S,
        timer: &mut T,
    ) -> Poll
    where
        S: RecordSink,
        S::Error: core::fmt::Debug,
        T: WindowTimer,
        T::Error: core::fmt::Debug,
    {
        if !self.session.is_complete() {
            return Poll::Idle;
        }

        let outcome = match encode_window(self.session.window(), scratch) {
            Ok(len) => match sink.write_all(&scratch[..len]) {
                Ok(()) => Poll::Sent(len),
                Err(e) => {
                    self.faults.set(FaultCode::TxFailed, 0);
                    rt_error!(self.log, now_us, "record tx failed: {:?}", e);
                    Poll::Dropped
                }
            },
            Err(EncodeError::BufferTooSmall { needed, got }) => {
                self.faults.set(FaultCode::RecordDropped, needed as u32);
                rt_error!(
                    self.log,
                    now_us,
                    "record dropped: need {} bytes, scratch has {}",
                    needed,
                    got
                );
                Poll::Dropped
            }
        };

        // Flag cleared before re-arm, so the first tick of the next
        // window can never race a completed flag.
        self.session.reset();

        if let Err(e) = timer.arm() {
            self.faults.set(FaultCode::TimerFault, 0);
            rt_warn!(self.log, now_us, "re-arm failed, sampling stalled: {:?}", e);
        }

        outcome
    }
}
