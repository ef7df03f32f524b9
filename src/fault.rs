//! Fault state for the sampler.
//!
//! A dropped record is not fatal: the next window still proceeds. But it
//! must never be silent, so the main loop counts every drop here and the
//! reason stays readable until cleared.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Why a record was lost or a re-arm failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// Encoder scratch buffer could not hold the record; the window was
    /// dropped.
    RecordDropped = 1,

    /// UART write failed; the window was dropped.
    TxFailed = 2,

    /// Periodic timer could not be re-armed; acquisition stalled.
    TimerFault = 3,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::RecordDropped,
            2 => FaultCode::TxFailed,
            3 => FaultCode::TimerFault,
            _ => FaultCode::None,
        }
    }
}

/// Thread-safe fault state.
///
/// Set by the main loop when a window is lost, readable from anywhere
/// (console, diagnostics). The count accumulates per boot and survives
/// [`clear`](Self::clear).
pub struct FaultState {
    /// True if a fault is active.
    active: AtomicBool,

    /// Fault code (reason).
    code: AtomicU8,

    /// Additional data (e.g. bytes needed, error code).
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Record a fault with the given code and data.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Check if a fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get the fault code (meaningful only while active).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get the fault data (meaning depends on the code).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear the active flag. The counter is preserved for diagnostics.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}
