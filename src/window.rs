//! Acquisition window storage and producer/consumer handoff.
//!
//! This is the heart of the sampler. One [`SampleWindow`] holds a complete
//! batch of N samples per channel; one [`AcquisitionSession`] owns the
//! window plus the completion flag and carries it between the timer
//! callback (producer) and the main loop (consumer).
//!
//! # Handoff protocol
//!
//! ```text
//! timer callback ──▶ AcquisitionSession ──▶ main loop
//!                    (window + flag)
//! ```
//!
//! - The callback is the only writer, and only while the flag is false
//! - The callback performs its last window write strictly before setting
//!   the flag (Release)
//! - The main loop reads the window only after observing the flag true
//!   (Acquire), then clears it before the timer is re-armed
//!
//! # Memory Ordering
//!
//! - Producer sets the flag with `Release`
//! - Consumer polls the flag with `Acquire`
//! - This ensures the consumer sees every window write made before
//!   completion

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

/// Fixed storage for one acquisition window: C channels of N samples,
/// indexed `[channel][tick]`. Values are millivolts.
///
/// Allocated once and overwritten in place every window, never
/// reallocated.
pub struct SampleWindow<const C: usize, const N: usize> {
    samples: [[u16; N]; C],
}

impl<const C: usize, const N: usize> SampleWindow<C, N> {
    /// Create a zeroed window.
    pub const fn new() -> Self {
        Self {
            samples: [[0; N]; C],
        }
    }

    /// Store one sample.
    #[inline]
    pub fn set(&mut self, channel: usize, tick: usize, mv: u16) {
        self.samples[channel][tick] = mv;
    }

    /// Read one sample.
    #[inline]
    pub fn get(&self, channel: usize, tick: usize) -> u16 {
        self.samples[channel][tick]
    }

    /// All samples of one channel, in acquisition order.
    #[inline]
    pub fn channel(&self, channel: usize) -> &[u16; N] {
        &self.samples[channel]
    }

    /// Number of channels.
    pub const fn channels(&self) -> usize {
        C
    }

    /// Samples per channel.
    pub const fn ticks(&self) -> usize {
        N
    }
}

impl<const C: usize, const N: usize> Default for SampleWindow<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// The acquisition session: window storage plus the completion flag.
///
/// The flag is the sole synchronization primitive in the firmware. It is
/// set exactly once per window by the driver and cleared exactly once per
/// window by the main loop after the record was consumed.
///
/// # Safety
///
/// This type uses `UnsafeCell` internally but is safe to use because:
/// - Single producer (the acquisition driver) writes only while the flag
///   is false
/// - Single consumer (the main loop) reads only after observing the flag
///   true
/// - Ownership of the window transfers at the flag, never shared
pub struct AcquisitionSession<const C: usize, const N: usize> {
    window: UnsafeCell<SampleWindow<C, N>>,
    complete: AtomicBool,
}

// SAFETY: Single producer, single consumer, handoff through the atomic
// completion flag. No mutable aliasing possible within the protocol.
unsafe impl<const C: usize, const N: usize> Sync for AcquisitionSession<C, N> {}

impl<const C: usize, const N: usize> AcquisitionSession<C, N> {
    /// Create a new session with a zeroed window and the flag clear.
    pub const fn new() -> Self {
        Self {
            window: UnsafeCell::new(SampleWindow::new()),
            complete: AtomicBool::new(false),
        }
    }

    /// Check whether the current window is complete.
    ///
    /// Polled by the main loop. `Acquire` pairs with the `Release` in
    /// [`complete`](Self::complete) so a true result also publishes the
    /// window contents.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    /// Store one sample. Producer side.
    ///
    /// Must only be called by the acquisition driver while the window is
    /// incomplete.
    #[inline]
    pub fn store(&self, channel: usize, tick: usize, mv: u16) {
        debug_assert!(!self.is_complete(), "write into a completed window");

        // SAFETY: single producer, and the consumer does not touch the
        // window until the flag is set.
        unsafe {
            (*self.window.get()).set(channel, tick, mv);
        }
    }

    /// Mark the window complete. Producer side, once per window.
    ///
    /// All window writes happen-before this `Release` store.
    #[inline]
    pub fn complete(&self) {
        self.complete.store(true, Ordering::Release);
    }

    /// Read access to the window. Consumer side.
    ///
    /// Only valid between observing [`is_complete`](Self::is_complete)
    /// true and calling [`reset`](Self::reset); outside that span the
    /// producer may be writing.
    #[inline]
    pub fn window(&self) -> &SampleWindow<C, N> {
        // SAFETY: per the handoff protocol the producer made its last
        // write before setting the flag and will not write again until
        // reset.
        unsafe { &*self.window.get() }
    }

    /// Clear the completion flag for the next window. Consumer side.
    ///
    /// Call after the record was encoded and sent, before re-arming the
    /// timer. The window is reused in place; stale samples are simply
    /// overwritten by the next acquisition.
    #[inline]
    pub fn reset(&self) {
        self.complete.store(false, Ordering::Release);
    }
}

impl<const C: usize, const N: usize> Default for AcquisitionSession<C, N> {
    fn default() -> Self {
        Self::new()
    }
}
