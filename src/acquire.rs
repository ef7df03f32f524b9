//! Module: acquire
//!
//! Purpose: the periodic acquisition driver. Invoked once per tick by the
//! timer binding, it reads every channel in ascending order, converts the
//! raw reading to millivolts and stores it in the session window. After N
//! ticks it marks the window complete and asks the timer to stop.
//!
//! Safety: Safe. All window access goes through the session handle.

use crate::sample::raw_to_millivolts;
use crate::window::AcquisitionSession;

/// Narrow seam to the analog input hardware.
///
/// Selecting the channel and reading the current value are collapsed into
/// one call. There is no error path: a failed conversion is
/// indistinguishable from a valid zero reading.
pub trait AdcSource {
    /// Read the current raw value of `channel` (bounded by the ADC
    /// resolution, 0..4096 for 12 bits).
    fn read_channel(&mut self, channel: usize) -> u16;
}

/// What the timer binding should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep invoking the driver at the tick period.
    Continue,
    /// Window complete: stop the periodic timer until the main loop
    /// re-arms it.
    Disarm,
}

/// Periodic acquisition driver.
///
/// Owns the tick counter; nothing outside the driver observes it. The
/// driver mutates shared state only through the session handle.
pub struct AcquisitionDriver<'a, const C: usize, const N: usize> {
    session: &'a AcquisitionSession<C, N>,
    tick: usize,
}

impl<'a, const C: usize, const N: usize> AcquisitionDriver<'a, C, N> {
    /// Create a driver bound to a session.
    pub fn new(session: &'a AcquisitionSession<C, N>) -> Self {
        Self { session, tick: 0 }
    }

    /// One tick of acquisition. Called from the timer callback.
    ///
    /// Reads channels 0..C in ascending order, converts and stores each
    /// sample at the current tick index. On the tick that fills the
    /// window, sets the completion flag (after the last store), resets
    /// the tick counter and returns [`TickOutcome::Disarm`]. That
    /// transition is terminal for the current window.
    ///
    /// # Timing
    ///
    /// Must finish well inside the tick period. A tick that overruns is
    /// not detected and silently shifts the real sampling rate.
    pub fn on_tick(&mut self, adc: &mut impl AdcSource) -> TickOutcome {
        for channel in 0..C {
            let raw = adc.read_channel(channel);
            self.session.store(channel, self.tick, raw_to_millivolts(raw));
        }

        self.tick += 1;
        if self.tick == N {
            self.tick = 0;
            // Last window write above happens-before this flag store
            self.session.complete();
            return TickOutcome::Disarm;
        }

        TickOutcome::Continue
    }

    /// Ticks acquired into the current window so far.
    pub fn ticks_elapsed(&self) -> usize {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed sequence of raw readings on every channel.
    struct ScriptedAdc {
        readings: &'static [u16],
        cursor: usize,
    }

    impl AdcSource for ScriptedAdc {
        fn read_channel(&mut self, _channel: usize) -> u16 {
            let raw = self.readings[self.cursor % self.readings.len()];
            self.cursor += 1;
            raw
        }
    }

    #[test]
    fn test_window_completes_after_n_ticks() {
        let session: AcquisitionSession<2, 3> = AcquisitionSession::new();
        let mut driver = AcquisitionDriver::new(&session);
        let mut adc = ScriptedAdc { readings: &[0], cursor: 0 };

        assert_eq!(driver.on_tick(&mut adc), TickOutcome::Continue);
        assert_eq!(driver.on_tick(&mut adc), TickOutcome::Continue);
        assert!(!session.is_complete());

        assert_eq!(driver.on_tick(&mut adc), TickOutcome::Disarm);
        assert!(session.is_complete());
        assert_eq!(driver.ticks_elapsed(), 0);
    }

    #[test]
    fn test_samples_stored_in_acquisition_order() {
        let session: AcquisitionSession<2, 2> = AcquisitionSession::new();
        let mut driver = AcquisitionDriver::new(&session);
        // Channel reads are interleaved: ch0 then ch1, tick by tick
        let mut adc = ScriptedAdc {
            readings: &[0, 1024, 2048, 4095],
            cursor: 0,
        };

        driver.on_tick(&mut adc);
        driver.on_tick(&mut adc);

        let window = session.window();
        assert_eq!(window.get(0, 0), raw_to_millivolts(0));
        assert_eq!(window.get(1, 0), raw_to_millivolts(1024));
        assert_eq!(window.get(0, 1), raw_to_millivolts(2048));
        assert_eq!(window.get(1, 1), raw_to_millivolts(4095));
    }
}
