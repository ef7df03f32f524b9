//! Acquisition driver tests

use rust_eeg_sampler::acquire::{AcquisitionDriver, AdcSource, TickOutcome};
use rust_eeg_sampler::sample::raw_to_millivolts;
use rust_eeg_sampler::window::AcquisitionSession;

/// Fake ADC that derives the raw value from channel and invocation count,
/// so every stored sample is attributable to one (channel, tick) pair.
struct TaggedAdc {
    ticks_seen: u16,
    last_channel: Option<usize>,
}

impl TaggedAdc {
    fn new() -> Self {
        Self {
            ticks_seen: 0,
            last_channel: None,
        }
    }

    fn raw_for(channel: usize, tick: u16) -> u16 {
        (channel as u16) * 1000 + tick
    }
}

impl AdcSource for TaggedAdc {
    fn read_channel(&mut self, channel: usize) -> u16 {
        // Channels must be visited in ascending order within a tick
        match self.last_channel {
            Some(prev) if channel == 0 => assert!(prev > 0, "tick restarted early"),
            Some(prev) => assert_eq!(channel, prev + 1, "channel order broken"),
            None => assert_eq!(channel, 0, "first read must be channel 0"),
        }
        if channel == 0 && self.last_channel.is_some() {
            self.ticks_seen += 1;
        }
        self.last_channel = Some(channel);
        Self::raw_for(channel, self.ticks_seen)
    }
}

#[test]
fn flag_false_before_n_ticks_true_after() {
    let session: AcquisitionSession<4, 8> = AcquisitionSession::new();
    let mut driver = AcquisitionDriver::new(&session);
    let mut adc = TaggedAdc::new();

    for _ in 0..7 {
        assert_eq!(driver.on_tick(&mut adc), TickOutcome::Continue);
        assert!(!session.is_complete());
    }

    assert_eq!(driver.on_tick(&mut adc), TickOutcome::Disarm);
    assert!(session.is_complete());
    assert_eq!(driver.ticks_elapsed(), 0, "counter returns to 0 at completion");
}

#[test]
fn stored_samples_match_acquisition_order() {
    let session: AcquisitionSession<3, 5> = AcquisitionSession::new();
    let mut driver = AcquisitionDriver::new(&session);
    let mut adc = TaggedAdc::new();

    while driver.on_tick(&mut adc) == TickOutcome::Continue {}

    let window = session.window();
    for channel in 0..3 {
        for tick in 0..5u16 {
            let expected = raw_to_millivolts(TaggedAdc::raw_for(channel, tick));
            assert_eq!(
                window.get(channel, tick as usize),
                expected,
                "ch{}[{}]",
                channel,
                tick
            );
        }
    }
}

#[test]
fn next_window_overwrites_after_reset() {
    let session: AcquisitionSession<1, 2> = AcquisitionSession::new();
    let mut driver = AcquisitionDriver::new(&session);

    struct ConstAdc(u16);
    impl AdcSource for ConstAdc {
        fn read_channel(&mut self, _channel: usize) -> u16 {
            self.0
        }
    }

    let mut adc = ConstAdc(1000);
    while driver.on_tick(&mut adc) == TickOutcome::Continue {}
    assert!(session.is_complete());
    let first = session.window().get(0, 0);

    session.reset();
    assert!(!session.is_complete());

    let mut adc = ConstAdc(2000);
    while driver.on_tick(&mut adc) == TickOutcome::Continue {}
    assert!(session.is_complete());
    assert_ne!(session.window().get(0, 0), first);
    assert_eq!(session.window().get(0, 0), raw_to_millivolts(2000));
}
