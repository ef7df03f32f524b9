//! RustEegSampler - firmware entry point.
//!
//! Boot order:
//! 1. Configure ADC1 channels, UART1 TX and the periodic tick timer
//!    (any failure here is fatal, there is nothing to sample with)
//! 2. Arm the timer; the tick callback fills the acquisition window
//! 3. Busy-poll the completion flag; on completion encode, transmit,
//!    reset and re-arm
//! 4. Drain the log ring to the console between polls

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
mod firmware {
    use core::ffi::c_void;

    use esp_idf_svc::sys as esp_idf_sys;

    use rust_eeg_sampler::{
        acquire::{AcquisitionDriver, TickOutcome},
        config::{CHANNEL_COUNT, MAX_RECORD_LEN, TICK_PERIOD_US, WINDOW_TICKS},
        fault::FaultState,
        hal::adc::Adc1Source,
        hal::timer::SampleTimer,
        hal::uart::{init_record_uart, UartRecordSink},
        logging::{format_log_entry, LogStream},
        rt_info,
        run::{MainLoop, WindowTimer},
        window::AcquisitionSession,
    };

    // Static allocations: the session is the single shared object between
    // the timer callback and the main loop. One window, reused for every
    // acquisition, never reallocated.
    static SESSION: AcquisitionSession<CHANNEL_COUNT, WINDOW_TICKS> = AcquisitionSession::new();
    static FAULTS: FaultState = FaultState::new();
    static LOG_STREAM: LogStream = LogStream::new();

    /// Everything the tick callback touches.
    struct TickContext {
        driver: AcquisitionDriver<'static, CHANNEL_COUNT, WINDOW_TICKS>,
        adc: Adc1Source,
        timer_handle: esp_idf_sys::esp_timer_handle_t,
    }

    // SAFETY throughout: written once during startup before the timer is
    // armed, then touched only by the tick callback.
    static mut TICK_CONTEXT: Option<TickContext> = None;

    // Encoder scratch, sized so a full-width record can never truncate.
    static mut SCRATCH: [u8; MAX_RECORD_LEN] = [0; MAX_RECORD_LEN];

    /// Periodic tick: sample all channels; on the tick that completes the
    /// window, stop the timer until the main loop re-arms it.
    unsafe extern "C" fn on_sample_tick(arg: *mut c_void) {
        let ctx = &mut *(arg as *mut TickContext);
        if ctx.driver.on_tick(&mut ctx.adc) == TickOutcome::Disarm {
            SampleTimer::disarm(ctx.timer_handle);
        }
    }

    #[no_mangle]
    fn main() {
        esp_idf_sys::link_patches();

        if let Err(e) = run() {
            panic!("startup failed: {:?}", e);
        }
    }

    fn run() -> Result<(), esp_idf_sys::EspError> {
        let peripherals = esp_idf_svc::hal::peripherals::Peripherals::take()?;

        let adc = Adc1Source::init()?;
        let uart = init_record_uart(peripherals.uart1, peripherals.pins.gpio17)?;
        let mut sink = UartRecordSink(uart);

        let ctx_ptr = unsafe {
            TICK_CONTEXT = Some(TickContext {
                driver: AcquisitionDriver::new(&SESSION),
                adc,
                timer_handle: core::ptr::null_mut(),
            });
            TICK_CONTEXT.as_mut().unwrap() as *mut TickContext
        };

        // SAFETY: TICK_CONTEXT is 'static and set before the timer starts.
        let mut timer = unsafe { SampleTimer::new(on_sample_tick, ctx_ptr as *mut c_void)? };
        unsafe {
            (*ctx_ptr).timer_handle = timer.handle();
        }

        rt_info!(
            LOG_STREAM,
            timestamp_us(),
            "sampler up: {} ch x {} ticks @ {} us",
            CHANNEL_COUNT,
            WINDOW_TICKS,
            TICK_PERIOD_US
        );

        let mut main_loop = MainLoop::new(&SESSION, &FAULTS, &LOG_STREAM);
        timer.arm()?;

        loop {
            // SAFETY: single consumer, scratch only used here.
            let scratch = unsafe { &mut SCRATCH };
            let _ = main_loop.poll(timestamp_us(), scratch, &mut sink, &mut timer);
            drain_logs();
        }
    }

    fn timestamp_us() -> i64 {
        unsafe { esp_idf_sys::esp_timer_get_time() }
    }

    fn drain_logs() {
        while let Some(entry) = LOG_STREAM.drain() {
            let mut buf = [0u8; 160];
            let len = format_log_entry(&entry, &mut buf);
            unsafe {
                esp_idf_sys::printf(b"%.*s\0".as_ptr().cast(), len as i32, buf.as_ptr());
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("sampler runs on ESP-IDF targets; see tests/ for the host-side pipeline");
}
