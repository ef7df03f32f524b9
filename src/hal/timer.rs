//! Periodic tick binding on esp_timer.
//!
//! `arm()` starts (or replaces) the periodic schedule at the tick period.
//! The period is measured expiry to expiry, not relative to when the
//! callback finished. Cancellation happens at the callback site when the
//! acquisition driver reports a completed window.

use core::ffi::c_void;

use esp_idf_svc::sys::{
    esp, esp_timer_create, esp_timer_create_args_t, esp_timer_delete,
    esp_timer_dispatch_t_ESP_TIMER_TASK, esp_timer_handle_t, esp_timer_start_periodic,
    esp_timer_stop, EspError,
};

use crate::config::TICK_PERIOD_US;
use crate::run::WindowTimer;

/// Periodic sampling timer.
pub struct SampleTimer {
    handle: esp_timer_handle_t,
}

impl SampleTimer {
    /// Create the binding. `callback` runs in the esp_timer task with
    /// `arg` as its context on every tick.
    ///
    /// # Safety
    ///
    /// `arg` must stay valid for the whole lifetime of the timer; the
    /// callback dereferences it on every tick.
    pub unsafe fn new(
        callback: unsafe extern "C" fn(*mut c_void),
        arg: *mut c_void,
    ) -> Result<Self, EspError> {
        let args = esp_timer_create_args_t {
            callback: Some(callback),
            arg,
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"sample_tick\0".as_ptr().cast(),
            skip_unhandled_events: true,
        };

        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        esp!(esp_timer_create(&args, &mut handle))?;
        Ok(Self { handle })
    }

    /// The raw handle, for cancellation from inside the tick callback.
    pub fn handle(&self) -> esp_timer_handle_t {
        self.handle
    }

    /// Stop the periodic schedule. Stopping a stopped timer is fine.
    pub fn disarm(handle: esp_timer_handle_t) {
        let _ = unsafe { esp_timer_stop(handle) };
    }
}

impl WindowTimer for SampleTimer {
    type Error = EspError;

    fn arm(&mut self) -> Result<(), EspError> {
        // Re-entrant: replace any prior schedule
        let _ = unsafe { esp_timer_stop(self.handle) };
        esp!(unsafe { esp_timer_start_periodic(self.handle, TICK_PERIOD_US) })
    }
}

impl Drop for SampleTimer {
    fn drop(&mut self) {
        let _ = unsafe { esp_timer_stop(self.handle) };
        let _ = unsafe { esp_timer_delete(self.handle) };
    }
}
