//! Module: sample
//!
//! Purpose: raw ADC reading to physical unit conversion.
//!
//! A sample is one millivolt reading for one channel at one tick. The
//! conversion is a fixed linear scale from the 12-bit raw value; there is
//! no error path, a failed read arrives here as zero.

use crate::config::{ADC_RAW_MAX, ADC_RESOLUTION_BITS, FULL_SCALE_MV};

/// Convert a raw ADC reading to millivolts.
///
/// `mv = round(raw * FULL_SCALE_MV / 2^ADC_RESOLUTION_BITS)`
///
/// Monotonic non-decreasing in `raw`. Readings above the resolution are
/// clamped to [`ADC_RAW_MAX`], so the result never exceeds full scale.
pub const fn raw_to_millivolts(raw: u16) -> u16 {
    let raw = if raw > ADC_RAW_MAX { ADC_RAW_MAX } else { raw } as u32;
    let half = 1u32 << (ADC_RESOLUTION_BITS - 1);
    ((raw * FULL_SCALE_MV as u32 + half) >> ADC_RESOLUTION_BITS) as u16
}

/// Number of decimal digits needed to print `n`.
pub const fn decimal_width(mut n: u32) -> usize {
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_endpoints() {
        assert_eq!(raw_to_millivolts(0), 0);
        assert_eq!(raw_to_millivolts(2048), 1650);
        // 4095 * 3300 / 4096 = 3299.19..., rounds down
        assert_eq!(raw_to_millivolts(4095), 3299);
    }

    #[test]
    fn test_conversion_monotonic_and_bounded() {
        let mut prev = 0;
        for raw in 0..=ADC_RAW_MAX {
            let mv = raw_to_millivolts(raw);
            assert!(mv >= prev, "non-monotonic at raw={}", raw);
            assert!(mv <= FULL_SCALE_MV);
            prev = mv;
        }
    }

    #[test]
    fn test_out_of_range_raw_clamps() {
        assert_eq!(raw_to_millivolts(u16::MAX), raw_to_millivolts(ADC_RAW_MAX));
    }

    #[test]
    fn test_conversion_rounds_to_nearest() {
        // raw=1: 3300/4096 = 0.8057 -> 1
        assert_eq!(raw_to_millivolts(1), 1);
        // raw=3: 3*3300/4096 = 2.417 -> 2
        assert_eq!(raw_to_millivolts(3), 2);
    }

    #[test]
    fn test_decimal_width() {
        assert_eq!(decimal_width(0), 1);
        assert_eq!(decimal_width(9), 1);
        assert_eq!(decimal_width(10), 2);
        assert_eq!(decimal_width(3300), 4);
        assert_eq!(decimal_width(65535), 5);
    }
}
