//! Module: encode
//!
//! Purpose: serialize a completed sample window into one JSON text record:
//!
//! ```text
//! {"ch0":[v0,v1,...],"ch1":[...],...}\n
//! ```
//!
//! Channels in ascending index order, samples in acquisition order,
//! minimal decimal integers, no whitespace. The output goes into
//! caller-provided storage sized with [`max_record_len`]; on failure
//! nothing is written, a partial record never leaves this module.
//!
//! Safety: Safe. No unsafe blocks, no allocation.

use crate::sample::decimal_width;
use crate::window::SampleWindow;

/// Decimal digits reserved per sample.
///
/// Derived from the maximum representable value of the sample type, not
/// from the expected signal range, so the precomputed byte budget is
/// always sufficient.
pub const SAMPLE_DIGITS: usize = decimal_width(u16::MAX as u32);

/// Worst-case byte length of an encoded record, trailing newline
/// included, for `channels` channels of `ticks` samples at
/// `sample_width` digits each.
pub const fn max_record_len(channels: usize, ticks: usize, sample_width: usize) -> usize {
    // Opening and closing brace plus newline
    let mut len = 3;
    let mut channel = 0;
    while channel < channels {
        // "chK":[ ... ]
        len += 6 + decimal_width(channel as u32) + 1;
        len += ticks * sample_width + (ticks - 1);
        channel += 1;
    }
    // Commas between channel entries
    len + channels - 1
}

/// Encoder failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// Destination cannot hold the worst-case record. Nothing was
    /// written.
    BufferTooSmall { needed: usize, got: usize },
}

/// Destination cursor. Capacity is checked once up front against the
/// worst case, so every write below is in bounds.
struct Cursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    /// Minimal decimal representation, no leading zeros.
    fn put_decimal(&mut self, value: u32) {
        let mut digits = [0u8; 10];
        let mut remaining = value;
        let width = decimal_width(value);
        let mut i = width;
        loop {
            i -= 1;
            digits[i] = b'0' + (remaining % 10) as u8;
            remaining /= 10;
            if i == 0 {
                break;
            }
        }
        self.put(&digits[..width]);
    }
}

/// Encode a complete window into `out`, returning the record length.
///
/// The actual length varies with sample magnitudes; it equals the
/// precomputed worst case exactly when every sample needs
/// [`SAMPLE_DIGITS`] digits.
pub fn encode_window<const C: usize, const N: usize>(
    window: &SampleWindow<C, N>,
    out: &mut [u8],
) -> Result<usize, EncodeError> {
    let needed = max_record_len(C, N, SAMPLE_DIGITS);
    if out.len() < needed {
        return Err(EncodeError::BufferTooSmall {
            needed,
            got: out.len(),
        });
    }

    let mut cursor = Cursor { buf: out, pos: 0 };
    cursor.put(b"{");
    for channel in 0..C {
        if channel > 0 {
            cursor.put(b",");
        }
        cursor.put(b"\"ch");
        cursor.put_decimal(channel as u32);
        cursor.put(b"\":[");
        for (tick, &mv) in window.channel(channel).iter().enumerate() {
            if tick > 0 {
                cursor.put(b",");
            }
            cursor.put_decimal(mv as u32);
        }
        cursor.put(b"]");
    }
    cursor.put(b"}\n");

    Ok(cursor.pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_record_len_reference_shape() {
        // One channel, one sample: {"ch0":[X]}\n
        assert_eq!(max_record_len(1, 1, 1), 12);
        // Matches the hand-counted budget of the 4x1125 configuration
        // with 4-digit samples
        assert_eq!(max_record_len(4, 1125, 4), 22534);
    }

    #[test]
    fn test_encode_minimal_window() {
        let mut window: SampleWindow<1, 2> = SampleWindow::new();
        window.set(0, 0, 5);
        window.set(0, 1, 3300);

        let mut buf = [0u8; 64];
        let len = encode_window(&window, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"{\"ch0\":[5,3300]}\n");
    }

    #[test]
    fn test_encode_length_exact_at_full_width() {
        let mut window: SampleWindow<3, 4> = SampleWindow::new();
        for channel in 0..3 {
            for tick in 0..4 {
                window.set(channel, tick, 12345); // SAMPLE_DIGITS wide
            }
        }

        let mut buf = [0u8; 256];
        let len = encode_window(&window, &mut buf).unwrap();
        assert_eq!(len, max_record_len(3, 4, SAMPLE_DIGITS));
    }

    #[test]
    fn test_encode_rejects_short_buffer_without_writing() {
        let window: SampleWindow<2, 2> = SampleWindow::new();
        let mut buf = [0xAAu8; 8];

        let err = encode_window(&window, &mut buf).unwrap_err();
        assert!(matches!(err, EncodeError::BufferTooSmall { got: 8, .. }));
        assert_eq!(buf, [0xAAu8; 8], "no partial output on failure");
    }

    #[test]
    fn test_encode_channel_ordering() {
        let mut window: SampleWindow<3, 1> = SampleWindow::new();
        window.set(0, 0, 1);
        window.set(1, 0, 2);
        window.set(2, 0, 3);

        let mut buf = [0u8; 64];
        let len = encode_window(&window, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"{\"ch0\":[1],\"ch1\":[2],\"ch2\":[3]}\n");
    }
}
