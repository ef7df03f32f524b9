//! Callback-safe logging for the sampler.
//!
//! The acquisition callback runs in timer context and must never block on
//! the console. Log messages therefore go through a lock-free ring:
//!
//! ```text
//! timer callback / main loop ──▶ LogStream ──▶ console drain
//! rt_log!() ~100ns               ring buffer    blocking ok
//! non-blocking                   drop if full
//! ```
//!
//! Messages may be dropped when the ring is full; the dropped counter
//! makes that visible.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 96;

/// Log buffer size (number of entries). Must be a power of 2.
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LogEntry {
    /// Timestamp in microseconds.
    pub timestamp_us: i64,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

/// Lock-free log ring (multiple producers, single consumer).
///
/// - Producers coordinate through an atomic fetch_add
/// - Push never blocks (drops the message if full)
/// - Drain runs in the main loop at leisure
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: Multiple producers coordinated via atomic fetch_add on
// write_idx, single consumer owns read_idx.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new(
                [LogEntry {
                    timestamp_us: 0,
                    level: LogLevel::Info,
                    len: 0,
                    msg: [0; MAX_MSG_LEN],
                }; N],
            ),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry (callback-safe, never blocks).
    ///
    /// Returns `true` if the message was queued, `false` if dropped.
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        // Each producer claims a unique index; a full ring is detected
        // before the claim so no slot is leaked on drop.
        let mut write = self.write_idx.load(Ordering::Relaxed);
        loop {
            let read = self.read_idx.load(Ordering::Acquire);
            if write.wrapping_sub(read) >= N as u32 {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            match self.write_idx.compare_exchange_weak(
                write,
                write.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => write = current,
            }
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: fetch_add handed this producer a unique index, no
        // aliasing possible.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        true
    }

    /// Drain the next log entry. Single consumer.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: Single consumer, unique index
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Check if there are entries to drain.
    #[inline]
    pub fn has_entries(&self) -> bool {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        read != write
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer. Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl<'a> Write for BufWriter<'a> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Format a drained entry for console output.
///
/// Format: `[timestamp_us] LEVEL: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    format_to_buffer(
        buf,
        format_args!(
            "[{:10}] {}: {}\n",
            entry.timestamp_us,
            entry.level.as_str(),
            core::str::from_utf8(&entry.msg[..entry.len as usize]).unwrap_or("<invalid utf8>")
        ),
    )
}

/// Callback-safe log macro. Use instead of println! anywhere the timer
/// callback or main loop logs.
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, $level, &buf[..len]);
    }};
}

/// Callback-safe info log.
#[macro_export]
macro_rules! rt_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Callback-safe warning log.
#[macro_export]
macro_rules! rt_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// Callback-safe error log.
#[macro_export]
macro_rules! rt_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(1000, LogLevel::Info, b"window sent"));
        assert!(stream.has_entries());

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_us, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(&entry.msg[..entry.len as usize], b"window sent");

        assert!(!stream.has_entries());
    }

    #[test]
    fn test_log_stream_full_drops() {
        let stream = LogStream::<4>::new();

        assert!(stream.push(1, LogLevel::Info, b"1"));
        assert!(stream.push(2, LogLevel::Info, b"2"));
        assert!(stream.push(3, LogLevel::Info, b"3"));
        assert!(stream.push(4, LogLevel::Info, b"4"));

        assert!(!stream.push(5, LogLevel::Info, b"5"));
        assert_eq!(stream.dropped(), 1);

        stream.drain();
        assert!(stream.push(6, LogLevel::Info, b"6"));
    }

    #[test]
    fn test_format_to_buffer() {
        let mut buf = [0u8; 32];
        let len = format_to_buffer(&mut buf, format_args!("record {} bytes", 48));
        assert_eq!(&buf[..len], b"record 48 bytes");
    }

    #[test]
    fn test_format_log_entry() {
        let mut msg = [0u8; MAX_MSG_LEN];
        msg[..7].copy_from_slice(b"dropped");
        let entry = LogEntry {
            timestamp_us: 1234567,
            level: LogLevel::Error,
            len: 7,
            msg,
        };

        let mut buf = [0u8; 160];
        let len = format_log_entry(&entry, &mut buf);
        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("1234567"));
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("dropped"));
    }

    #[test]
    fn test_rt_log_macro() {
        let stream: LogStream<16> = LogStream::new();
        rt_warn!(stream, 99, "lost {} windows", 2);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(&entry.msg[..entry.len as usize], b"lost 2 windows");
    }
}
