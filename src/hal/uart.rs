//! Record output on UART1.
//!
//! TX-only at 115200 8N1. Connect the TX pin to the receiving host:
//!
//! ```text
//! ESP32-S3 GPIO17 (TX) ──────▶ USB-UART RX ──▶ host decoder
//! ```

use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartTxDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;

use crate::config::UART_BAUD_RATE;
use crate::transmit::RecordSink;

/// Initialize UART1 TX-only for record output.
pub fn init_record_uart<'d>(
    uart: impl Peripheral<P = uart::UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
) -> Result<UartTxDriver<'d>, EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(Hertz(UART_BAUD_RATE))
        .data_bits(uart::config::DataBits::DataBits8)
        .parity_none()
        .stop_bits(uart::config::StopBits::STOP1);

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// [`RecordSink`] over the UART TX driver.
pub struct UartRecordSink<'d>(pub UartTxDriver<'d>);

impl RecordSink for UartRecordSink<'_> {
    type Error = EspError;

    fn write_all(&mut self, record: &[u8]) -> Result<(), EspError> {
        let mut sent = 0;
        while sent < record.len() {
            sent += self.0.write(&record[sent..])?;
        }
        Ok(())
    }
}
