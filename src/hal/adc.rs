//! ADC1 input for the four sampling channels.
//!
//! One-shot reads through the legacy ADC driver, one conversion per
//! channel per tick. On the ESP32-S3 channels 0..3 are GPIO1..GPIO4.

use esp_idf_svc::sys::{
    adc1_config_channel_atten, adc1_config_width, adc1_get_raw,
    adc_atten_t_ADC_ATTEN_DB_11, adc_bits_width_t_ADC_WIDTH_BIT_12, esp, EspError,
};

use crate::acquire::AdcSource;
use crate::config::ADC1_CHANNELS;

/// ADC1 bound to the configured channels.
pub struct Adc1Source {
    channels: [u32; ADC1_CHANNELS.len()],
}

impl Adc1Source {
    /// Configure width and attenuation for every channel.
    ///
    /// Must run once before the first tick; failure is fatal at startup.
    pub fn init() -> Result<Self, EspError> {
        esp!(unsafe { adc1_config_width(adc_bits_width_t_ADC_WIDTH_BIT_12) })?;
        for &channel in ADC1_CHANNELS.iter() {
            esp!(unsafe { adc1_config_channel_atten(channel, adc_atten_t_ADC_ATTEN_DB_11) })?;
        }
        Ok(Self {
            channels: ADC1_CHANNELS,
        })
    }
}

impl AdcSource for Adc1Source {
    fn read_channel(&mut self, channel: usize) -> u16 {
        let raw = unsafe { adc1_get_raw(self.channels[channel]) };
        // A driver error is indistinguishable from a zero reading
        if raw < 0 {
            0
        } else {
            raw as u16
        }
    }
}
