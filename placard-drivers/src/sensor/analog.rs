//! Analog power and temperature monitor
//!
//! Two inputs share one converter: the capacitor divider and the
//! temperature sensor. The sensor is powered only for the microseconds
//! around its own conversion - its supply rail hangs off an RC network
//! that needs a moment to settle, and leaving it energized would be a
//! steady drain the capacitor cannot afford.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use placard_core::traits::{RawTemperature, Sensors};

/// Which analog input to convert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogChannel {
    CapacitorVoltage,
    Temperature,
}

/// 10-bit analog conversion source
pub trait AdcReader {
    /// One right-justified 10-bit sample
    fn read(&mut self, channel: AnalogChannel) -> u16;
}

/// Supply-rail settle time for the temperature sensor, ~6x its RC constant
const SENSOR_SETTLE_MS: u32 = 2;

/// The tile's sensor set: capacitor voltage, temperature, button
pub struct TileSensors<ADC, PWR, BTN, D> {
    adc: ADC,
    sensor_power: PWR,
    button: BTN,
    delay: D,
}

impl<ADC, PWR, BTN, D> TileSensors<ADC, PWR, BTN, D>
where
    ADC: AdcReader,
    PWR: OutputPin,
    BTN: InputPin,
    D: DelayNs,
{
    pub fn new(adc: ADC, sensor_power: PWR, button: BTN, delay: D) -> Self {
        Self {
            adc,
            sensor_power,
            button,
            delay,
        }
    }

    /// The button doubles as the sleep wake source; the board layer
    /// borrows the pin for edge waits between conversions.
    pub fn button_mut(&mut self) -> &mut BTN {
        &mut self.button
    }
}

impl<ADC, PWR, BTN, D> Sensors for TileSensors<ADC, PWR, BTN, D>
where
    ADC: AdcReader,
    PWR: OutputPin,
    BTN: InputPin,
    D: DelayNs,
{
    fn capacitor_voltage(&mut self) -> u8 {
        // The protocol wants the left-justified top 8 bits
        (self.adc.read(AnalogChannel::CapacitorVoltage) >> 2) as u8
    }

    fn temperature(&mut self) -> RawTemperature {
        let _ = self.sensor_power.set_high();
        self.delay.delay_ms(SENSOR_SETTLE_MS);
        let raw = self.adc.read(AnalogChannel::Temperature);
        let _ = self.sensor_power.set_low();

        RawTemperature {
            high_bits: (raw >> 8) as u8,
            sample: raw as u8,
        }
    }

    fn button_pressed(&mut self) -> bool {
        self.button.is_high().unwrap_or(false)
    }
}
