//! Peripheral glue: core/driver traits bound to embassy-rp peripherals.

use embassy_futures::block_on;
use embassy_futures::select::select;
use embassy_rp::adc::{self, Adc};
use embassy_rp::gpio::{Input, Output};
use embassy_rp::pac;
use embassy_rp::uart::{self, Uart};
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Delay, Duration, Timer};

use placard_core::scheduler::PRIMARY_STAGE_SPAN;
use placard_core::traits::{
    LinkError, RadioLink, RawTemperature, Sensors, SleepStages, SleepTimer,
};
use placard_drivers::radio::{ModemSerial, SerialError};
use placard_drivers::sensor::{AdcReader, AnalogChannel, TileSensors};
use placard_protocol::sleep::SLEEP_EXPONENT_BIAS;

/// One tick of the nominal 31.25 kHz sleep clock
const SLEEP_TICK_US: u64 = 32;

/// UART to the radio modem, with the inactivity watchdog wired in
///
/// While armed, every received byte buys another full window; a silent
/// server lets the countdown run out and the whole device restarts. That
/// restart is the session's only timeout, so `read_byte` never returns
/// `TimedOut` on this board.
pub struct RadioSerial {
    uart: Uart<'static, uart::Blocking>,
    watchdog: Watchdog,
    window: Duration,
    armed: bool,
    overrun: bool,
}

impl RadioSerial {
    pub fn new(uart: Uart<'static, uart::Blocking>, watchdog: Watchdog, window_ms: u16) -> Self {
        Self {
            uart,
            watchdog,
            window: Duration::from_millis(window_ms as u64),
            armed: false,
            overrun: false,
        }
    }
}

impl ModemSerial for RadioSerial {
    fn write_byte(&mut self, byte: u8) {
        let _ = self.uart.blocking_write(&[byte]);
    }

    fn flush(&mut self) {
        let _ = self.uart.blocking_flush();
    }

    fn read_byte(&mut self) -> Result<u8, SerialError> {
        let mut buf = [0u8; 1];
        loop {
            match self.uart.blocking_read(&mut buf) {
                Ok(()) => {
                    if self.armed {
                        self.watchdog.feed();
                    }
                    return Ok(buf[0]);
                }
                Err(uart::Error::Overrun) => self.overrun = true,
                // Line noise mangled a byte; drop it and keep listening
                Err(_) => {}
            }
        }
    }

    fn rx_pending(&mut self) -> bool {
        !pac::UART0.uartfr().read().rxfe()
    }

    fn take_overrun(&mut self) -> bool {
        core::mem::take(&mut self.overrun)
    }

    fn watchdog(&mut self, armed: bool) {
        self.armed = armed;
        if armed {
            self.watchdog.start(self.window);
        } else {
            // Sleeps are timed by the timer peripheral, not the watchdog
            pac::WATCHDOG.ctrl().modify(|w| w.set_enable(false));
        }
    }
}

/// Mirrors radio power on the status LED, which makes session attempts
/// visible from across the room
pub struct IndicatorRadio<R> {
    radio: R,
    led: Output<'static>,
}

impl<R: RadioLink> IndicatorRadio<R> {
    pub fn new(radio: R, led: Output<'static>) -> Self {
        Self { radio, led }
    }
}

impl<R: RadioLink> RadioLink for IndicatorRadio<R> {
    fn wake(&mut self) {
        self.led.set_high();
        self.radio.wake();
    }

    fn sleep(&mut self) {
        self.radio.sleep();
        self.led.set_low();
    }

    fn send_byte(&mut self, byte: u8) {
        self.radio.send_byte(byte);
    }

    fn recv_byte(&mut self) -> Result<u8, LinkError> {
        self.radio.recv_byte()
    }

    fn recv_ready(&mut self) -> bool {
        self.radio.recv_ready()
    }

    fn take_overrun(&mut self) -> bool {
        self.radio.take_overrun()
    }

    fn watchdog(&mut self, armed: bool) {
        self.radio.watchdog(armed);
    }
}

/// Both analog channels behind the single RP2040 converter
pub struct BoardAdc {
    adc: Adc<'static, adc::Blocking>,
    cap_channel: adc::Channel<'static>,
    temp_channel: adc::Channel<'static>,
}

impl BoardAdc {
    pub fn new(
        adc: Adc<'static, adc::Blocking>,
        cap_channel: adc::Channel<'static>,
        temp_channel: adc::Channel<'static>,
    ) -> Self {
        Self {
            adc,
            cap_channel,
            temp_channel,
        }
    }
}

impl AdcReader for BoardAdc {
    fn read(&mut self, channel: AnalogChannel) -> u16 {
        let source = match channel {
            AnalogChannel::CapacitorVoltage => &mut self.cap_channel,
            AnalogChannel::Temperature => &mut self.temp_channel,
        };
        // The converter runs at 12 bits; the protocol math wants 10
        self.adc.blocking_read(source).unwrap_or(0) >> 2
    }
}

/// Sensors plus the sleep hardware; the application button serves both as
/// a status input and as the early-wake source
pub struct TileBoard {
    sensors: TileSensors<BoardAdc, Output<'static>, Input<'static>, Delay>,
    unit: Duration,
}

impl TileBoard {
    pub fn new(adc: BoardAdc, sensor_power: Output<'static>, button: Input<'static>) -> Self {
        Self {
            sensors: TileSensors::new(adc, sensor_power, button, Delay),
            unit: Duration::from_micros(SLEEP_TICK_US << SLEEP_EXPONENT_BIAS),
        }
    }
}

impl Sensors for TileBoard {
    fn capacitor_voltage(&mut self) -> u8 {
        self.sensors.capacitor_voltage()
    }

    fn temperature(&mut self) -> RawTemperature {
        self.sensors.temperature()
    }

    fn button_pressed(&mut self) -> bool {
        self.sensors.button_pressed()
    }
}

impl SleepTimer for TileBoard {
    fn configure(&mut self, stages: SleepStages) {
        let exponent = stages.secondary
            + if stages.primary_max {
                PRIMARY_STAGE_SPAN
            } else {
                0
            };
        let ticks = 1u64 << (exponent + SLEEP_EXPONENT_BIAS);
        self.unit = Duration::from_micros(ticks * SLEEP_TICK_US);
    }

    fn sleep_one_unit(&mut self) {
        // A button edge ends the nap early; the scheduler treats that
        // exactly like expiry, so there is nothing to report back
        block_on(select(
            Timer::after(self.unit),
            self.sensors.button_mut().wait_for_any_edge(),
        ));
    }
}
