//! Placard - wireless display tile firmware
//!
//! RP2040 firmware binary for the capacitor-powered display tile. One
//! blocking control loop runs the whole show: sense the capacitor, ask the
//! base station for screen updates, paint the panel, sleep as ordered.
//! There are no other tasks and no interrupt handlers - interrupts exist
//! only to end a low-power sleep early.
//!
//! The only timeout in the system is the hardware watchdog armed around
//! in-session receives; when it fires the chip restarts and lands back
//! here, picks its retry pacing out of retained RAM, and tries again.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{self, Uart};
use embassy_rp::watchdog::Watchdog;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use placard_core::config::Tuning;
use placard_core::controller::{Controller, CycleReport};
use placard_drivers::display::SerialLcd;
use placard_drivers::radio::XbeeRadio;

mod board;
mod retained;

/// Radio modem baud rate
const RADIO_BAUD: u32 = 57_600;

/// Panel SPI clock
const LCD_SPI_HZ: u32 = 250_000;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("placard firmware starting");

    let cause = retained::reset_cause();
    info!("reset cause: {}", cause);

    let store = retained::RamRetained::take();
    let tuning = Tuning::default();

    // Radio: UART0 plus the modem's sleep pin, parked high (asleep)
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = RADIO_BAUD;
    let radio_uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let serial = board::RadioSerial::new(
        radio_uart,
        Watchdog::new(p.WATCHDOG),
        tuning.reply_watchdog_ms,
    );
    let radio_sleep = Output::new(p.PIN_2, Level::High);
    let led = Output::new(p.PIN_25, Level::Low);
    let radio = board::IndicatorRadio::new(XbeeRadio::new(serial, radio_sleep, Delay), led);
    info!("radio link initialized");

    // Panel: SPI0 with /CS and the busy line. The panel keeps its frame
    // RAM across our power losses, so there is nothing to redraw here.
    let mut spi_config = spi::Config::default();
    spi_config.frequency = LCD_SPI_HZ;
    let lcd_spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, spi_config);
    let lcd_cs = Output::new(p.PIN_17, Level::High);
    let lcd_busy = Input::new(p.PIN_20, Pull::Down);
    let display = SerialLcd::new(lcd_spi, lcd_cs, lcd_busy);
    info!("display sink initialized");

    // Sensors and sleep hardware
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let cap_channel = adc::Channel::new_pin(p.PIN_26, Pull::None);
    let temp_channel = adc::Channel::new_pin(p.PIN_27, Pull::None);
    let sensor_power = Output::new(p.PIN_21, Level::Low);
    let button = Input::new(p.PIN_22, Pull::Down);
    let board = board::TileBoard::new(
        board::BoardAdc::new(adc, cap_channel, temp_channel),
        sensor_power,
        button,
    );
    info!("sensors initialized");

    let mut controller = Controller::new(radio, display, board, store, cause, tuning);
    info!("bring-up complete, entering control loop");

    // The boot delay: nearly nothing after a power-on or reset button,
    // the retained backoff after a watchdog restart.
    controller.backoff_sleep();

    loop {
        match controller.step() {
            CycleReport::Served { sleep } => {
                info!("update applied; sleeping {} units at 2^{}", sleep.count, sleep.exponent);
            }
            CycleReport::Cancelled { sleep } => {
                info!("server cancelled; sleeping {} units at 2^{}", sleep.count, sleep.exponent);
            }
            CycleReport::Recharge => {
                info!("capacitor too low to transmit; recharge nap");
            }
            CycleReport::Failed { error } => {
                warn!("session failed: {}; backing off to 2^{}", error, controller.backoff_exponent());
            }
        }
    }
}
