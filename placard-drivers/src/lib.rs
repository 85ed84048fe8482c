//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined in
//! placard-core, generic over `embedded-hal` peripherals:
//!
//! - Radio modem power and link sequencing (XBee-style sleep pin)
//! - Serial memory-LCD display sink (transactional, busy-gated)
//! - Analog power/temperature monitor

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod radio;
pub mod sensor;

pub use display::SerialLcd;
pub use radio::{ModemSerial, SerialError, XbeeRadio};
pub use sensor::{AdcReader, AnalogChannel, TileSensors};
