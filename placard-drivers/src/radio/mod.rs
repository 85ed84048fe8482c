//! Radio modem drivers

mod xbee;

pub use xbee::{ModemSerial, SerialError, XbeeRadio};
