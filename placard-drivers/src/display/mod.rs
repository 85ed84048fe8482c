//! Display sink drivers

mod serial_lcd;

pub use serial_lcd::{opcode, SerialLcd};
