//! Serial memory-LCD display sink
//!
//! The panel keeps its own frame RAM and survives power loss, so the tile
//! never redraws from scratch; it just streams whatever the server sends
//! between /CS edges. The busy line gates transaction starts: the panel
//! holds it while applying the previous command internally.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use placard_core::traits::DisplaySink;

/// Panel opcode bytes (vendor serial command set)
pub mod opcode {
    /// Fill frame RAM with the bright level
    pub const CLEAR_BRIGHT: u8 = 0x10;
    /// Fill frame RAM with the dark level
    pub const CLEAR_DARK: u8 = 0x12;
    /// Latch frame RAM onto the panel
    pub const SHOW_FULLSCREEN: u8 = 0x18;
    /// Finish pending work and drop into low power
    pub const SLEEP: u8 = 0x20;
}

/// Transactional byte sink over SPI + /CS + busy
pub struct SerialLcd<SPI, CS, BUSY> {
    spi: SPI,
    cs: CS,
    busy: BUSY,
}

impl<SPI, CS, BUSY> SerialLcd<SPI, CS, BUSY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
{
    /// /CS is active low; bring-up parks it high.
    pub fn new(spi: SPI, cs: CS, busy: BUSY) -> Self {
        Self { spi, cs, busy }
    }
}

impl<SPI, CS, BUSY> DisplaySink for SerialLcd<SPI, CS, BUSY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
{
    fn begin_write(&mut self) {
        // The panel holds busy while applying the previous transaction
        while self.busy.is_high().unwrap_or(false) {}
        let _ = self.cs.set_low();
    }

    fn write_byte(&mut self, byte: u8) {
        let _ = self.spi.write(&[byte]);
    }

    fn end_write(&mut self) {
        // The final byte must leave the shift register before /CS rises
        let _ = self.spi.flush();
        let _ = self.cs.set_high();
    }

    fn flush(&mut self) {
        // SLEEP is itself a command; opening its transaction blocks on
        // busy, which is what makes this call wait out a pending update.
        self.begin_write();
        self.write_byte(opcode::SLEEP);
        self.end_write();
    }
}
