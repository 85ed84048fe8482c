//! Scripted collaborators for exercising the engine on the host.

use heapless::Vec;

use crate::retained::{RetainedState, RetainedStore};
use crate::traits::{
    DisplaySink, LinkError, RadioLink, RawTemperature, Sensors, SleepStages, SleepTimer,
};

/// A radio link that replays a canned server byte stream
pub struct ScriptedLink {
    script: Vec<u8, 128>,
    cursor: usize,
    pub sent: Vec<u8, 256>,
    /// Report an overrun once the cursor has reached this index
    pub overrun_at: Option<usize>,
    /// How many `recv_ready` polls return false before the first byte
    pub polls_before_ready: u16,
    pub awake: bool,
    pub wakes: usize,
    pub sleeps: usize,
    pub watchdog_armed: bool,
}

impl ScriptedLink {
    pub fn new(script: &[u8]) -> Self {
        let mut vec = Vec::new();
        vec.extend_from_slice(script).unwrap();
        Self {
            script: vec,
            cursor: 0,
            sent: Vec::new(),
            overrun_at: None,
            polls_before_ready: 0,
            awake: false,
            wakes: 0,
            sleeps: 0,
            watchdog_armed: false,
        }
    }
}

impl RadioLink for ScriptedLink {
    fn wake(&mut self) {
        self.awake = true;
        self.wakes += 1;
    }

    fn sleep(&mut self) {
        self.awake = false;
        self.sleeps += 1;
    }

    fn send_byte(&mut self, byte: u8) {
        self.sent.push(byte).unwrap();
    }

    fn recv_byte(&mut self) -> Result<u8, LinkError> {
        match self.script.get(self.cursor) {
            Some(&byte) => {
                self.cursor += 1;
                Ok(byte)
            }
            // Script exhausted: the inactivity window has expired
            None => Err(LinkError::TimedOut),
        }
    }

    fn recv_ready(&mut self) -> bool {
        if self.polls_before_ready == 0 {
            true
        } else {
            self.polls_before_ready -= 1;
            false
        }
    }

    fn take_overrun(&mut self) -> bool {
        match self.overrun_at {
            Some(at) if self.cursor >= at => {
                self.overrun_at = None;
                true
            }
            _ => false,
        }
    }

    fn watchdog(&mut self, armed: bool) {
        self.watchdog_armed = armed;
    }
}

/// A display sink that records write transactions verbatim
pub struct RecordingSink {
    pub transactions: Vec<Vec<u8, 64>, 8>,
    pub open: bool,
    pub flushes: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            open: false,
            flushes: 0,
        }
    }

    pub fn total_bytes(&self) -> usize {
        self.transactions.iter().map(|t| t.len()).sum()
    }
}

impl DisplaySink for RecordingSink {
    fn begin_write(&mut self) {
        assert!(!self.open, "nested display transaction");
        self.transactions.push(Vec::new()).unwrap();
        self.open = true;
    }

    fn write_byte(&mut self, byte: u8) {
        assert!(self.open, "write outside a transaction");
        self.transactions.last_mut().unwrap().push(byte).unwrap();
    }

    fn end_write(&mut self) {
        assert!(self.open, "unbalanced end_write");
        self.open = false;
    }

    fn flush(&mut self) {
        assert!(!self.open, "flush inside a transaction");
        self.flushes += 1;
    }
}

/// A sleep timer that records configuration and unit counts
pub struct RecordingTimer {
    pub configured: Option<SleepStages>,
    pub units_slept: u32,
    /// One entry per `configure` call: the stages and how many units
    /// were slept under them
    pub runs: Vec<(SleepStages, u32), 32>,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self {
            configured: None,
            units_slept: 0,
            runs: Vec::new(),
        }
    }
}

impl SleepTimer for RecordingTimer {
    fn configure(&mut self, stages: SleepStages) {
        self.configured = Some(stages);
        self.runs.push((stages, 0)).unwrap();
    }

    fn sleep_one_unit(&mut self) {
        self.units_slept += 1;
        self.runs.last_mut().unwrap().1 += 1;
    }
}

/// Fixed sensor readings plus a recording sleep timer - one "board"
pub struct MockBoard {
    pub voltage: u8,
    pub raw_temperature: RawTemperature,
    pub button: bool,
    pub timer: RecordingTimer,
}

impl MockBoard {
    pub fn new(voltage: u8) -> Self {
        Self {
            voltage,
            raw_temperature: RawTemperature {
                high_bits: 1,
                sample: 0,
            },
            button: false,
            timer: RecordingTimer::new(),
        }
    }
}

impl Sensors for MockBoard {
    fn capacitor_voltage(&mut self) -> u8 {
        self.voltage
    }

    fn temperature(&mut self) -> RawTemperature {
        self.raw_temperature
    }

    fn button_pressed(&mut self) -> bool {
        self.button
    }
}

impl SleepTimer for MockBoard {
    fn configure(&mut self, stages: SleepStages) {
        self.timer.configure(stages);
    }

    fn sleep_one_unit(&mut self) {
        self.timer.sleep_one_unit();
    }
}

/// In-memory retained store
pub struct MemStore {
    pub stored: Option<RetainedState>,
    pub saves: usize,
}

impl MemStore {
    pub fn empty() -> Self {
        Self {
            stored: None,
            saves: 0,
        }
    }

    pub fn with(state: RetainedState) -> Self {
        Self {
            stored: Some(state),
            saves: 0,
        }
    }
}

impl RetainedStore for MemStore {
    fn load(&mut self) -> Option<RetainedState> {
        self.stored
    }

    fn save(&mut self, state: &RetainedState) {
        self.stored = Some(*state);
        self.saves += 1;
    }
}
