//! Radio session engine
//!
//! One session = wake the radio, offer a hello, then consume the server's
//! framed reply stream until it ends in a final frame, a cancel, or a
//! failure. Packets arrive with a per-session sequence number starting at
//! 0; anything out of order is read off the wire to stay in sync but never
//! reaches the display. The radio layer below acknowledges per-hop
//! delivery, so the server sees the gap and resends from the lost packet -
//! which is why dropping beats buffering here: a reorder buffer would cost
//! memory to recover something the link already recovers for free.
//!
//! While the session is live the link's inactivity watchdog is armed. On
//! hardware that means a stalled server kills the whole device; the next
//! boot finds the backoff exponent already primed in retained memory and
//! retries at a polite pace.

use placard_protocol::{FailureCode, FrameHeader, Hello, Reply, SleepSpec};

use crate::traits::{DisplaySink, LinkError, RadioLink};

/// Per-session reception state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionState {
    expected_sequence: u8,
    write_enabled: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            expected_sequence: 0,
            write_enabled: false,
        }
    }

    /// Gate one packet: writes are enabled exactly when the received
    /// sequence matches the expected one, and only then does the expected
    /// sequence advance (mod 256).
    pub fn accept(&mut self, sequence: u8) -> bool {
        self.write_enabled = sequence == self.expected_sequence;
        if self.write_enabled {
            self.expected_sequence = self.expected_sequence.wrapping_add(1);
        }
        self.write_enabled
    }

    /// Sequence number of the last packet fully received; 0xFF before any
    pub fn last_received(&self) -> u8 {
        self.expected_sequence.wrapping_sub(1)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// How a session ended well
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionOutcome {
    /// Sleep ordered by the server (trailing bytes of `ETX`/`CAN`)
    pub sleep: SleepSpec,
    /// Final reception progress, for the next hello
    pub last_sequence: u8,
    /// True when the server cancelled instead of sending data
    pub cancelled: bool,
}

/// Why a session ended badly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// First byte of a frame was outside the frame alphabet
    NoHeader,
    /// Receiver overran; nothing read since is trustworthy
    Overrun,
    /// The link's inactivity window expired (timeout-capable links only)
    TimedOut,
}

impl SessionError {
    /// The NAK code for this error, if one is sent at all
    fn failure_code(self) -> Option<FailureCode> {
        match self {
            SessionError::NoHeader => Some(FailureCode::NoHeader),
            SessionError::Overrun => Some(FailureCode::Overrun),
            SessionError::TimedOut => None,
        }
    }
}

/// A failed session, with the reception progress the next hello reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionFailure {
    pub error: SessionError,
    pub last_sequence: u8,
}

/// Run one complete radio session
///
/// On success the radio is already asleep and the display flushed; the
/// caller still owes the returned sleep. On failure the relevant NAK has
/// been sent (when one applies) and the radio is asleep; the caller owes a
/// backoff sleep.
pub fn run<L: RadioLink, D: DisplaySink>(
    link: &mut L,
    display: &mut D,
    hello: &Hello,
) -> Result<SessionOutcome, SessionFailure> {
    link.wake();
    send_all(link, &hello.to_bytes());

    // From here until the ACK, a silent server means a watchdog restart.
    link.watchdog(true);

    // Measure how long the server took to start answering and report it
    // back. Units are poll iterations, not time; the server only compares
    // tiles against each other to tune its pacing.
    let mut polls: u16 = 0;
    while !link.recv_ready() {
        polls = polls.saturating_add(1);
    }
    send_all(link, &Reply::TimingReport(polls).to_bytes());

    let mut state = SessionState::new();
    loop {
        // Let the panel apply buffered work while the line is quiet.
        display.flush();

        let header = recv_or_abort(link, &state)?;
        let header = match FrameHeader::classify(header) {
            Some(header) => header,
            None => return Err(abort(link, &state, SessionError::NoHeader)),
        };

        if header == FrameHeader::Cancel {
            let sleep = read_sleep_spec(link, &state)?;
            link.watchdog(false);
            link.sleep();
            return Ok(SessionOutcome {
                sleep,
                last_sequence: state.last_received(),
                cancelled: true,
            });
        }

        // An overrun is insidious: the receive FIFO holds two bytes, so a
        // plausible header and sequence may have survived the data loss.
        // Check before trusting anything just read.
        if link.take_overrun() {
            return Err(abort(link, &state, SessionError::Overrun));
        }

        let sequence = recv_or_abort(link, &state)?;
        let length = recv_or_abort(link, &state)?;
        let accepted = state.accept(sequence);

        if accepted {
            display.begin_write();
        }
        for _ in 0..length {
            let byte = recv_or_abort(link, &state)?;
            if accepted {
                display.write_byte(byte);
            }
        }
        if accepted {
            display.end_write();
        }

        if header == FrameHeader::Last {
            let sleep = read_sleep_spec(link, &state)?;
            if accepted {
                // Radio off before the slow panel update: the ACK is the
                // last thing the server needs from us.
                send_all(link, &Reply::Ack.to_bytes());
                link.sleep();
                link.watchdog(false);
                display.flush();
                return Ok(SessionOutcome {
                    sleep,
                    last_sequence: state.last_received(),
                    cancelled: false,
                });
            }
            // That final frame was a retransmission of a packet already
            // applied out of order; the real one is still coming.
        }
    }
}

fn send_all<L: RadioLink>(link: &mut L, bytes: &[u8]) {
    for &byte in bytes {
        link.send_byte(byte);
    }
}

fn recv_or_abort<L: RadioLink>(
    link: &mut L,
    state: &SessionState,
) -> Result<u8, SessionFailure> {
    match link.recv_byte() {
        Ok(byte) => Ok(byte),
        Err(LinkError::TimedOut) => Err(abort(link, state, SessionError::TimedOut)),
    }
}

fn read_sleep_spec<L: RadioLink>(
    link: &mut L,
    state: &SessionState,
) -> Result<SleepSpec, SessionFailure> {
    let count = recv_or_abort(link, state)?;
    let exponent = recv_or_abort(link, state)?;
    Ok(SleepSpec::new(count, exponent))
}

/// Close out a failed session: NAK when the error has a code, radio down,
/// watchdog disarmed.
fn abort<L: RadioLink>(
    link: &mut L,
    state: &SessionState,
    error: SessionError,
) -> SessionFailure {
    if let Some(code) = error.failure_code() {
        let nak = Reply::Nak {
            last_received: state.last_received(),
            code,
        };
        send_all(link, &nak.to_bytes());
    }
    link.watchdog(false);
    link.sleep();
    SessionFailure {
        error,
        last_sequence: state.last_received(),
    }
}
