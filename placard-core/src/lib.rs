//! Board-agnostic core logic for the display tile firmware
//!
//! This crate contains everything that does not depend on a specific board:
//!
//! - Collaborator traits (radio link, display sink, sensors, sleep timer)
//! - The radio session engine (framed-packet reception and validation)
//! - The sleep-spec scheduler (two-stage prescaler decomposition)
//! - Exponential backoff and the outer session controller
//! - The retained-state boundary that survives watchdog restarts
//!
//! The tile has no reliable power and no graceful shutdown path: a stalled
//! radio read ends in a hardware watchdog reset, not an error return. The
//! code here is written so that every such restart lands back in a safe
//! state, with the retry pacing it needs either recomputed from the reset
//! cause or read back out of retained memory.

#![no_std]
#![deny(unsafe_code)]

pub mod backoff;
pub mod config;
pub mod controller;
pub mod retained;
pub mod scheduler;
pub mod session;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;
