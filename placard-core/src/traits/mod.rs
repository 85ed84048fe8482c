//! Hardware collaborator traits
//!
//! The session engine and controller are written against these interfaces;
//! `placard-drivers` and the firmware crate provide the real
//! implementations, tests provide scripted ones.

pub mod display;
pub mod link;
pub mod sensor;
pub mod sleep;

pub use display::DisplaySink;
pub use link::{LinkError, RadioLink};
pub use sensor::{linearize, RawTemperature, Sensors};
pub use sleep::{SleepStages, SleepTimer};
