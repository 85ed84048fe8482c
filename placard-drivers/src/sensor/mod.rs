//! Board sensing drivers

mod analog;

pub use analog::{AdcReader, AnalogChannel, TileSensors};
