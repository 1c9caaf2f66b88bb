//! Waveform reader
//!
//! Locates a recording on disk, detects its format and decodes it into a
//! [`Trace`]: the signal hierarchy, per-signal value changes and the list of
//! time steps. Only VCD is decoded; FST and GHW files are recognised and
//! rejected as unsupported.

pub mod error;
pub mod format;
pub mod load;
pub mod trace;
pub mod value;
pub mod vcd;

pub use error::{Error, Result};
pub use format::Format;
pub use load::open;
pub use trace::{Signal, Timescale, Trace, Transition};
pub use value::Value;
