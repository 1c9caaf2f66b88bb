//! WAL, the Waveform Analysis Language
//!
//! A small Lisp evaluated over a [`wave_trace::Trace`]. Forms are read into
//! [`Expr`] trees and evaluated by an [`Evaluator`] that tracks the current
//! time step, so a bare signal name yields that signal's value "now".
//!
//! ```
//! use wave_wal::{Evaluator, Value};
//!
//! let trace = wave_trace::vcd::parse(
//!     "$var wire 1 ! clk $end\n$enddefinitions $end\n#0\n0!\n#5\n1!\n#10\n0!\n",
//! )
//! .unwrap();
//! let high = Evaluator::new(&trace).eval_str("(count (= clk 1))").unwrap();
//! assert_eq!(high, Value::Int(1));
//! ```

pub mod builtins;
pub mod error;
pub mod eval;
pub mod reader;
pub mod value;

pub use error::{Error, Result};
pub use eval::Evaluator;
pub use reader::{Expr, read, read_one};
pub use value::Value;

/// Evaluate `src` against `trace` starting at time step 0.
pub fn evaluate(trace: &wave_trace::Trace, src: &str) -> Result<Value> {
    Evaluator::new(trace).eval_str(src)
}
