//! The in-memory trace model
//!
//! A [`Trace`] indexes a recording by *time step*: index `i` is the `i`-th
//! distinct timestamp found in the file. Every signal keeps its value
//! changes as `(index, value)` pairs sorted by index.

use std::collections::HashMap;
use std::fmt;

use crate::Value;

/// Simulation time unit declared by `$timescale`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timescale {
    pub magnitude: u32,
    pub unit: String,
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

/// A declared signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// Hierarchical name, scopes joined with `.`
    pub name: String,
    pub width: u32,
    /// Declared variable type (`wire`, `reg`, `real`, ...)
    pub kind: String,
    pub(crate) slot: usize,
}

/// One value change reported by [`Trace::transitions`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub index: usize,
    pub timestamp: u64,
    pub from: Value,
    pub to: Value,
}

/// A decoded waveform recording.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub(crate) timescale: Option<Timescale>,
    pub(crate) timestamps: Vec<u64>,
    pub(crate) signals: Vec<Signal>,
    pub(crate) by_name: HashMap<String, usize>,
    pub(crate) waves: Vec<Vec<(usize, Value)>>,
}

impl Trace {
    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Index of the last time step, `None` for a recording without any.
    pub fn last_index(&self) -> Option<usize> {
        self.timestamps.len().checked_sub(1)
    }

    pub fn timescale(&self) -> Option<&Timescale> {
        self.timescale.as_ref()
    }

    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    /// Raw timestamp of a time step.
    pub fn timestamp(&self, index: usize) -> Option<u64> {
        self.timestamps.get(index).copied()
    }

    /// Signals in declaration order.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn signal_names(&self) -> Vec<&str> {
        self.signals.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.by_name.get(name).map(|&i| &self.signals[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn width(&self, name: &str) -> Option<u32> {
        self.signal(name).map(|s| s.width)
    }

    /// All recorded changes of a signal, ordered by time step.
    pub fn changes(&self, name: &str) -> Option<&[(usize, Value)]> {
        self.signal(name).map(|s| self.waves[s.slot].as_slice())
    }

    /// Value of `name` at time step `index`.
    ///
    /// Returns `None` for an unknown signal or an index past the end.
    pub fn value_at(&self, name: &str, index: usize) -> Option<&Value> {
        if index >= self.len() {
            return None;
        }
        let wave = self.changes(name)?;
        let after = wave.partition_point(|(i, _)| *i <= index);
        after.checked_sub(1).map(|pos| &wave[pos].1)
    }

    /// Changes of `name` inside `(start, end]` whose value differs from the
    /// previous step. The value at `start` itself is the initial value, not a
    /// transition.
    pub fn transitions(&self, name: &str, start: usize, end: usize) -> Option<Vec<Transition>> {
        let wave = self.changes(name)?;
        let mut out = Vec::new();
        let first = wave.partition_point(|(i, _)| *i <= start);
        let mut previous = self.value_at(name, start)?.clone();
        for (index, value) in wave[first..].iter().take_while(|(i, _)| *i <= end) {
            if *value != previous {
                out.push(Transition {
                    index: *index,
                    timestamp: self.timestamps[*index],
                    from: previous,
                    to: value.clone(),
                });
                previous = value.clone();
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcd;

    const SMALL: &str = "\
$timescale 1ns $end
$scope module top $end
$var wire 1 ! a $end
$var wire 2 \" b $end
$upscope $end
$enddefinitions $end
#0
0!
#10
1!
b10 \"
#20
1!
#30
0!
b11 \"
";

    #[test]
    fn value_before_first_change_is_unknown() {
        let trace = vcd::parse(SMALL).unwrap();
        assert_eq!(trace.value_at("top.b", 0), Some(&Value::unknown()));
        assert_eq!(trace.value_at("top.b", 1).unwrap().to_string(), "2");
    }

    #[test]
    fn value_at_past_end_is_none() {
        let trace = vcd::parse(SMALL).unwrap();
        assert_eq!(trace.len(), 4);
        assert!(trace.value_at("top.a", 4).is_none());
        assert!(trace.value_at("top.missing", 0).is_none());
    }

    #[test]
    fn transitions_skip_repeated_values() {
        let trace = vcd::parse(SMALL).unwrap();
        let transitions = trace.transitions("top.a", 0, 3).unwrap();
        let indices: Vec<usize> = transitions.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(transitions[0].timestamp, 10);
        assert_eq!(transitions[1].from.to_string(), "1");
        assert_eq!(transitions[1].to.to_string(), "0");
    }

    #[test]
    fn transitions_respect_window() {
        let trace = vcd::parse(SMALL).unwrap();
        assert_eq!(trace.transitions("top.a", 1, 2).unwrap(), vec![]);
        assert_eq!(trace.transitions("top.b", 2, 3).unwrap().len(), 1);
    }
}
