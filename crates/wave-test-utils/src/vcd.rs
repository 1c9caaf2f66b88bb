//! [`VcdBuilder`] for composing VCD recordings in tests.

use std::collections::BTreeMap;
use std::fmt::Write;

struct Var {
    path: String,
    width: u32,
    code: String,
}

/// Builds VCD text from declared wires and timed value changes.
///
/// # Example
///
/// ```rust
/// use wave_test_utils::VcdBuilder;
///
/// let text = VcdBuilder::new()
///     .wire("tb.clk", 1)
///     .change(0, "tb.clk", 0)
///     .change(5, "tb.clk", 1)
///     .build();
/// assert!(text.contains("$var wire 1 ! clk $end"));
/// ```
pub struct VcdBuilder {
    timescale: String,
    vars: Vec<Var>,
    changes: BTreeMap<u64, Vec<(usize, String)>>,
}

impl Default for VcdBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier codes `!`, `"`, ... `~`, then two-character codes.
fn code_for(mut n: usize) -> String {
    let mut code = String::new();
    loop {
        code.push((b'!' + (n % 94) as u8) as char);
        n /= 94;
        if n == 0 {
            return code;
        }
        n -= 1;
    }
}

impl VcdBuilder {
    pub fn new() -> Self {
        Self {
            timescale: "1ns".to_string(),
            vars: Vec::new(),
            changes: BTreeMap::new(),
        }
    }

    pub fn timescale(mut self, timescale: &str) -> Self {
        self.timescale = timescale.to_string();
        self
    }

    /// Declare a wire by its dotted path; all but the last segment are scopes.
    pub fn wire(mut self, path: &str, width: u32) -> Self {
        let code = code_for(self.vars.len());
        self.vars.push(Var {
            path: path.to_string(),
            width,
            code,
        });
        self
    }

    /// Record a numeric value change.
    pub fn change(self, time: u64, path: &str, value: u64) -> Self {
        let width = self.width_of(path);
        let bits = format!("{value:0width$b}", width = width as usize);
        self.change_raw(time, path, &bits)
    }

    /// Record a raw bit-string change such as `x` or `10z1`.
    pub fn change_raw(mut self, time: u64, path: &str, bits: &str) -> Self {
        let index = self
            .vars
            .iter()
            .position(|v| v.path == path)
            .unwrap_or_else(|| panic!("VcdBuilder: wire {path} was never declared"));
        self.changes
            .entry(time)
            .or_default()
            .push((index, bits.to_string()));
        self
    }

    fn width_of(&self, path: &str) -> u32 {
        self.vars
            .iter()
            .find(|v| v.path == path)
            .map(|v| v.width)
            .unwrap_or_else(|| panic!("VcdBuilder: wire {path} was never declared"))
    }

    /// Render the VCD text.
    pub fn build(&self) -> String {
        let mut out = String::new();
        writeln!(out, "$date\n  fixture\n$end").unwrap();
        writeln!(out, "$version\n  wave-test-utils\n$end").unwrap();
        writeln!(out, "$timescale {} $end", self.timescale).unwrap();

        let mut open: Vec<&str> = Vec::new();
        for var in &self.vars {
            let mut segments: Vec<&str> = var.path.split('.').collect();
            let name = segments.pop().unwrap_or_default();
            let common = open
                .iter()
                .zip(&segments)
                .take_while(|(a, b)| a == b)
                .count();
            while open.len() > common {
                open.pop();
                writeln!(out, "$upscope $end").unwrap();
            }
            for scope in &segments[common..] {
                writeln!(out, "$scope module {scope} $end").unwrap();
                open.push(*scope);
            }
            let range = if var.width > 1 {
                format!(" [{}:0]", var.width - 1)
            } else {
                String::new()
            };
            writeln!(
                out,
                "$var wire {} {} {}{} $end",
                var.width, var.code, name, range
            )
            .unwrap();
        }
        for _ in &open {
            writeln!(out, "$upscope $end").unwrap();
        }
        writeln!(out, "$enddefinitions $end").unwrap();

        for (time, changes) in &self.changes {
            writeln!(out, "#{time}").unwrap();
            for (index, bits) in changes {
                let var = &self.vars[*index];
                if var.width == 1 {
                    writeln!(out, "{bits}{}", var.code).unwrap();
                } else {
                    writeln!(out, "b{bits} {}", var.code).unwrap();
                }
            }
        }
        out
    }
}
