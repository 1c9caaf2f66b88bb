//! Canonical recordings shared by the test suites.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::VcdBuilder;

/// A small counter testbench.
///
/// - 81 time steps at timestamps `0, 5, ..., 400` (`1ns`)
/// - `tb.clk` toggles every step, high on odd steps (40 high steps)
/// - `tb.reset` is high for steps 0-3
/// - `tb.dut.counter` (4 bits) increments on each rising edge out of reset
pub fn counter_vcd() -> String {
    let mut builder = VcdBuilder::new()
        .timescale("1ns")
        .wire("tb.clk", 1)
        .wire("tb.reset", 1)
        .wire("tb.dut.counter", 4);

    let mut counter = 0u64;
    for step in 0..=80u64 {
        let time = step * 5;
        builder = builder.change(time, "tb.clk", step % 2);
        if step == 0 {
            builder = builder
                .change(time, "tb.reset", 1)
                .change(time, "tb.dut.counter", 0);
        }
        if step == 4 {
            builder = builder.change(time, "tb.reset", 0);
        }
        if step % 2 == 1 && step > 4 {
            counter = (counter + 1) % 16;
            builder = builder.change(time, "tb.dut.counter", counter);
        }
    }
    builder.build()
}

/// A CPU-flavoured recording whose timestamps equal their time step.
///
/// - 151 time steps at timestamps `0..=150`
/// - `mem.addr` (16 bits) changes every step
/// - `cpu.pc` (32 bits) advances by 4 every fourth step
/// - `cpu.ir` (32 bits) changes only at steps [`SIM_IR_CHANGES`]
pub fn sim_vcd() -> String {
    let mut builder = VcdBuilder::new()
        .timescale("1ps")
        .wire("cpu.pc", 32)
        .wire("cpu.ir", 32)
        .wire("mem.addr", 16);
    for step in 0..=150u64 {
        builder = builder.change(step, "mem.addr", (step * 4) % 65536);
        if step % 4 == 0 {
            builder = builder.change(step, "cpu.pc", step);
        }
    }
    for (i, step) in SIM_IR_CHANGES.iter().enumerate() {
        builder = builder.change(*step, "cpu.ir", 0x13 + i as u64);
    }
    builder.build()
}

/// Steps at which `cpu.ir` in [`sim_vcd`] takes a new value (step 0 is the
/// initial value, not a transition).
pub const SIM_IR_CHANGES: [u64; 7] = [0, 7, 23, 42, 99, 120, 149];

/// A recording that declares no signals at all.
pub fn empty_vcd() -> String {
    "$timescale 1ns $end\n$enddefinitions $end\n#0\n#10\n".to_string()
}

/// A temporary directory holding waveform files.
///
/// # Example
///
/// ```rust,no_run
/// use wave_test_utils::TestWaveforms;
///
/// let waves = TestWaveforms::new();
/// let path = waves.counter();
/// assert!(path.exists());
/// ```
pub struct TestWaveforms {
    temp_dir: TempDir,
}

impl Default for TestWaveforms {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWaveforms {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `name` inside the directory and return its path.
    pub fn write(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestWaveforms::write: {}: {e}", path.display()));
        path
    }

    /// `counter.vcd` from [`counter_vcd`].
    pub fn counter(&self) -> PathBuf {
        self.write("counter.vcd", counter_vcd())
    }

    /// `sim.vcd` from [`sim_vcd`].
    pub fn sim(&self) -> PathBuf {
        self.write("sim.vcd", sim_vcd())
    }

    /// `empty.vcd` from [`empty_vcd`].
    pub fn empty(&self) -> PathBuf {
        self.write("empty.vcd", empty_vcd())
    }
}
