//! Shared test utilities for the waveform-mcp workspace.
//!
//! This crate provides standardised waveform fixtures so the reader, the
//! evaluator and the server test against the same recordings. It is a
//! dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`vcd`]: [`VcdBuilder`] for writing VCD text
//! - [`fixtures`]: canonical recordings and [`TestWaveforms`] on disk

pub mod fixtures;
pub mod vcd;

pub use fixtures::{SIM_IR_CHANGES, TestWaveforms, counter_vcd, empty_vcd, sim_vcd};
pub use vcd::VcdBuilder;
