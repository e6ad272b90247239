//! Drone Mass Calculator
//!
//! Computes the take-off mass of a UAV from a selection of components,
//! classifies it into a weight category and renders a text report. The
//! calculation itself lives in [`core`] and is pure; the [`cli`] module wires
//! it to a SQLite component catalog and calculation history.

pub mod cli;
pub mod core;
