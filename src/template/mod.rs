//! Readers for audit workbook templates.
//!
//! A template reader knows where each region of a sheet lives, runs the
//! scanners over it and assembles the results into a [`Record`](crate::record::Record).

pub mod std211;

pub use std211::read_std211;
