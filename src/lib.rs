//! Energy-aware Core Contraction Hierarchies.
//!
//! Preprocessing and query algorithms for point-to-point shortest paths in
//! road networks with a second, bounded energy dimension (think electric
//! vehicles with a finite battery and charging stations).
//! The crate contains the building blocks (`datastr`) and the algorithms on
//! top of them (`algo`), plus utilities for experiment I/O and reporting.

#[macro_use]
pub mod report;
pub mod algo;
pub mod cli;
pub mod datastr;
pub mod io;

pub mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
