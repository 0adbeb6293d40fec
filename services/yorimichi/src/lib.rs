//! Yorimichi Host Library Crate
//!
//! Configuration and CLI handling for the walking-guide host. The binary in
//! `bin/yorimichi.rs` wires these to the live client and the overlay.

pub mod cli;
pub mod config;
