//! Moovmend - salvage interrupted MP4/MOV captures
//!
//! This library crate exposes the batch repair and configuration layers for
//! the binary and for integration testing. The byte-level algorithm lives
//! in `moovmend-core`.

pub mod config;
pub mod repair;
