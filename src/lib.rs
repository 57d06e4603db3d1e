//! Tonearm - audio streaming server
//!
//! Serves stored songs over HTTP with byte-range support and counts a play
//! whenever a stream starts at the beginning of the file. This library crate
//! exposes the core functionality for integration testing.

pub mod config;
pub mod server;
pub mod streaming;
