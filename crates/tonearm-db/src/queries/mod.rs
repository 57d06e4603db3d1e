//! Database query modules.
//!
//! - songs: song catalog and the play counter

pub mod songs;
