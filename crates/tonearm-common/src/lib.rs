//! Tonearm-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across tonearm:
//!
//! - **Typed IDs**: Type-safe UUID wrappers for songs
//! - **Path Utilities**: Audio file detection and MIME type lookup by extension
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use tonearm_common::{SongId, Error, Result};
//! use tonearm_common::paths::is_audio_file;
//! use std::path::Path;
//!
//! let song_id = SongId::new();
//!
//! assert!(is_audio_file(Path::new("track.mp3")));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("song"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;

pub use error::{Error, Result};
pub use ids::*;
