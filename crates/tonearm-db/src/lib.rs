//! Tonearm-DB: Database schema, migrations, and query operations
//!
//! This crate provides the song catalog for tonearm using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use tonearm_db::pool::{init_pool, get_conn};
//! use tonearm_db::queries::songs;
//!
//! let pool = init_pool("/var/lib/tonearm/db.sqlite").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let song = songs::create_song(&conn, "Intro", None, "/music/intro.mp3", None).unwrap();
//! songs::increment_play_count(&conn, song.id).unwrap();
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
