//! Infrastructure layer for Noticeboard.
//!
//! Contains implementations of the ports defined in `noticeboard-core`:
//! SQLite record storage, filesystem-backed section pages, and the
//! `config.toml` loader.

pub mod config;
pub mod filesystem;
pub mod sqlite;
