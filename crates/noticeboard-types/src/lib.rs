//! Shared domain types for Noticeboard.
//!
//! This crate contains the domain types used across the Noticeboard workspace:
//! sections, records, chat identities, rendered views, inbound events, the
//! admin mutation phase, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod admin;
pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod record;
pub mod section;
pub mod view;
