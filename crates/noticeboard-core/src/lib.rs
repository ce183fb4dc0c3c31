//! Business logic and repository trait definitions for Noticeboard.
//!
//! This crate defines the "ports" (record repository, transport, section
//! content, authorizer) that the infrastructure and application layers
//! implement, plus the per-chat navigation and admin state machines that run
//! on top of them. It depends only on `noticeboard-types` -- never on
//! `noticeboard-infra` or any database/IO crate.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod content;
pub mod dispatch;
pub mod navigation;
pub mod repository;
pub mod state;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
