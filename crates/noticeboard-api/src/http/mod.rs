//! HTTP adapter for Noticeboard.
//!
//! Axum-based REST API at `/api/v1/`. Clients post inbound events and drain
//! the per-chat outbox of replies, with optional bearer token
//! authentication and an envelope response format.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod outbox;
pub mod response;
pub mod router;
pub mod server;
