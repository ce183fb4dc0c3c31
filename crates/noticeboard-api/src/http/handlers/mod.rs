//! HTTP request handlers for the REST API.

pub mod chats;
pub mod events;
pub mod sections;
