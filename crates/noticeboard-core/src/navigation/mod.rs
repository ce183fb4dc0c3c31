//! Navigation over a section's records.
//!
//! `engine` drives the per-chat state machine, `render` turns session state
//! into views, and `live_view` keeps the one navigation message per chat in
//! sync with the cursor.

pub mod engine;
pub mod live_view;
pub mod render;

pub use engine::NavigationEngine;
