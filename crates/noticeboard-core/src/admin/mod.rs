//! Admin surface: the mutation state machine and its views.

pub mod engine;
pub mod panel;

pub use engine::{AdminEngine, AdminOutcome};
