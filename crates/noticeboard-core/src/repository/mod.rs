//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (noticeboard-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod record;
