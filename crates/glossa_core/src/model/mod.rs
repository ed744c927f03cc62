//! Domain model for annotated documents.
//!
//! # Responsibility
//! - Define the snapshots both engines consume and produce.
//! - Keep wire names compatible with the persistence layer.
//!
//! # Invariants
//! - Every domain object is identified by an opaque `Id`.
//! - Snapshots are plain values; engines never mutate shared instances.

pub mod block;
pub mod document;
pub mod fragment;
pub mod id;
pub mod render_map;
