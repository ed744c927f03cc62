//! Core use-case services.
//!
//! # Responsibility
//! - Sequence fragment and grid engine calls into document-level operations.
//! - Keep input layers decoupled from engine details.

pub mod document_service;
