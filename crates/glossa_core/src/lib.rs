//! Core data/algorithm layer for the glossa annotated document editor.
//!
//! Two pure engines carry the algorithmic weight:
//! - [`fragment`]: typed, possibly overlapping annotations over immutable text.
//! - [`grid`]: placement of content blocks in a sparse, row-major grid.
//!
//! [`service::document_service`] sequences both over one document snapshot.

pub mod config;
pub mod fragment;
pub mod grid;
pub mod logging;
pub mod model;
pub mod service;

pub use config::{ConfigValidationError, DictionaryLookupSource, EditorConfig, LanguageConfig};
pub use fragment::{FragmentIntersection, IntersectType};
pub use grid::{GridPosition, HorizontalSide, InsertPosition, VerticalDirection};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::block::{BlockKind, DialogLine, DocumentBlock, ImageAlignment, ImageConfig, TitleConfig};
pub use model::document::{
    Document, DocumentIdentifier, DocumentLink, DocumentSelection, DocumentValidationError,
    ExcerptedDocumentLink,
};
pub use model::fragment::{
    Fragment, FragmentData, FragmentSide, FragmentType, FragmentValidationError,
    FragmentableString, Range, RangeError,
};
pub use model::id::{Id, IdSource, UuidIdSource};
pub use model::render_map::{
    BlockRenderMap, EntryKind, RenderMapEntry, RenderMapEntryError, RenderMapRow,
    MAX_ENTRIES_PER_ROW,
};
pub use service::document_service::{
    DocumentService, DocumentServiceError, DocumentServiceResult, LayoutCommand,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
