//! Opaque identifiers and the injected identifier source.
//!
//! # Responsibility
//! - Give every block, fragmentable, fragment and grid cell a typed identity.
//! - Keep id generation outside the engines behind `IdSource`.
//!
//! # Invariants
//! - Ids are compared by equality only; the core never parses them.
//! - Cloning an `Id` shares the underlying string storage.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Opaque, globally unique identifier.
///
/// Wraps the string form so ids cannot be mixed up with plain text in
/// signatures. Serialized as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Id(Arc<str>);

impl Id {
    /// Borrows the raw string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<Uuid> for Id {
    fn from(value: Uuid) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Id> for String {
    fn from(value: Id) -> Self {
        value.0.to_string()
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplier of fresh identifiers.
///
/// Implementations must never hand out the same id twice.
pub trait IdSource {
    fn next_id(&self) -> Id;
}

/// Default identifier source backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn next_id(&self) -> Id {
        Id::from(Uuid::new_v4())
    }
}

impl<S: IdSource + ?Sized> IdSource for &S {
    fn next_id(&self) -> Id {
        (**self).next_id()
    }
}
