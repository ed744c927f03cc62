//! Editor configuration: languages and dictionary lookup sources.
//!
//! # Responsibility
//! - Describe per-language dictionary lookup sources.
//! - Resolve the active language.
//!
//! # Invariants
//! - Language ids are unique and non-blank.
//! - At most one language is marked default.
//! - `active_language`, when set, names a configured language.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Placeholder replaced by the looked-up term in a source template.
pub const LOOKUP_TERM_PLACEHOLDER: &str = "{}";

/// One external dictionary consulted for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryLookupSource {
    /// Lower value is consulted first.
    pub priority: u32,
    pub name: String,
    /// URL template containing `{}` for the term.
    pub source: String,
}

impl DictionaryLookupSource {
    /// Substitutes `term` into the source template.
    pub fn resolve(&self, term: &str) -> String {
        self.source.replace(LOOKUP_TERM_PLACEHOLDER, term)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    pub id: String,
    pub name: String,
    pub default: bool,
    pub lookup_sources: Vec<DictionaryLookupSource>,
}

impl LanguageConfig {
    /// Lookup sources by ascending priority; ties keep declaration order.
    pub fn lookup_sources_by_priority(&self) -> Vec<&DictionaryLookupSource> {
        let mut sources: Vec<_> = self.lookup_sources.iter().collect();
        sources.sort_by_key(|source| source.priority);
        sources
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    pub language_configs: Vec<LanguageConfig>,
    #[serde(default)]
    pub active_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    NoLanguages,
    BlankLanguageId,
    DuplicateLanguage(String),
    MultipleDefaults { first: String, second: String },
    UnknownActiveLanguage(String),
    BlankLookupSource { language: String },
}

impl Display for ConfigValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLanguages => write!(f, "at least one language must be configured"),
            Self::BlankLanguageId => write!(f, "language id must not be blank"),
            Self::DuplicateLanguage(id) => write!(f, "language configured twice: {id}"),
            Self::MultipleDefaults { first, second } => {
                write!(f, "only one default language allowed, found {first} and {second}")
            }
            Self::UnknownActiveLanguage(id) => write!(f, "active language is not configured: {id}"),
            Self::BlankLookupSource { language } => {
                write!(f, "lookup source name and template must not be blank ({language})")
            }
        }
    }
}

impl Error for ConfigValidationError {}

impl EditorConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.language_configs.is_empty() {
            return Err(ConfigValidationError::NoLanguages);
        }

        let mut seen = HashSet::new();
        let mut default: Option<&str> = None;
        for language in &self.language_configs {
            let id = language.id.trim();
            if id.is_empty() {
                return Err(ConfigValidationError::BlankLanguageId);
            }
            if !seen.insert(id) {
                return Err(ConfigValidationError::DuplicateLanguage(id.to_string()));
            }
            if language.default {
                if let Some(first) = default {
                    return Err(ConfigValidationError::MultipleDefaults {
                        first: first.to_string(),
                        second: id.to_string(),
                    });
                }
                default = Some(id);
            }
            let blank_source = language
                .lookup_sources
                .iter()
                .any(|source| source.name.trim().is_empty() || source.source.trim().is_empty());
            if blank_source {
                return Err(ConfigValidationError::BlankLookupSource {
                    language: id.to_string(),
                });
            }
        }

        match &self.active_language {
            Some(active) if !seen.contains(active.trim()) => {
                Err(ConfigValidationError::UnknownActiveLanguage(active.clone()))
            }
            _ => Ok(()),
        }
    }

    /// The active language, else the default one.
    pub fn active_language(&self) -> Option<&LanguageConfig> {
        match &self.active_language {
            Some(active) => self.language(active),
            None => self.language_configs.iter().find(|language| language.default),
        }
    }

    pub fn language(&self, id: &str) -> Option<&LanguageConfig> {
        self.language_configs
            .iter()
            .find(|language| language.id.trim() == id.trim())
    }
}
