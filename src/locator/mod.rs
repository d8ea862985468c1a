//! Function locator: finds the function under the cursor with line patterns
//!
//! Each language family has its own extractor. None of them parse the source;
//! they match declaration lines against an ordered set of patterns and then
//! measure the block either by counting braces or by indentation.
//!
//! ## Architecture
//!
//! ```text
//! locator/
//! ├── mod.rs         - FunctionInfo, Extractor trait, tag registry
//! ├── common.rs      - Line scanning, brace counting, parameter splitting
//! ├── javascript.rs  - Curly-brace functions (JS/TS and the fallback)
//! ├── java.rs        - Methods with an explicit access modifier
//! └── python.rs      - Indentation-scoped `def` blocks
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use guardian_lib::locator::extract;
//!
//! let info = extract("def foo(a):\n    return a", 1, "python").unwrap();
//! assert_eq!(info.name, "foo");
//! ```

pub mod common;
pub mod java;
pub mod javascript;
pub mod python;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use java::AccessModifierExtractor;
pub use javascript::CurlyFunctionExtractor;
pub use python::IndentationExtractor;

// ============ Result Type ============

/// The function located around a cursor line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub name: String,
    /// Source text from `start_line` to `end_line` inclusive
    pub code: String,
    /// 0-indexed declaration line
    pub start_line: usize,
    /// 0-indexed closing line
    pub end_line: usize,
    /// Language tag exactly as the caller passed it
    pub language: String,
    pub parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

// ============ Extractor Trait ============

/// A language-family specific function locator
pub trait Extractor: Send + Sync {
    /// Stable identifier, used in logs and to check dispatch
    fn name(&self) -> &'static str;

    /// Locate the function enclosing `cursor_line` (0-indexed).
    ///
    /// Returns `None` when no declaration above the cursor encloses it.
    fn extract(&self, source: &str, cursor_line: usize, language: &str) -> Option<FunctionInfo>;
}

// ============ Registry ============

/// Maps language tags to extractors, with a fallback for unknown tags
#[derive(Clone)]
pub struct ExtractorRegistry {
    by_tag: HashMap<String, Arc<dyn Extractor>>,
    fallback: Arc<dyn Extractor>,
}

impl ExtractorRegistry {
    /// Empty registry that sends every tag to `fallback`
    pub fn new(fallback: Arc<dyn Extractor>) -> Self {
        Self {
            by_tag: HashMap::new(),
            fallback,
        }
    }

    /// Registry with the built-in language tags
    pub fn builtin() -> Self {
        let curly: Arc<dyn Extractor> = Arc::new(CurlyFunctionExtractor);
        let mut registry = Self::new(curly.clone());
        registry.register("typescript", curly.clone());
        registry.register("javascript", curly);
        registry.register("python", Arc::new(IndentationExtractor));
        registry.register("java", Arc::new(AccessModifierExtractor));
        registry
    }

    /// Add an extractor for a new tag.
    ///
    /// Existing entries are never replaced; returns `false` if `tag` was
    /// already registered.
    pub fn register(&mut self, tag: impl Into<String>, extractor: Arc<dyn Extractor>) -> bool {
        let tag = tag.into();
        if self.is_registered(&tag) {
            debug!(%tag, "extractor already registered, keeping existing");
            return false;
        }
        self.by_tag.insert(tag, extractor);
        true
    }

    /// Extractor for `tag`; unknown tags get the fallback
    pub fn resolve(&self, tag: &str) -> &dyn Extractor {
        self.by_tag
            .get(tag)
            .map_or(self.fallback.as_ref(), |e| e.as_ref())
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Registered tags in sorted order
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.by_tag.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn extract(&self, source: &str, cursor_line: usize, language: &str) -> Option<FunctionInfo> {
        let extractor = self.resolve(language);
        debug!(language, extractor = extractor.name(), cursor_line, "locating function");
        extractor.extract(source, cursor_line, language)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("tags", &self.tags())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

static BUILTIN_REGISTRY: Lazy<ExtractorRegistry> = Lazy::new(ExtractorRegistry::builtin);

/// The process-wide registry with the built-in tags
pub fn registry() -> &'static ExtractorRegistry {
    &BUILTIN_REGISTRY
}

// ============ Main Entry Point ============

/// Locate the function enclosing `cursor_line` using the built-in registry
pub fn extract(source: &str, cursor_line: usize, language: &str) -> Option<FunctionInfo> {
    registry().extract(source, cursor_line, language)
}

/// One independent extraction request
#[derive(Debug, Clone, Copy)]
pub struct ExtractRequest<'a> {
    pub source: &'a str,
    pub cursor_line: usize,
    pub language: &'a str,
}

/// Run many extractions in parallel; results keep request order
pub fn extract_many(requests: &[ExtractRequest<'_>]) -> Vec<Option<FunctionInfo>> {
    requests
        .par_iter()
        .map(|req| extract(req.source, req.cursor_line, req.language))
        .collect()
}

// ============ Language Tags ============

/// Language tag for a file extension, as an editor would report it.
///
/// Unknown extensions are returned lower-cased so they still route through
/// the fallback extractor.
pub fn language_from_extension(ext: &str) -> String {
    let ext = ext.trim_start_matches('.').to_lowercase();
    match ext.as_str() {
        "ts" | "tsx" | "mts" | "cts" => "typescript".to_string(),
        "js" | "jsx" | "mjs" | "cjs" => "javascript".to_string(),
        "py" | "pyw" | "pyi" => "python".to_string(),
        "java" => "java".to_string(),
        _ => ext,
    }
}
