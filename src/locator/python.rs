//! Python function extraction.
//!
//! Headers are `def name(params)` lines (which also covers `async def`). A
//! block extends until the next non-blank line that is indented no deeper
//! than its header.

use once_cell::sync::Lazy;
use regex::Regex;

use super::common::{indented_block_end, scan_upward, split_lines, Signature};
use super::{Extractor, FunctionInfo};

static DEF_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"def\s+(\w+)\s*\(([^)]*)\)").unwrap());

/// Match a `def` header line
pub fn match_def(line: &str) -> Option<Signature> {
    let caps = DEF_HEADER.captures(line)?;
    Some(Signature::new(&caps[1], caps.get(2).map_or("", |m| m.as_str())))
}

/// Indentation-scoped extractor for `def` blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct IndentationExtractor;

impl Extractor for IndentationExtractor {
    fn name(&self) -> &'static str {
        "indentation"
    }

    fn extract(&self, source: &str, cursor_line: usize, language: &str) -> Option<FunctionInfo> {
        let lines = split_lines(source);
        scan_upward(&lines, cursor_line, match_def, indented_block_end)
            .map(|candidate| candidate.into_function_info(&lines, language))
    }
}
