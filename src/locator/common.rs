//! Scanning primitives shared by every extractor.
//!
//! The locator never builds a syntax tree. Everything here works on the raw
//! lines of a document: counting block delimiters, measuring indentation and
//! splitting parameter lists.

use tracing::trace;

use super::FunctionInfo;

// ============ Signature ============

/// Name and parameter data captured from a declaration line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub parameters: Vec<String>,
    pub return_type: Option<String>,
}

impl Signature {
    pub fn new(name: &str, raw_parameters: &str) -> Self {
        Self {
            name: name.to_string(),
            parameters: split_parameters(raw_parameters),
            return_type: None,
        }
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }
}

/// A declaration that has been matched and measured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub signature: Signature,
    pub start_line: usize,
    pub end_line: usize,
}

impl Candidate {
    pub fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// Turn the candidate into the caller-facing record
    pub fn into_function_info(self, lines: &[&str], language: &str) -> FunctionInfo {
        FunctionInfo {
            name: self.signature.name,
            code: lines[self.start_line..=self.end_line].join("\n"),
            start_line: self.start_line,
            end_line: self.end_line,
            language: language.to_string(),
            parameters: self.signature.parameters,
            return_type: self.signature.return_type,
        }
    }
}

// ============ Line Handling ============

/// Split a document into lines on `\n` only.
///
/// A trailing newline yields a final empty line, so line indices line up with
/// editor line numbers.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Number of leading whitespace characters
pub fn indentation_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Comma-split a raw parameter list, trimming each entry and dropping empties
pub fn split_parameters(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

// ============ Block Delimiters ============

/// Net change in `{ }` depth contributed by one line
pub fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |depth, ch| match ch {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

/// Find the line that closes the block opened on `start`.
///
/// Counting starts on the declaration line itself. A declaration that opens
/// and closes on one line ends there. When the count never returns to zero the
/// block runs to the last line.
pub fn brace_block_end(lines: &[&str], start: usize) -> usize {
    let last = lines.len().saturating_sub(1);
    let header = lines[start];
    let mut depth = brace_delta(header);

    if depth == 0 && header.contains('}') {
        return start;
    }

    for (offset, line) in lines[start + 1..].iter().enumerate() {
        depth += brace_delta(line);
        if depth == 0 {
            return start + 1 + offset;
        }
    }

    trace!(start, "block never closed, extending to end of file");
    last
}

/// Find the last line of an indentation-scoped block whose header is `start`.
///
/// The block ends just before the first later non-blank line indented no
/// deeper than the header. Blank lines never end a block.
pub fn indented_block_end(lines: &[&str], start: usize) -> usize {
    let header_width = indentation_width(lines[start]);

    for (offset, line) in lines[start + 1..].iter().enumerate() {
        if is_blank(line) {
            continue;
        }
        if indentation_width(line) <= header_width {
            return start + offset;
        }
    }

    lines.len().saturating_sub(1)
}

// ============ Upward Scan ============

/// Walk from `cursor_line` up to line 0 and return the first declaration whose
/// block contains the cursor.
///
/// `match_header` decides whether a line declares a function; `block_end`
/// measures it. Candidates that do not contain the cursor are dropped and the
/// scan resumes on the line above.
pub fn scan_upward<M, E>(
    lines: &[&str],
    cursor_line: usize,
    match_header: M,
    block_end: E,
) -> Option<Candidate>
where
    M: Fn(&str) -> Option<Signature>,
    E: Fn(&[&str], usize) -> usize,
{
    if lines.is_empty() {
        return None;
    }
    let first = cursor_line.min(lines.len() - 1);

    for i in (0..=first).rev() {
        let Some(signature) = match_header(lines[i]) else {
            continue;
        };

        let candidate = Candidate {
            signature,
            start_line: i,
            end_line: block_end(lines, i),
        };

        if candidate.contains(cursor_line) {
            return Some(candidate);
        }

        trace!(
            name = %candidate.signature.name,
            start = candidate.start_line,
            end = candidate.end_line,
            cursor_line,
            "candidate does not contain cursor"
        );
    }

    None
}
