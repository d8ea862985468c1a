//! Curly-brace function extraction for JavaScript and TypeScript.
//!
//! This is also the fallback extractor for tags nobody registered. A line is
//! a declaration when it matches one of these, tried in order:
//! - `function name(params)`, optionally `export` / `async`
//! - `const name = (params) =>` or `const name = function(params)`
//! - object-literal methods: `name: function(params)` / `name: (params) =>`
//! - class methods: `[async] name(params) {`
//!
//! Arrow functions and class methods may carry a TypeScript return type
//! annotation between the parameter list and `=>` / `{`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::common::{brace_block_end, scan_upward, split_lines, Signature};
use super::{Extractor, FunctionInfo};

// ============ Declaration Patterns ============

/// A declaration pattern and the capture groups that may hold its parameters
struct DeclarationPattern {
    regex: Regex,
    /// Group 1 is always the name; the first of these that matched is the
    /// parameter text
    parameter_groups: &'static [usize],
}

impl DeclarationPattern {
    fn new(pattern: &str, parameter_groups: &'static [usize]) -> Self {
        Self {
            regex: Regex::new(pattern).unwrap(),
            parameter_groups,
        }
    }

    fn signature(&self, caps: &Captures) -> Signature {
        let name = caps.get(1).map_or("", |m| m.as_str());
        let params = self
            .parameter_groups
            .iter()
            .find_map(|&group| caps.get(group))
            .map_or("", |m| m.as_str());
        Signature::new(name, params)
    }
}

static DECLARATION_PATTERNS: Lazy<Vec<DeclarationPattern>> = Lazy::new(|| {
    vec![
        DeclarationPattern::new(
            r"(?:export\s+)?(?:async\s+)?function\s+(\w+)\s*\(([^)]*)\)",
            &[2],
        ),
        DeclarationPattern::new(
            r"(?:export\s+)?const\s+(\w+)\s*=\s*(?:\(([^)]*)\)(?:\s*:[^=]*)?\s*=>|function\s*\(([^)]*)\))",
            &[2, 3],
        ),
        DeclarationPattern::new(
            r"(\w+)\s*:\s*(?:function\s*\(([^)]*)\)|\(([^)]*)\)(?:\s*:[^=]*)?\s*=>)",
            &[2, 3],
        ),
        // The return type may not contain `(){};=`, so calls and arrows in a body never match
        DeclarationPattern::new(
            r"(?:async\s+)?(\w+)\s*\(([^)]*)\)(?:\s*:\s*[^(){};=]+)?\s*\{",
            &[2],
        ),
    ]
});

/// Keywords whose `keyword (...) {` lines look like class methods
const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "with"];

/// Match a line against the declaration patterns in priority order
pub fn match_declaration(line: &str) -> Option<Signature> {
    let trimmed = line.trim();
    DECLARATION_PATTERNS.iter().find_map(|pattern| {
        pattern
            .regex
            .captures(trimmed)
            .map(|caps| pattern.signature(&caps))
            .filter(|sig| !CONTROL_KEYWORDS.contains(&sig.name.as_str()))
    })
}

// ============ Extractor ============

/// Brace-counting extractor for `{ }` languages
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlyFunctionExtractor;

impl Extractor for CurlyFunctionExtractor {
    fn name(&self) -> &'static str {
        "curly-function"
    }

    fn extract(&self, source: &str, cursor_line: usize, language: &str) -> Option<FunctionInfo> {
        let lines = split_lines(source);
        scan_upward(&lines, cursor_line, match_declaration, brace_block_end)
            .map(|candidate| candidate.into_function_info(&lines, language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str, cursor_line: usize) -> Option<FunctionInfo> {
        CurlyFunctionExtractor.extract(source, cursor_line, "javascript")
    }

    #[test]
    fn test_match_named_function() {
        let sig = match_declaration("export async function load(url, opts) {").unwrap();
        assert_eq!(sig.name, "load");
        assert_eq!(sig.parameters, vec!["url", "opts"]);
        assert_eq!(sig.return_type, None);
    }

    #[test]
    fn test_match_const_arrow_and_function_expression() {
        let arrow = match_declaration("export const sum = (a, b) => {").unwrap();
        assert_eq!(arrow.name, "sum");
        assert_eq!(arrow.parameters, vec!["a", "b"]);

        let expr = match_declaration("const mul = function(x, y) {").unwrap();
        assert_eq!(expr.name, "mul");
        assert_eq!(expr.parameters, vec!["x", "y"]);
    }

    #[test]
    fn test_match_object_method() {
        let sig = match_declaration("  onClick: function(event) {").unwrap();
        assert_eq!(sig.name, "onClick");
        assert_eq!(sig.parameters, vec!["event"]);

        let sig = match_declaration("  onHover: (event, target) => {").unwrap();
        assert_eq!(sig.name, "onHover");
        assert_eq!(sig.parameters, vec!["event", "target"]);
    }

    #[test]
    fn test_match_class_method() {
        let sig = match_declaration("    async getUser(id: string) {").unwrap();
        assert_eq!(sig.name, "getUser");
        assert_eq!(sig.parameters, vec!["id: string"]);
    }

    #[test]
    fn test_match_return_type_annotations() {
        let sig = match_declaration("    async getUser(id: string): Promise<User | null> {").unwrap();
        assert_eq!(sig.name, "getUser");
        assert_eq!(sig.parameters, vec!["id: string"]);

        let sig = match_declaration("const parse = (raw: string): Config => {").unwrap();
        assert_eq!(sig.name, "parse");
        assert_eq!(sig.parameters, vec!["raw: string"]);
    }

    #[test]
    fn test_named_function_wins_over_later_patterns() {
        // Also matches the class-method pattern, but the named form is tried first
        let sig = match_declaration("function go(a) {").unwrap();
        assert_eq!(sig.name, "go");
    }

    #[test]
    fn test_control_flow_is_not_a_method() {
        assert!(match_declaration("if (x) {").is_none());
        assert!(match_declaration("} else if (ready) {").is_none());
        assert!(match_declaration("for (let i = 0; i < n; i++) {").is_none());
        assert!(match_declaration("} catch (err) {").is_none());
    }

    #[test]
    fn test_calls_followed_by_colon_are_not_methods() {
        assert!(match_declaration("  return items.map((item): Row => {").is_none());
        assert!(match_declaration("  const v = cond ? build(a) : make({").is_none());
    }

    #[test]
    fn test_plain_statements_do_not_match() {
        assert!(match_declaration("return inner();").is_none());
        assert!(match_declaration("const x = 42;").is_none());
        assert!(match_declaration("}").is_none());
    }

    #[test]
    fn test_extract_simple_function() {
        let code = "function add(a, b) {\n  return a + b;\n}\n";
        let info = extract(code, 1).unwrap();
        assert_eq!(info.name, "add");
        assert_eq!(info.start_line, 0);
        assert_eq!(info.end_line, 2);
        assert_eq!(info.code, "function add(a, b) {\n  return a + b;\n}");
        assert_eq!(info.parameters, vec!["a", "b"]);
        assert_eq!(info.language, "javascript");
    }

    #[test]
    fn test_extract_outer_when_inner_is_closed() {
        let code = "function outer() {\n  function inner() { return 1; }\n  return inner();\n}";
        let info = extract(code, 2).unwrap();
        assert_eq!(info.name, "outer");
        assert_eq!((info.start_line, info.end_line), (0, 3));
    }

    #[test]
    fn test_extract_inner_when_cursor_on_it() {
        let code = "function outer() {\n  function inner() { return 1; }\n  return inner();\n}";
        let info = extract(code, 1).unwrap();
        assert_eq!(info.name, "inner");
        assert_eq!((info.start_line, info.end_line), (1, 1));
    }

    #[test]
    fn test_extract_unterminated_block_runs_to_eof() {
        let code = "function broken(x) {\n  if (x) {\n    go();\n  }\n";
        let info = extract(code, 2).unwrap();
        assert_eq!(info.name, "broken");
        assert_eq!(info.end_line, 4);
    }

    #[test]
    fn test_extract_outside_any_function() {
        let code = "const x = 1;\nfunction f() {\n  return x;\n}\nconsole.log(f());";
        assert!(extract(code, 0).is_none());
        assert!(extract(code, 4).is_none());
    }

    #[test]
    fn test_extract_skips_typed_callback_and_ternary() {
        let code = "function outer(items) {\n  return items.map((item): Row => {\n    return item.id;\n  });\n}";
        let info = extract(code, 2).unwrap();
        assert_eq!(info.name, "outer");
        assert_eq!((info.start_line, info.end_line), (0, 4));

        let code = "function pick(k) {\n  const v = cond ? build(a) : make({\n    x: 1,\n  });\n  return v;\n}";
        let info = extract(code, 2).unwrap();
        assert_eq!(info.name, "pick");
        assert_eq!(info.parameters, vec!["k"]);
        assert_eq!((info.start_line, info.end_line), (0, 5));
    }

    #[test]
    fn test_extract_empty_parameters() {
        let code = "function f() {\n}";
        let info = extract(code, 0).unwrap();
        assert!(info.parameters.is_empty());
    }
}
