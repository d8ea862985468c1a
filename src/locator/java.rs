//! Method extraction for languages that spell out an access modifier.
//!
//! A declaration line looks like `public|private|protected [static ...] Type name(params)`.
//! The block is measured by brace counting, same as the curly extractor.
//! When the type token is missing (constructors) the return type is `void`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::common::{brace_block_end, scan_upward, split_lines, Signature};
use super::{Extractor, FunctionInfo};

/// Return type reported when the declaration has no type token
pub const DEFAULT_RETURN_TYPE: &str = "void";

// Modifier, optional keyword modifiers, optional type (group 1), name (2), params (3)
static METHOD_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:public|private|protected)\s+(?:(?:static|final|abstract|synchronized|native)\s+)*(?:(\S+)\s+)?(\w+)\s*\(([^)]*)\)",
    )
    .unwrap()
});

/// Match an access-modified method declaration
pub fn match_method(line: &str) -> Option<Signature> {
    let caps = METHOD_DECLARATION.captures(line)?;
    let return_type = caps.get(1).map_or(DEFAULT_RETURN_TYPE, |m| m.as_str());
    let params = caps.get(3).map_or("", |m| m.as_str());
    Some(Signature::new(&caps[2], params).with_return_type(return_type))
}

/// Brace-counting extractor for `MODIFIER TYPE name(...)` methods
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessModifierExtractor;

impl Extractor for AccessModifierExtractor {
    fn name(&self) -> &'static str {
        "access-modifier"
    }

    fn extract(&self, source: &str, cursor_line: usize, language: &str) -> Option<FunctionInfo> {
        let lines = split_lines(source);
        scan_upward(&lines, cursor_line, match_method, brace_block_end)
            .map(|candidate| candidate.into_function_info(&lines, language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALCULATOR: &str = r#"public class Calculator {
    private int total;

    public int add(int a, int b) {
        total += a + b;
        return total;
    }

    public static String describe(Calculator c) {
        if (c == null) {
            return "none";
        }
        return "calc";
    }
}"#;

    #[test]
    fn test_match_method() {
        let sig = match_method("    public int add(int a, int b) {").unwrap();
        assert_eq!(sig.name, "add");
        assert_eq!(sig.parameters, vec!["int a", "int b"]);
        assert_eq!(sig.return_type.as_deref(), Some("int"));
    }

    #[test]
    fn test_match_static_method() {
        let sig = match_method("public static String describe(Calculator c) {").unwrap();
        assert_eq!(sig.name, "describe");
        assert_eq!(sig.return_type.as_deref(), Some("String"));
    }

    #[test]
    fn test_constructor_defaults_to_void() {
        let sig = match_method("    public Calculator(int seed) {").unwrap();
        assert_eq!(sig.name, "Calculator");
        assert_eq!(sig.return_type.as_deref(), Some(DEFAULT_RETURN_TYPE));
        assert_eq!(sig.parameters, vec!["int seed"]);
    }

    #[test]
    fn test_non_methods_do_not_match() {
        assert!(match_method("public class Calculator {").is_none());
        assert!(match_method("    private int total;").is_none());
        assert!(match_method("int helper(int x) {").is_none());
    }

    #[test]
    fn test_extract_method_body() {
        let info = AccessModifierExtractor.extract(CALCULATOR, 5, "java").unwrap();
        assert_eq!(info.name, "add");
        assert_eq!((info.start_line, info.end_line), (3, 6));
        assert_eq!(info.return_type.as_deref(), Some("int"));
        assert!(info.code.starts_with("    public int add"));
        assert!(info.code.ends_with("    }"));
    }

    #[test]
    fn test_extract_nested_braces() {
        let info = AccessModifierExtractor.extract(CALCULATOR, 10, "java").unwrap();
        assert_eq!(info.name, "describe");
        assert_eq!((info.start_line, info.end_line), (8, 13));
        assert_eq!(info.parameters, vec!["Calculator c"]);
    }

    #[test]
    fn test_extract_between_methods_is_not_found() {
        // Line 7 is the blank line after `add`; no method encloses it
        assert!(AccessModifierExtractor.extract(CALCULATOR, 7, "java").is_none());
        assert!(AccessModifierExtractor.extract(CALCULATOR, 1, "java").is_none());
    }

    #[test]
    fn test_extract_unterminated_method() {
        let code = "class A {\n    public void run() {\n        work();\n";
        let info = AccessModifierExtractor.extract(code, 2, "java").unwrap();
        assert_eq!(info.name, "run");
        assert_eq!(info.end_line, 3);
    }
}
