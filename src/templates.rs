//! Basic test skeletons used when the backend cannot be reached.

use std::path::Path;

use crate::locator::java::DEFAULT_RETURN_TYPE;
use crate::locator::FunctionInfo;

/// Test framework conventionally used for a language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFramework {
    Jest,
    Pytest,
    JUnit,
    Generic,
}

impl TestFramework {
    pub fn for_language(language: &str) -> Self {
        match language {
            "typescript" | "javascript" => Self::Jest,
            "python" => Self::Pytest,
            "java" => Self::JUnit,
            _ => Self::Generic,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Jest => "jest",
            Self::Pytest => "pytest",
            Self::JUnit => "junit",
            Self::Generic => "generic",
        }
    }
}

/// Render a basic test skeleton for `info`.
///
/// `source_path` names the module to import from; without it a placeholder
/// module name is used.
pub fn basic_template(info: &FunctionInfo, source_path: Option<&Path>) -> String {
    match TestFramework::for_language(&info.language) {
        TestFramework::Jest => jest_template(info, source_path),
        TestFramework::Pytest => pytest_template(info, source_path),
        TestFramework::JUnit => junit_template(info),
        TestFramework::Generic => generic_template(info),
    }
}

fn jest_template(info: &FunctionInfo, source_path: Option<&Path>) -> String {
    let module = module_stem(source_path, "source");
    let import = if info.language == "typescript" {
        format!("import {{ {} }} from '../{}';", info.name, module)
    } else {
        format!("const {{ {} }} = require('../{}');", info.name, module)
    };
    let name = &info.name;
    let args = placeholder_args(info);

    format!(
        r#"{import}

describe('{name}', () => {{
    it('should work correctly', () => {{
        // TODO: add test cases
        // const result = {name}({args});
        // expect(result).toBeDefined();
    }});

    it('should handle edge cases', () => {{
        // TODO: add edge case tests
    }});
}});
"#
    )
}

fn pytest_template(info: &FunctionInfo, source_path: Option<&Path>) -> String {
    let module = module_stem(source_path, "module");
    let name = &info.name;
    let args = placeholder_args(info);

    format!(
        r#"import pytest
from {module} import {name}

def test_{name}():
    """Test {name}"""
    # TODO: add test cases
    # result = {name}({args})
    # assert result is not None

def test_{name}_edge_cases():
    """Test {name} edge cases"""
    # TODO: add edge case tests
    pass
"#
    )
}

fn junit_template(info: &FunctionInfo) -> String {
    let name = &info.name;
    let cap = capitalize(name);
    let args = placeholder_args(info);
    let return_type = info.return_type.as_deref().unwrap_or(DEFAULT_RETURN_TYPE);

    format!(
        r#"import org.junit.Test;
import static org.junit.Assert.*;

public class {name}Test {{

    @Test
    public void test{cap}() {{
        // TODO: add test cases
        // {return_type} result = {name}({args});
        // assertNotNull(result);
    }}

    @Test
    public void test{cap}EdgeCases() {{
        // TODO: add edge case tests
    }}
}}
"#
    )
}

fn generic_template(info: &FunctionInfo) -> String {
    let name = &info.name;
    let cap = capitalize(name);
    let args = placeholder_args(info);

    format!(
        r#"// Test for {name}
// TODO: implement test cases

function test{cap}() {{
    // basic behaviour
    // const result = {name}({args});
    // assert result !== undefined;
}}

function test{cap}EdgeCases() {{
    // edge cases
}}
"#
    )
}

/// One `arg` placeholder per parameter
fn placeholder_args(info: &FunctionInfo) -> String {
    vec!["arg"; info.parameters.len()].join(", ")
}

fn module_stem(source_path: Option<&Path>, fallback: &str) -> String {
    source_path
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or(fallback)
        .to_string()
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
