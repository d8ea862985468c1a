//! Where generated tests go on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;

/// Extension for a generated test file
pub fn test_file_extension(language: &str) -> &'static str {
    match language {
        "typescript" => ".ts",
        "javascript" => ".js",
        "python" => ".py",
        "java" => ".java",
        _ => ".js",
    }
}

/// `<source dir>/<test_directory>/<stem>.test<ext>`
pub fn test_file_path(source: &Path, language: &str, test_directory: &str) -> PathBuf {
    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{}.test{}", stem, test_file_extension(language));
    dir.join(test_directory).join(file_name)
}

/// Write a test file, creating its directory if needed
pub fn write_test_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    fs::write(path, contents)?;
    info!(path = %path.display(), bytes = contents.len(), "wrote test file");
    Ok(())
}
