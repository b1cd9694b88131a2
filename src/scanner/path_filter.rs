//! Path filtering with .gitignore-style patterns
//!
//! Directory walks only consider C source files (`.c`/`.h`); configured
//! patterns and `.cguardianignore` files narrow the set further. Paths the
//! user names explicitly skip the extension gate, so `c-guardian check
//! weird.inc` still works.

use crate::domain::violations::{StyleError, StyleResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions treated as C source during directory walks
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "h"];

/// Manages path filtering using .gitignore-style patterns
#[derive(Debug, Clone)]
pub struct PathFilter {
    patterns: Vec<FilterPattern>,
    /// Whether to look for per-directory ignore files
    process_ignore_files: bool,
    ignore_filename: String,
}

/// A single path filter pattern
#[derive(Debug, Clone)]
struct FilterPattern {
    pattern: glob::Pattern,
    /// Whether this is an include pattern (starts with !)
    is_include: bool,
    /// Original pattern string, kept for directory/anchored handling
    original: String,
}

impl FilterPattern {
    fn parse(raw: &str) -> StyleResult<Self> {
        let (is_include, pattern_str) = if let Some(stripped) = raw.strip_prefix('!') {
            (true, stripped.to_string())
        } else {
            (false, raw.to_string())
        };

        let pattern = glob::Pattern::new(&pattern_str)
            .map_err(|e| StyleError::pattern(format!("Invalid pattern '{pattern_str}': {e}")))?;

        Ok(Self {
            pattern,
            is_include,
            original: pattern_str,
        })
    }
}

impl PathFilter {
    /// Create a new path filter with the given patterns
    pub fn new(patterns: Vec<String>, ignore_filename: Option<String>) -> StyleResult<Self> {
        let patterns = patterns
            .iter()
            .map(|raw| FilterPattern::parse(raw))
            .collect::<StyleResult<Vec<_>>>()?;

        Ok(Self {
            patterns,
            process_ignore_files: ignore_filename.is_some(),
            ignore_filename: ignore_filename.unwrap_or_else(|| ".cguardianignore".to_string()),
        })
    }

    /// Create a default path filter with common build-tree exclusions
    pub fn with_defaults() -> StyleResult<Self> {
        Self::new(
            vec![
                "**/build/**".to_string(),
                "**/.git/**".to_string(),
                "**/*.generated.*".to_string(),
            ],
            Some(".cguardianignore".to_string()),
        )
    }

    /// Whether a path looks like C source
    pub fn has_source_extension<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
    }

    /// Check if a file should be checked based on patterns and ignore files
    pub fn should_check<P: AsRef<Path>>(&self, path: P) -> StyleResult<bool> {
        let path = path.as_ref();

        // Last matching pattern wins, like .gitignore.
        let mut should_include = true;
        for pattern in &self.patterns {
            if self.pattern_matches_path(pattern, path) {
                should_include = pattern.is_include;
            }
        }
        if !should_include {
            return Ok(false);
        }

        if self.process_ignore_files && self.is_ignored_by_files(path)? {
            return Ok(false);
        }

        Ok(true)
    }

    /// Check if path is excluded by an ignore file in a parent directory
    fn is_ignored_by_files<P: AsRef<Path>>(&self, path: P) -> StyleResult<bool> {
        let path = path.as_ref();
        let mut current_dir = path.parent();
        let mut is_ignored = false;

        while let Some(dir) = current_dir {
            let ignore_file = dir.join(&self.ignore_filename);
            if ignore_file.exists() {
                for pattern in self.load_ignore_file(&ignore_file)? {
                    if let Ok(relative_path) = path.strip_prefix(dir) {
                        if self.pattern_matches_path(&pattern, relative_path) {
                            is_ignored = !pattern.is_include;
                        }
                    }
                }
            }
            current_dir = dir.parent();
        }

        Ok(is_ignored)
    }

    fn load_ignore_file<P: AsRef<Path>>(&self, path: P) -> StyleResult<Vec<FilterPattern>> {
        let content = fs::read_to_string(&path).map_err(|e| {
            StyleError::config(format!(
                "Failed to read ignore file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let mut patterns = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match FilterPattern::parse(line) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => {
                    // Skip invalid patterns rather than failing the scan.
                    tracing::warn!("{} in {}", e, path.as_ref().display());
                }
            }
        }

        Ok(patterns)
    }

    /// Find all C source files under a directory tree
    pub fn find_files<P: AsRef<Path>>(&self, root: P) -> StyleResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root.as_ref())
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && Self::has_source_extension(path) && self.should_check(path)? {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Filter explicitly-named paths; the extension gate does not apply
    pub fn filter_paths<P: AsRef<Path>>(&self, paths: &[P]) -> StyleResult<Vec<PathBuf>> {
        let mut filtered = Vec::new();
        for path in paths {
            if self.should_check(path)? {
                filtered.push(path.as_ref().to_path_buf());
            }
        }
        Ok(filtered)
    }

    /// Add a pattern to the filter
    pub fn add_pattern(&mut self, pattern: String) -> StyleResult<()> {
        self.patterns.push(FilterPattern::parse(&pattern)?);
        Ok(())
    }

    /// Match one pattern against a path using .gitignore-style rules
    fn pattern_matches_path(&self, pattern: &FilterPattern, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        if pattern.original.ends_with('/') {
            // Directory pattern: match if any path component equals it.
            let dir_pattern = pattern.original.trim_end_matches('/');
            return path
                .components()
                .any(|c| c.as_os_str().to_string_lossy() == dir_pattern);
        }

        if let Some(anchored) = pattern.original.strip_prefix('/') {
            return glob::Pattern::new(anchored)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false);
        }

        if pattern.original.contains('/') {
            pattern.pattern.matches(&path_str)
        } else if let Some(filename) = path.file_name() {
            pattern.pattern.matches(&filename.to_string_lossy())
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_exclusion_pattern() {
        let filter = PathFilter::new(vec!["**/build/**".to_string()], None).unwrap();
        assert!(filter.should_check("src/object.c").unwrap());
        assert!(!filter.should_check("build/gen/object.c").unwrap());
    }

    #[test]
    fn test_include_overrides_earlier_exclude() {
        let filter = PathFilter::new(
            vec![
                "vendor/**".to_string(),
                "!vendor/ours/**".to_string(),
            ],
            None,
        )
        .unwrap();
        assert!(!filter.should_check("vendor/zlib/inflate.c").unwrap());
        assert!(filter.should_check("vendor/ours/util.c").unwrap());
    }

    #[test]
    fn test_filename_only_pattern() {
        let filter = PathFilter::new(vec!["*.tmp".to_string()], None).unwrap();
        assert!(!filter.should_check("deep/nested/scratch.tmp").unwrap());
        assert!(filter.should_check("deep/nested/module.c").unwrap());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(PathFilter::new(vec!["[invalid".to_string()], None).is_err());
    }

    #[test]
    fn test_source_extension_gate() {
        assert!(PathFilter::has_source_extension("src/object.c"));
        assert!(PathFilter::has_source_extension("include/object.h"));
        assert!(!PathFilter::has_source_extension("README.md"));
        assert!(!PathFilter::has_source_extension("Makefile"));
    }

    #[test]
    fn test_find_files_walks_only_c_source() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/module.c"), "int x;\n").unwrap();
        fs::write(root.join("src/module.h"), "extern int x;\n").unwrap();
        fs::write(root.join("src/notes.txt"), "not source\n").unwrap();

        let filter = PathFilter::with_defaults().unwrap();
        let mut files = filter.find_files(root).unwrap();
        files.sort();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["module.c", "module.h"]);
    }

    #[test]
    fn test_ignore_file_excludes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join(".cguardianignore"), "# generated\nsrc/lexer.c\n").unwrap();
        fs::write(root.join("src/lexer.c"), "").unwrap();
        fs::write(root.join("src/parser.c"), "").unwrap();

        let filter =
            PathFilter::new(vec![], Some(".cguardianignore".to_string())).unwrap();
        assert!(!filter.should_check(root.join("src/lexer.c")).unwrap());
        assert!(filter.should_check(root.join("src/parser.c")).unwrap());
    }
}
