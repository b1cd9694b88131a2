//! Configuration loading and management
//!
//! Raw YAML structures are converted into clean domain objects; default
//! configuration is embedded here rather than shipped as a data file. The
//! checks themselves are built in, so configuration only controls which
//! categories and codes run and at what severity.

use crate::domain::violations::{Severity, StyleError, StyleResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Violation codes the built-in checks can produce
pub const KNOWN_CODES: &[&str] = &[
    "E601", "E602", "E701", "E702", "E703", "E704", "E711",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Configuration format version
    pub version: String,
    /// Path filtering configuration
    pub paths: PathConfig,
    /// Check categories keyed by name
    pub checks: HashMap<String, CheckCategory>,
}

/// Path filtering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Include/exclude patterns (gitignore-style)
    pub patterns: Vec<String>,
    /// Optional per-directory ignore file name
    pub ignore_file: Option<String>,
}

/// A category of checks (e.g. "comments", "function_braces")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckCategory {
    /// Default severity for codes in this category
    pub severity: Severity,
    /// Whether this category is enabled
    pub enabled: bool,
    /// Per-code configuration
    pub rules: Vec<CheckRule>,
}

/// Configuration for a single violation code
#[derive(Debug, Clone, Serialize, Deserialize, Hash)]
pub struct CheckRule {
    /// Violation code (e.g. "E701")
    pub code: String,
    /// Whether this code is reported
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Severity override (uses category default if not specified)
    pub severity: Option<Severity>,
}

impl CheckConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> StyleResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            StyleError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            StyleError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> StyleResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| StyleError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Get default configuration with all built-in checks enabled
    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            paths: PathConfig {
                patterns: vec![
                    "**/build/**".to_string(),
                    "**/.git/**".to_string(),
                    "**/*.generated.*".to_string(),
                ],
                ignore_file: Some(".cguardianignore".to_string()),
            },
            checks: Self::default_checks(),
        }
    }

    fn default_checks() -> HashMap<String, CheckCategory> {
        let mut checks = HashMap::new();

        checks.insert(
            "comments".to_string(),
            CheckCategory {
                severity: Severity::Error,
                enabled: true,
                rules: vec![CheckRule {
                    code: "E601".to_string(),
                    enabled: true,
                    severity: None,
                }],
            },
        );

        checks.insert(
            "returns".to_string(),
            CheckCategory {
                severity: Severity::Warning,
                enabled: true,
                rules: vec![CheckRule {
                    code: "E602".to_string(),
                    enabled: true,
                    severity: None,
                }],
            },
        );

        checks.insert(
            "function_braces".to_string(),
            CheckCategory {
                severity: Severity::Error,
                enabled: true,
                rules: ["E701", "E702", "E703", "E704"]
                    .iter()
                    .map(|code| CheckRule {
                        code: code.to_string(),
                        enabled: true,
                        severity: None,
                    })
                    .collect(),
            },
        );

        checks.insert(
            "declarations".to_string(),
            CheckCategory {
                severity: Severity::Warning,
                enabled: true,
                rules: vec![CheckRule {
                    code: "E711".to_string(),
                    enabled: true,
                    severity: None,
                }],
            },
        );

        checks
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> StyleResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(StyleError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        for (category_name, category) in &self.checks {
            for rule in &category.rules {
                if !KNOWN_CODES.contains(&rule.code.as_str()) {
                    return Err(StyleError::config(format!(
                        "Unknown violation code '{}' in category '{}'",
                        rule.code, category_name
                    )));
                }

                let duplicate_count =
                    category.rules.iter().filter(|r| r.code == rule.code).count();
                if duplicate_count > 1 {
                    return Err(StyleError::config(format!(
                        "Duplicate violation code '{}' in category '{}'",
                        rule.code, category_name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Whether a category exists and is enabled
    pub fn category_enabled(&self, name: &str) -> bool {
        self.checks.get(name).map(|c| c.enabled).unwrap_or(false)
    }

    /// Whether a specific code is reported
    ///
    /// A code absent from the configuration entirely is considered enabled;
    /// disabling requires naming it.
    pub fn is_code_enabled(&self, code: &str) -> bool {
        for category in self.checks.values() {
            for rule in &category.rules {
                if rule.code == code {
                    return category.enabled && rule.enabled;
                }
            }
        }
        true
    }

    /// Effective severity for a code (rule override or category default)
    pub fn severity_for(&self, code: &str) -> Severity {
        for category in self.checks.values() {
            for rule in &category.rules {
                if rule.code == code {
                    return rule.severity.unwrap_or(category.severity);
                }
            }
        }
        Severity::Error
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> StyleResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StyleError::config(format!("Failed to serialize config: {e}")))
    }

    /// Create a fingerprint of the configuration for cache validation
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.version.hash(&mut hasher);
        self.paths.patterns.len().hash(&mut hasher);
        for pattern in &self.paths.patterns {
            pattern.hash(&mut hasher);
        }
        self.paths.ignore_file.hash(&mut hasher);

        // Sort categories for a stable hash regardless of map order.
        let mut sorted: Vec<_> = self.checks.iter().collect();
        sorted.sort_by_key(|(name, _)| name.as_str());

        for (category_name, category) in sorted {
            category_name.hash(&mut hasher);
            category.severity.hash(&mut hasher);
            category.enabled.hash(&mut hasher);

            let mut sorted_rules = category.rules.clone();
            sorted_rules.sort_by_key(|rule| rule.code.clone());
            for rule in sorted_rules {
                rule.hash(&mut hasher);
            }
        }

        format!("{:x}", hasher.finish())
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_true() -> bool {
    true
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: CheckConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CheckConfig::default(),
        }
    }

    /// Add a path pattern
    pub fn add_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.paths.patterns.push(pattern.into());
        self
    }

    /// Set the ignore file name
    pub fn ignore_file(mut self, filename: impl Into<String>) -> Self {
        self.config.paths.ignore_file = Some(filename.into());
        self
    }

    /// Replace a check category
    pub fn add_category(mut self, name: impl Into<String>, category: CheckCategory) -> Self {
        self.config.checks.insert(name.into(), category);
        self
    }

    /// Disable a category by name
    pub fn disable_category(mut self, name: &str) -> Self {
        if let Some(category) = self.config.checks.get_mut(name) {
            category.enabled = false;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> StyleResult<CheckConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
