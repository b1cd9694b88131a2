//! C Guardian CLI
//!
//! Translates user commands into library operations and handles the
//! external concerns: configuration discovery, terminal output, and
//! process exit codes.

use c_guardian::{
    CheckConfig, OutputFormat, ReportFormatter, ReportOptions, ScanOptions, Severity, StyleChecker,
    StyleResult,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;

/// C Guardian - PEP 7 style checking for C source
#[derive(Parser)]
#[command(name = "c-guardian")]
#[command(version)]
#[command(about = "Style checker for C source in the PEP 7 tradition")]
#[command(
    long_about = "C Guardian checks C source for style violations: C++ comments, \
redundant return parentheses, function brace placement, and missing blank lines \
after declarations. Designed for editor integration and CI pipelines."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check files or directories for style violations
    Check {
        /// Paths to check (files or directories)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormatArg,

        /// Minimum severity level to report
        #[arg(short, long, value_enum)]
        severity: Option<SeverityArg>,

        /// Maximum number of violations to report
        #[arg(long)]
        max_violations: Option<usize>,

        /// Additional exclude patterns
        #[arg(long, action = clap::ArgAction::Append)]
        exclude: Vec<String>,

        /// Disable parallel processing
        #[arg(long)]
        no_parallel: bool,

        /// Stop at the first file that fails to scan
        #[arg(long)]
        fail_fast: bool,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },

    /// Explain what a specific violation code means
    Explain {
        /// Violation code to explain (e.g. E701)
        code: String,
    },

    /// List available checks and their codes
    Rules {
        /// Show only enabled checks
        #[arg(long)]
        enabled_only: bool,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Text,
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SeverityArg {
    Info,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

/// Description of each built-in violation code for `explain` and `rules`
const CODE_DESCRIPTIONS: &[(&str, &str, &str)] = &[
    (
        "E601",
        "comments",
        "Never use C++ style // comments; C code uses /* ... */.",
    ),
    (
        "E602",
        "returns",
        "return is a statement, not a function: write `return x;`, not `return (x);`.",
    ),
    (
        "E701",
        "function_braces",
        "The opening brace of a function body goes on its own line, not on the declaration line.",
    ),
    (
        "E702",
        "function_braces",
        "The opening brace of a function body belongs in column 1.",
    ),
    (
        "E703",
        "function_braces",
        "No blank lines between a function declaration and its opening brace.",
    ),
    (
        "E704",
        "function_braces",
        "The closing brace of a function body belongs in column 1.",
    ),
    (
        "E711",
        "declarations",
        "Put one blank line between local variable declarations and the first statement.",
    ),
];

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    }
}

fn run_command(cli: Cli) -> StyleResult<i32> {
    match cli.command {
        Commands::Check {
            paths,
            format,
            severity,
            max_violations,
            exclude,
            no_parallel,
            fail_fast,
        } => run_check(
            cli.config,
            paths,
            format,
            severity,
            max_violations,
            exclude,
            no_parallel,
            fail_fast,
            !cli.no_color,
        ),
        Commands::ValidateConfig { config_file } => {
            run_validate_config(config_file.or(cli.config))
        }
        Commands::Explain { code } => run_explain(&code),
        Commands::Rules {
            enabled_only,
            category,
        } => run_list_rules(cli.config, enabled_only, category),
    }
}

/// Load the configuration from an explicit path or well-known file names
fn load_config(config_path: Option<PathBuf>) -> StyleResult<CheckConfig> {
    if let Some(config_path) = config_path {
        return CheckConfig::load_from_file(config_path);
    }

    let default_configs = ["c_guardian.yaml", "c_guardian.yml", ".c_guardian.yaml"];
    for config_name in &default_configs {
        if Path::new(config_name).exists() {
            return CheckConfig::load_from_file(config_name);
        }
    }

    Ok(CheckConfig::default())
}

#[allow(clippy::too_many_arguments)]
fn run_check(
    config_path: Option<PathBuf>,
    paths: Vec<PathBuf>,
    format: OutputFormatArg,
    severity: Option<SeverityArg>,
    max_violations: Option<usize>,
    exclude_patterns: Vec<String>,
    no_parallel: bool,
    fail_fast: bool,
    use_colors: bool,
) -> StyleResult<i32> {
    let config = load_config(config_path)?;

    let formatter = ReportFormatter::new(ReportOptions {
        use_colors,
        max_violations,
        min_severity: severity.map(|s| s.into()),
        ..Default::default()
    });
    let checker = StyleChecker::new_with_config(config)?.with_report_formatter(formatter);

    let paths = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };

    let options = ScanOptions {
        parallel: !no_parallel,
        fail_fast,
        exclude_patterns,
        ..Default::default()
    };

    let report = checker.check_paths(&paths, &options)?;
    let formatted = checker.format_report(&report, format.into())?;
    print!("{formatted}");

    Ok(if report.has_errors() { 1 } else { 0 })
}

fn run_validate_config(config_path: Option<PathBuf>) -> StyleResult<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("c_guardian.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match CheckConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("Configuration is valid");

            let total_categories = config.checks.len();
            let enabled_categories = config.checks.values().filter(|c| c.enabled).count();
            let total_codes: usize = config.checks.values().map(|c| c.rules.len()).sum();
            let enabled_codes: usize = config
                .checks
                .values()
                .filter(|c| c.enabled)
                .map(|c| c.rules.iter().filter(|r| r.enabled).count())
                .sum();

            println!("Configuration summary:");
            println!(
                "  Categories: {total_categories} total, {enabled_categories} enabled"
            );
            println!("  Codes: {total_codes} total, {enabled_codes} enabled");
            println!("  Path patterns: {}", config.paths.patterns.len());

            Ok(0)
        }
        Err(e) => {
            eprintln!("Configuration validation failed: {e}");
            Ok(1)
        }
    }
}

fn run_explain(code: &str) -> StyleResult<i32> {
    let config = CheckConfig::default();
    let code = code.to_uppercase();

    for (known_code, category, description) in CODE_DESCRIPTIONS {
        if *known_code == code {
            println!("Code: {known_code}");
            println!("Category: {category}");
            println!("Severity: {}", config.severity_for(known_code).as_str());
            println!("Enabled: {}", config.is_code_enabled(known_code));
            println!();
            println!("{description}");
            return Ok(0);
        }
    }

    eprintln!("Unknown violation code '{code}'");
    println!();
    println!("Available codes:");
    for (known_code, category, _) in CODE_DESCRIPTIONS {
        println!("  {known_code} ({category})");
    }

    Ok(1)
}

fn run_list_rules(
    config_path: Option<PathBuf>,
    enabled_only: bool,
    category_filter: Option<String>,
) -> StyleResult<i32> {
    let config = load_config(config_path)?;

    println!("Available checks\n");

    let mut categories: Vec<_> = config.checks.iter().collect();
    categories.sort_by_key(|(name, _)| name.as_str());

    for (category_name, category) in categories {
        if let Some(ref filter) = category_filter {
            if category_name != filter {
                continue;
            }
        }
        if enabled_only && !category.enabled {
            continue;
        }

        let status = if category.enabled { "enabled" } else { "disabled" };
        println!(
            "{} ({}, {})",
            category_name,
            category.severity.as_str(),
            status
        );

        for rule in &category.rules {
            if enabled_only && !rule.enabled {
                continue;
            }

            let severity = rule.severity.unwrap_or(category.severity);
            let description = CODE_DESCRIPTIONS
                .iter()
                .find(|(code, _, _)| *code == rule.code)
                .map(|(_, _, d)| *d)
                .unwrap_or("");

            println!("  {} [{}] {}", rule.code, severity.as_str(), description);
        }
        println!();
    }

    Ok(0)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}
