//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(
        mut self,
        suggestions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Input file does not exist
    pub fn file_not_found(path: &Path) -> Self {
        Self::new(format!("File not found: {}", path.display()))
            .with_context("The specified metadata file does not exist")
            .with_suggestions([
                format!("TRY: Check if the file exists: ls -la {}", path.display()),
                "TRY: Pass the _grist_Tables data with --tables and _grist_Tables_column with --columns"
                    .to_string(),
            ])
    }

    /// File cannot be read
    pub fn cannot_read_file(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot read file: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestion(format!("TRY: Check file permissions: ls -la {}", path.display()))
    }

    /// Input is not valid table data JSON
    pub fn json_parse_error(path: &Path, details: &str) -> Self {
        Self::new(format!("JSON parse error: {}", details))
            .with_context(format!("Failed to parse table data: {}", path.display()))
            .with_suggestions([
                "TRY: Expected an object with \"tableId\", \"rowIds\" and \"columns\"".to_string(),
                "TRY: \"columns\" maps each column id to one value per row id".to_string(),
            ])
    }

    /// Config file is not valid TOML
    pub fn config_parse_error(path: &Path, details: &str) -> Self {
        Self::new(format!("Invalid config file: {}", path.display()))
            .with_context(details.to_string())
            .with_suggestions([
                "TRY: Supported keys: include_builtin (bool), log_filter (string)".to_string(),
                format!("TRY: Move the file aside to use defaults: mv {0} {0}.bak", path.display()),
            ])
    }

    /// No built-in table with this id
    pub fn unknown_builtin_table(table_id: &str) -> Self {
        Self::new(format!("Unknown built-in table: '{}'", table_id))
            .with_context("Built-in table ids start with _grist_ and are case sensitive")
            .with_suggestion("TRY: List all built-in tables: docmeta builtins")
    }

    /// The builder rejected the metadata
    pub fn schema_build_failed(details: &str) -> Self {
        Self::new(format!("Failed to build schema: {}", details))
            .with_context("The metadata tables are inconsistent or malformed")
            .with_suggestions([
                "TRY: Check that --tables holds _grist_Tables and --columns holds _grist_Tables_column"
                    .to_string(),
                "TRY: Every column row needs parentId, parentPos, colId, type, isFormula and formula"
                    .to_string(),
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}
