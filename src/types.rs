//! Core domain types for hookmux.
//!
//! Everything the dispatch pipeline passes between its stages lives here:
//! file-type tags, dispatch purposes, search tiers, parsed command chains,
//! and the typed options key that replaces the original tooling's
//! dynamically-assembled variable names.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FileType
// ---------------------------------------------------------------------------

/// Logical file-type tags the classifier can produce.
///
/// `Unknown` is a first-class member: it means "no configuration applies,
/// skip" rather than "error". The mapping from extensions lives in one
/// canonical place, [`FileType::from_extension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Css,
    Html,
    Js,
    Json,
    Markdown,
    Perl,
    Php,
    Python,
    Ruby,
    Shell,
    Yaml,
    Unknown,
}

impl FileType {
    /// Map a file extension (including the dot) to a file type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".css" | ".scss" | ".less" => Some(Self::Css),
            ".html" | ".htm" | ".xhtml" => Some(Self::Html),
            ".js" | ".mjs" | ".cjs" | ".jsx" => Some(Self::Js),
            ".json" => Some(Self::Json),
            ".md" | ".markdown" => Some(Self::Markdown),
            ".pl" | ".pm" | ".t" => Some(Self::Perl),
            ".php" => Some(Self::Php),
            ".py" => Some(Self::Python),
            ".rb" | ".rake" | ".gemspec" => Some(Self::Ruby),
            ".sh" | ".bash" | ".zsh" => Some(Self::Shell),
            ".yaml" | ".yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Map a shebang interpreter name (basename, `env` already stripped)
    /// to a file type. Used for extensionless scripts.
    pub fn from_interpreter(interp: &str) -> Option<Self> {
        match interp {
            "sh" | "bash" | "zsh" | "dash" | "ksh" => Some(Self::Shell),
            "python" | "python2" | "python3" => Some(Self::Python),
            "ruby" => Some(Self::Ruby),
            "perl" => Some(Self::Perl),
            "php" => Some(Self::Php),
            "node" | "nodejs" => Some(Self::Js),
            _ => None,
        }
    }

    /// Parse from a loose string (case-insensitive). Accepts the canonical
    /// names used in configuration keys.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "css" => Some(Self::Css),
            "html" => Some(Self::Html),
            "js" => Some(Self::Js),
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            "perl" => Some(Self::Perl),
            "php" => Some(Self::Php),
            "python" | "py" => Some(Self::Python),
            "ruby" | "rb" => Some(Self::Ruby),
            "shell" | "sh" => Some(Self::Shell),
            "yaml" | "yml" => Some(Self::Yaml),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Canonical string representation — doubles as the helper subdirectory
    /// name and the type portion of configuration keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Html => "html",
            Self::Js => "js",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Perl => "perl",
            Self::Php => "php",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Shell => "shell",
            Self::Yaml => "yaml",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Purpose
// ---------------------------------------------------------------------------

/// Functional category of a dispatch call — the namespace prefix for
/// configuration lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Lint,
    Pretty,
}

impl Purpose {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lint" => Some(Self::Lint),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lint => "lint",
            Self::Pretty => "pretty",
        }
    }
}

impl std::fmt::Display for Purpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// One of the prioritized executable-search roots.
///
/// Search order is always `Local` → `Project` → `Shared`. `Shared` exists
/// only when the tooling runs in sub-component mode (embedded inside a host
/// repository).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// User overrides, highest priority.
    Local,
    /// The target repository root.
    Project,
    /// The shared tooling distribution.
    Shared,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Project => "project",
            Self::Shared => "shared",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CommandSet
// ---------------------------------------------------------------------------

/// Separator joining sub-commands within one command set (`format+trim`).
pub const CHAIN_SEPARATOR: char = '+';

/// A parsed command set: an ordered, non-empty chain of sub-command names,
/// run in sequence with first-failure abort.
///
/// A configuration value holds several of these, space-separated, as
/// fallback alternatives tried left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    /// Sub-command names in execution order.
    names: Vec<String>,
    /// The raw spelling from configuration, kept for diagnostics.
    raw: String,
}

impl CommandSet {
    /// Parse a spec string like `formatterA+trim`.
    ///
    /// Empty tokens (from `a++b`, leading/trailing separators, or an empty
    /// spec) are rejected — a chain link with no name cannot resolve to
    /// anything.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return None;
        }
        let names: Vec<String> = spec.split(CHAIN_SEPARATOR).map(str::to_string).collect();
        if names.iter().any(|n| n.is_empty()) {
            return None;
        }
        Some(Self {
            names,
            raw: spec.to_string(),
        })
    }

    /// Parse a whitespace-separated list of alternatives. Malformed specs
    /// are dropped (they could never resolve anyway).
    pub fn parse_list(value: &str) -> Vec<Self> {
        value.split_whitespace().filter_map(Self::parse).collect()
    }

    /// Sub-command names in execution order. Never empty.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The first link of the chain — the one probed during the dispatcher's
    /// cheap resolvability check.
    pub fn first(&self) -> &str {
        &self.names[0]
    }

    /// The raw configured spelling.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for CommandSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

// ---------------------------------------------------------------------------
// OptionsKey
// ---------------------------------------------------------------------------

/// Typed key for per-command option lookup.
///
/// The original tooling assembled variable names like
/// `PRETTY_CSS_FORMATTER_OPTIONS` at runtime; a composite key removes the
/// typo/injection hazards of name-based lookup. The command portion is
/// normalized to lowercase so matching stays case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionsKey {
    pub purpose: Purpose,
    pub file_type: FileType,
    pub command: String,
}

impl OptionsKey {
    pub fn new(purpose: Purpose, file_type: FileType, command: &str) -> Self {
        Self {
            purpose,
            file_type,
            command: command.to_lowercase(),
        }
    }
}

// ---------------------------------------------------------------------------
// ExecutionOutcome
// ---------------------------------------------------------------------------

/// Result of executing one chain link (or of a whole dispatch call, for the
/// terminal link): the exit code plus the captured output streams.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// Process exit code. 0 means success. A killed-by-signal child is
    /// reported as 128 + signal by convention.
    pub code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ExecutionOutcome {
    /// The no-op success outcome: nothing ran, nothing to report.
    pub fn success() -> Self {
        Self {
            code: 0,
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
