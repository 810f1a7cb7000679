//! Configuration data structures for hookmux.
//!
//! Two shapes live here: [`HookmuxConfig`], the serde-facing YAML document
//! (`.hookmux.yaml`), and [`ConfigTable`], the typed read-only table the
//! dispatch pipeline actually queries. The document keeps strings so users
//! can write any type/command spelling; building the table normalizes keys
//! to lowercase, which is what makes lookup case-insensitive.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{CommandSet, FileType, OptionsKey, Purpose};

// ---------------------------------------------------------------------------
// YAML document
// ---------------------------------------------------------------------------

/// Root of the `.hookmux.yaml` document.
///
/// ```yaml
/// version: "1.0"
/// commands:
///   pretty:
///     css: "format+trim trim"
/// options:
///   pretty:
///     css:
///       format: "--tab-width 2"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookmuxConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    /// `purpose → file type → space-separated command-set alternatives`.
    #[serde(default)]
    pub commands: HashMap<String, HashMap<String, String>>,

    /// `purpose → file type → command → literal option string`.
    #[serde(default)]
    pub options: HashMap<String, HashMap<String, HashMap<String, String>>>,
}

impl Default for HookmuxConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            commands: HashMap::new(),
            options: HashMap::new(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

impl HookmuxConfig {
    /// Set the command-set list for a (purpose, type) pair.
    pub fn set_commands(&mut self, purpose: Purpose, file_type: FileType, value: &str) {
        self.commands
            .entry(purpose.as_str().to_string())
            .or_default()
            .insert(file_type.as_str().to_string(), value.to_string());
    }

    /// Set the option string for a (purpose, type, command) triple.
    pub fn set_options(
        &mut self,
        purpose: Purpose,
        file_type: FileType,
        command: &str,
        value: &str,
    ) {
        self.options
            .entry(purpose.as_str().to_string())
            .or_default()
            .entry(file_type.as_str().to_string())
            .or_default()
            .insert(command.to_lowercase(), value.to_string());
    }
}

// ---------------------------------------------------------------------------
// ConfigTable
// ---------------------------------------------------------------------------

/// The typed, read-only lookup table built once at startup.
///
/// Keys are composite values rather than assembled strings — the original
/// tooling built variable names like `PRETTY_CSS_FORMAT_OPTIONS` at
/// runtime, which invited typos; a typed key cannot dangle. Never mutated
/// during dispatch.
#[derive(Debug, Clone, Default)]
pub struct ConfigTable {
    commands: HashMap<(Purpose, FileType), Vec<CommandSet>>,
    options: HashMap<OptionsKey, String>,
}

impl ConfigTable {
    /// Build the table from a merged document. Entries whose purpose or
    /// file type doesn't parse are dropped with a warning — they could
    /// never be looked up anyway.
    pub fn build(doc: &HookmuxConfig) -> Self {
        let mut table = Self::default();

        for (purpose_key, per_type) in &doc.commands {
            let Some(purpose) = Purpose::from_str_loose(purpose_key) else {
                tracing::warn!(key = %purpose_key, "unknown purpose in config, ignoring");
                continue;
            };
            for (type_key, value) in per_type {
                let Some(file_type) = FileType::from_str_loose(type_key) else {
                    tracing::warn!(key = %type_key, "unknown file type in config, ignoring");
                    continue;
                };
                let sets = CommandSet::parse_list(value);
                table.commands.insert((purpose, file_type), sets);
            }
        }

        for (purpose_key, per_type) in &doc.options {
            let Some(purpose) = Purpose::from_str_loose(purpose_key) else {
                continue;
            };
            for (type_key, per_command) in per_type {
                let Some(file_type) = FileType::from_str_loose(type_key) else {
                    continue;
                };
                for (command, value) in per_command {
                    table.options.insert(
                        OptionsKey::new(purpose, file_type, command),
                        value.clone(),
                    );
                }
            }
        }

        table
    }

    /// The configured command-set alternatives for a (purpose, type) pair,
    /// in fallback order. Empty when nothing is configured.
    pub fn command_sets(&self, purpose: Purpose, file_type: FileType) -> &[CommandSet] {
        self.commands
            .get(&(purpose, file_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The literal option string for one command within a dispatch, if any.
    pub fn options(&self, purpose: Purpose, file_type: FileType, command: &str) -> Option<&str> {
        self.options
            .get(&OptionsKey::new(purpose, file_type, command))
            .map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
