//! Multi-source config loading with priority merging.
//!
//! Priority order (highest wins):
//!   Environment vars > Project config file > Built-in defaults
//!
//! The environment layer keeps the key grammar the hook framework has
//! always used: `PRETTY_CSS="format+trim trim"` configures command sets,
//! `PRETTY_CSS_FORMAT_OPTIONS="--tab-width 2"` configures per-command
//! options. Matching is case-insensitive on the type and command portions.

use std::path::Path;

use crate::types::{FileType, Purpose};

use super::schema::{ConfigTable, HookmuxConfig};

/// Project config file name, looked up in the target repository root.
pub const CONFIG_FILE: &str = ".hookmux.yaml";

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from all sources and build the dispatch table.
///
/// Sources (low → high priority):
///   1. Built-in defaults
///   2. Project config (`.hookmux.yaml` in `project_dir`)
///   3. Environment variables
pub fn load(project_dir: &Path) -> ConfigTable {
    load_with_vars(project_dir, std::env::vars())
}

/// Same as [`load`], but with the environment supplied explicitly.
///
/// Tests pass a synthetic variable list here instead of mutating process
/// state; this is also the invalidation hook — build a fresh table to pick
/// up changed inputs, there is no ambient cache.
pub fn load_with_vars(
    project_dir: &Path,
    vars: impl IntoIterator<Item = (String, String)>,
) -> ConfigTable {
    let mut doc = defaults();

    if let Some(file) = load_config_file(&project_dir.join(CONFIG_FILE)) {
        doc = merge(doc, file);
    }

    apply_env_overrides(&mut doc, vars);

    ConfigTable::build(&doc)
}

/// Built-in defaults: every known type gets a `check` lint helper and a
/// `format+trim trim` pretty chain. Installations without those helpers on
/// disk lose nothing — an unresolvable set dispatches as a no-op.
pub fn defaults() -> HookmuxConfig {
    let mut doc = HookmuxConfig::default();

    for file_type in [
        FileType::Css,
        FileType::Html,
        FileType::Js,
        FileType::Json,
        FileType::Markdown,
        FileType::Perl,
        FileType::Php,
        FileType::Python,
        FileType::Ruby,
        FileType::Shell,
        FileType::Yaml,
    ] {
        doc.set_commands(Purpose::Lint, file_type, "check");
        doc.set_commands(Purpose::Pretty, file_type, "format+trim trim");
    }

    doc
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Try to load and parse a YAML config file. Returns `None` when the file
/// is absent; a present-but-unparseable file is also `None`, with a warning,
/// so a broken override never disables the hook framework outright.
fn load_config_file(path: &Path) -> Option<HookmuxConfig> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_yaml::from_str(&contents) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unparseable config file, ignoring");
            None
        }
    }
}

/// Merge two documents: `overlay` entries win per (purpose, type) for
/// commands and per (purpose, type, command) for options.
fn merge(mut base: HookmuxConfig, overlay: HookmuxConfig) -> HookmuxConfig {
    if overlay.version != "1.0" {
        base.version = overlay.version;
    }

    for (purpose, per_type) in overlay.commands {
        let slot = base.commands.entry(normalize(&purpose)).or_default();
        for (file_type, value) in per_type {
            slot.insert(normalize(&file_type), value);
        }
    }

    for (purpose, per_type) in overlay.options {
        let p_slot = base.options.entry(normalize(&purpose)).or_default();
        for (file_type, per_command) in per_type {
            let t_slot = p_slot.entry(normalize(&file_type)).or_default();
            for (command, value) in per_command {
                t_slot.insert(normalize(&command), value);
            }
        }
    }

    base
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Apply environment overrides in place.
///
/// Two key shapes are recognised, matched case-insensitively:
///   - `<PURPOSE>_<TYPE>` — replaces the command-set list
///   - `<PURPOSE>_<TYPE>_<COMMAND>_OPTIONS` — sets one option string;
///     the command portion may itself contain underscores
fn apply_env_overrides(
    doc: &mut HookmuxConfig,
    vars: impl IntoIterator<Item = (String, String)>,
) {
    for (key, value) in vars {
        let lower = key.to_lowercase();
        let parts: Vec<&str> = lower.split('_').collect();
        if parts.len() < 2 {
            continue;
        }

        let Some(purpose) = Purpose::from_str_loose(parts[0]) else {
            continue;
        };
        let Some(file_type) = FileType::from_str_loose(parts[1]) else {
            continue;
        };

        if parts.len() == 2 {
            doc.set_commands(purpose, file_type, &value);
        } else if parts.len() >= 4 && parts[parts.len() - 1] == "options" {
            let command = parts[2..parts.len() - 1].join("_");
            doc.set_options(purpose, file_type, &command, &value);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
