//! Executable resolution across the tiered tool roots.
//!
//! A relative tool path is probed against an ordered list of root
//! directories — `Local` (user overrides), `Project` (the target
//! repository), and, only in sub-component mode, `Shared` (the tooling
//! distribution). The first root holding an *executable* file wins, which
//! lets a consuming repository override or supply tools without touching
//! the shared distribution.
//!
//! The roots are materialized once at startup from bootstrap inputs and
//! passed by reference into the chain executor and dispatcher; tests build
//! their own [`ToolRoots`] instead of poking at ambient state.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::types::Tier;

/// The ordered executable-search roots.
///
/// Tiers are held as a uniform candidate list so resolution is a single
/// loop — adding a fourth tier is a constructor change, not new branching.
#[derive(Debug, Clone)]
pub struct ToolRoots {
    tiers: Vec<(Tier, PathBuf)>,
}

/// A successful resolution: the absolute path and the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    pub tier: Tier,
}

impl ToolRoots {
    /// Build the search order `Local` → `Project` → `Shared`.
    ///
    /// `shared` is `None` when the tooling is not embedded as a
    /// sub-component; the tier is then skipped entirely.
    pub fn new(local: PathBuf, project: PathBuf, shared: Option<PathBuf>) -> Self {
        let mut tiers = vec![(Tier::Local, local), (Tier::Project, project)];
        if let Some(shared) = shared {
            tiers.push((Tier::Shared, shared));
        }
        Self { tiers }
    }

    /// Whether the `Shared` tier participates in resolution.
    pub fn is_sub_component(&self) -> bool {
        self.tiers.iter().any(|(t, _)| *t == Tier::Shared)
    }

    /// Resolve `relative` to the first matching executable, in tier order.
    ///
    /// A regular file that exists but is not executable is "found but
    /// unusable": it is skipped with a warning and the search continues in
    /// lower tiers. Pure filesystem probe, no side effects.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> Option<Resolved> {
        let relative = relative.as_ref();
        for (tier, root) in &self.tiers {
            let candidate = root.join(relative);
            if !candidate.is_file() {
                continue;
            }
            if !is_executable(&candidate) {
                warn!(
                    path = %candidate.display(),
                    tier = %tier,
                    "found but not executable, skipping"
                );
                continue;
            }
            return Some(Resolved {
                path: candidate,
                tier: *tier,
            });
        }
        None
    }
}

/// Executability check via the unix permission bits.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
