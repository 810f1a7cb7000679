//! Helper dispatch — the orchestration layer.
//!
//! `dispatch` ties the pipeline together: classify the file, look up the
//! configured command-set alternatives for (purpose, file type), pick the
//! first alternative whose chain can actually start, and run it.
//!
//! The fallback policy is deliberately asymmetric and must stay that way:
//! *failure to find a tool is not an error; failure of a found tool is.*
//! An uninstalled optional formatter never blocks a commit, so a missing
//! configuration entry, an unknown file type, and a list with no resolvable
//! alternative all dispatch as success with zero executions. Once an
//! alternative is committed to, its outcome — success or failure — is
//! final; there is no retry against later alternatives.
//!
//! Committing is decided by a cheap dry probe of only the *first* chain
//! link. A chain whose later links are missing still gets committed to and
//! then fails with a configuration error, which is the correct signal: the
//! installation is half-broken, not absent.

use std::path::Path;

use tracing::{debug, info};

use crate::chain::ChainRunner;
use crate::classify::classify;
use crate::config::ConfigTable;
use crate::error::Result;
use crate::resolve::ToolRoots;
use crate::types::{ExecutionOutcome, FileType, Purpose};

/// Orchestrates classify → lookup → probe → chain execution.
pub struct Dispatcher<'a> {
    roots: &'a ToolRoots,
    config: &'a ConfigTable,
}

impl<'a> Dispatcher<'a> {
    pub fn new(roots: &'a ToolRoots, config: &'a ConfigTable) -> Self {
        Self { roots, config }
    }

    /// Dispatch `purpose` against `file_path`.
    ///
    /// The helper executable receives the target file path as its first
    /// argument, followed by `extra_args`.
    pub fn dispatch(
        &self,
        purpose: Purpose,
        helper_dir: &Path,
        file_path: &Path,
        extra_args: &[String],
    ) -> Result<ExecutionOutcome> {
        let file_type = classify(file_path);
        if file_type == FileType::Unknown {
            debug!(file = %file_path.display(), "unrecognised file type, nothing to do");
            return Ok(ExecutionOutcome::success());
        }

        let sets = self.config.command_sets(purpose, file_type);
        if sets.is_empty() {
            debug!(
                purpose = %purpose,
                file_type = %file_type,
                "no command sets configured, nothing to enforce"
            );
            return Ok(ExecutionOutcome::success());
        }

        let runner = ChainRunner::new(self.roots, self.config);

        let mut args = vec![file_path.display().to_string()];
        args.extend_from_slice(extra_args);

        for set in sets {
            // Dry probe: is the first link resolvable at all? Cheap, no
            // execution, decides commitment.
            if runner
                .resolve_link(helper_dir, file_type, set.first())
                .is_none()
            {
                debug!(set = %set, "alternative not resolvable, trying next");
                continue;
            }

            info!(
                purpose = %purpose,
                file_type = %file_type,
                set = %set,
                "committing to command set"
            );
            return runner.run_chain(set, purpose, file_type, helper_dir, &args);
        }

        info!(
            purpose = %purpose,
            file_type = %file_type,
            "no resolvable command set, skipping"
        );
        Ok(ExecutionOutcome::success())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
