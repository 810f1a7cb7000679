//! Chained sub-command execution.
//!
//! A command set like `format+trim` runs as an ordered chain: each link is
//! resolved to an executable, run to completion, and the chain aborts at
//! the first nonzero exit. Resolution per link tries the type-specific
//! helper path first, then the shared `_common` implementations:
//!
//! ```text
//! <helperDir>/<fileType>/<name>
//! <helperDir>/_common/<name>
//! ```
//!
//! A link that resolves nowhere aborts the whole chain with
//! [`HookmuxError::UnresolvedCommand`] — a configuration error, reported
//! differently from a tool that ran and failed.
//!
//! Execution is strictly sequential and blocking. Each child gets an
//! environment snapshot taken when the chain starts, so mutations made by
//! the calling process (redefined options and the like) stay visible while
//! nothing a child does can leak back.

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::config::ConfigTable;
use crate::error::{HookmuxError, Result};
use crate::resolve::{Resolved, ToolRoots};
use crate::types::{CommandSet, ExecutionOutcome, FileType, Purpose};

/// Subdirectory holding type-agnostic helper implementations.
pub const COMMON_DIR: &str = "_common";

/// Runs command chains against a fixed set of roots and configuration.
pub struct ChainRunner<'a> {
    roots: &'a ToolRoots,
    config: &'a ConfigTable,
}

impl<'a> ChainRunner<'a> {
    pub fn new(roots: &'a ToolRoots, config: &'a ConfigTable) -> Self {
        Self { roots, config }
    }

    /// Resolve one chain link: `<helper_dir>/<file_type>/<name>`, falling
    /// back to `<helper_dir>/_common/<name>`.
    ///
    /// Also the dispatcher's cheap dry-probe for deciding whether an
    /// alternative is usable at all.
    pub fn resolve_link(
        &self,
        helper_dir: &Path,
        file_type: FileType,
        name: &str,
    ) -> Option<Resolved> {
        self.roots
            .resolve(helper_dir.join(file_type.as_str()).join(name))
            .or_else(|| self.roots.resolve(helper_dir.join(COMMON_DIR).join(name)))
    }

    /// Run every link of `set` in order, stopping at the first failure.
    ///
    /// Each link's argv is the per-command option string (whitespace-split,
    /// as the hook framework has always done) followed by the caller's
    /// args. The first nonzero exit is returned as the terminal outcome and
    /// later links never run; a fully successful chain returns the last
    /// link's outcome (or the no-op success for impossible empty chains).
    pub fn run_chain(
        &self,
        set: &CommandSet,
        purpose: Purpose,
        file_type: FileType,
        helper_dir: &Path,
        args: &[String],
    ) -> Result<ExecutionOutcome> {
        // One snapshot per chain, shared by every link.
        let env: Vec<(OsString, OsString)> = std::env::vars_os().collect();

        let mut outcome = ExecutionOutcome::success();
        for name in set.names() {
            let resolved = self.resolve_link(helper_dir, file_type, name).ok_or_else(|| {
                HookmuxError::UnresolvedCommand {
                    command: name.clone(),
                    chain: set.raw().to_string(),
                    type_dir: helper_dir.join(file_type.as_str()).display().to_string(),
                    common_dir: helper_dir.join(COMMON_DIR).display().to_string(),
                }
            })?;

            debug!(
                command = %name,
                path = %resolved.path.display(),
                tier = %resolved.tier,
                "running chain link"
            );

            let options = self.config.options(purpose, file_type, name);
            outcome = execute_link(&resolved.path, options, args, &env)?;
            replay(&outcome)?;

            if !outcome.is_success() {
                debug!(command = %name, code = outcome.code, "chain aborted");
                return Ok(outcome);
            }
        }

        Ok(outcome)
    }
}

/// Execute one resolved link as an isolated child process.
fn execute_link(
    program: &Path,
    options: Option<&str>,
    args: &[String],
    env: &[(OsString, OsString)],
) -> Result<ExecutionOutcome> {
    let mut cmd = Command::new(program);
    if let Some(options) = options {
        cmd.args(options.split_whitespace());
    }
    cmd.args(args);
    cmd.env_clear();
    cmd.envs(env.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str())));

    let output = cmd.output()?;

    Ok(ExecutionOutcome {
        code: exit_code(&output.status),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Map an `ExitStatus` to a plain code. A signal-killed child reports
/// 128 + signal, matching shell convention.
pub(crate) fn exit_code(status: &std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    1
}

/// Replay a link's captured streams onto the parent's, so interactive lint
/// output stays visible even though the outcome carries the bytes.
fn replay(outcome: &ExecutionOutcome) -> Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(&outcome.stdout)?;
    stdout.flush()?;
    let mut stderr = std::io::stderr();
    stderr.write_all(&outcome.stderr)?;
    stderr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
