//! Output capture with commit-on-success semantics.
//!
//! Pretty-printing helpers are ordinary filters: they read a file and print
//! the reformatted result on stdout. [`capture_and_commit`] adapts that
//! into an in-place rewrite with transactional behavior:
//!
//! - exit 0 — the captured stdout replaces the target's contents, byte for
//!   byte, through the existing inode (never a rename, so the target keeps
//!   its permission bits and ownership);
//! - nonzero — the target is left untouched and the captured stderr, then
//!   stdout, are replayed to the parent's streams so the failure context is
//!   visible.
//!
//! Either way exactly one thing happens to the filesystem: one mutated file
//! on success, zero on failure.
//!
//! The capture buffers are unlinked temp files (0600) from `tempfile`, so
//! the OS reclaims them on every exit path, including abnormal termination.

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::Result;

/// Run `command` with its streams spooled, committing stdout over `target`
/// on success. Returns the command's exit code.
pub fn capture_and_commit(target: &Path, command: &mut Command) -> Result<i32> {
    let mut stdout_spool = tempfile::tempfile()?;
    let mut stderr_spool = tempfile::tempfile()?;

    let status = command
        .stdout(Stdio::from(stdout_spool.try_clone()?))
        .stderr(Stdio::from(stderr_spool.try_clone()?))
        .status()?;
    let code = crate::chain::exit_code(&status);

    stdout_spool.seek(SeekFrom::Start(0))?;
    stderr_spool.seek(SeekFrom::Start(0))?;

    if code == 0 {
        let mut formatted = Vec::new();
        stdout_spool.read_to_end(&mut formatted)?;

        // Truncate-and-write through the existing inode: the target keeps
        // its permission bits and ownership, which a rename from a temp
        // file would clobber.
        let mut out = OpenOptions::new().write(true).truncate(true).open(target)?;
        out.write_all(&formatted)?;
        out.flush()?;

        debug!(
            target = %target.display(),
            bytes = formatted.len(),
            "committed captured output"
        );
    } else {
        // Failure context first, then whatever the tool managed to print.
        let mut stderr = std::io::stderr();
        std::io::copy(&mut stderr_spool, &mut stderr)?;
        stderr.flush()?;
        let mut stdout = std::io::stdout();
        std::io::copy(&mut stdout_spool, &mut stdout)?;
        stdout.flush()?;

        debug!(
            target = %target.display(),
            code,
            "capture failed, target untouched"
        );
    }

    Ok(code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn success_replaces_target_with_stdout() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("site.css");
        fs::write(&target, "body{color:red}").unwrap();

        let code = capture_and_commit(&target, &mut sh("printf 'body {\\n  color: red;\\n}\\n'"))
            .unwrap();

        assert_eq!(code, 0);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "body {\n  color: red;\n}\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn success_preserves_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("script.sh");
        fs::write(&target, "echo old").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o754)).unwrap();

        capture_and_commit(&target, &mut sh("printf 'echo new\\n'")).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode, 0o754);
        assert_eq!(fs::read_to_string(&target).unwrap(), "echo new\n");
    }

    #[test]
    fn failure_leaves_target_byte_identical() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("site.css");
        fs::write(&target, "original content").unwrap();

        let code = capture_and_commit(
            &target,
            &mut sh("echo partial; echo broken >&2; exit 5"),
        )
        .unwrap();

        assert_eq!(code, 5);
        assert_eq!(fs::read_to_string(&target).unwrap(), "original content");
    }

    #[test]
    fn empty_stdout_on_success_empties_the_target() {
        // Content equals the command's stdout, even when that is nothing.
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("file.txt");
        fs::write(&target, "something").unwrap();

        let code = capture_and_commit(&target, &mut sh("true")).unwrap();

        assert_eq!(code, 0);
        assert_eq!(fs::read_to_string(&target).unwrap(), "");
    }

    #[test]
    fn missing_target_on_success_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("never-created.txt");

        let result = capture_and_commit(&target, &mut sh("echo out"));
        assert!(result.is_err());
    }

    #[test]
    fn command_reads_the_target_it_will_replace() {
        // The classic filter shape: tool reads the file named by its
        // argument, prints the transformed version.
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("doc.md");
        fs::write(&target, "hello\n").unwrap();

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg("tr 'a-z' 'A-Z' < \"$1\"")
            .arg("capture")
            .arg(&target);

        let code = capture_and_commit(&target, &mut cmd).unwrap();
        assert_eq!(code, 0);
        assert_eq!(fs::read_to_string(&target).unwrap(), "HELLO\n");
    }
}
