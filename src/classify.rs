//! File-type classification.
//!
//! Runs a fixed sequence of detector probes against a path and returns the
//! first match. The probe order is part of the contract: extension first
//! (cheap, no I/O), then shebang sniffing for extensionless scripts. A file
//! no probe recognises classifies as [`FileType::Unknown`] — a soft result,
//! not an error; callers treat it as "no configuration applies, skip".
//!
//! Classification is a pure function of the path and (for the shebang probe)
//! the file's first line, so repeated calls on the same file agree.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::types::FileType;

/// Classify `path` into a [`FileType`] tag.
pub fn classify(path: &Path) -> FileType {
    probe_extension(path)
        .or_else(|| probe_shebang(path))
        .unwrap_or(FileType::Unknown)
}

/// Probe 1: file extension, via the canonical mapping in
/// [`FileType::from_extension`].
fn probe_extension(path: &Path) -> Option<FileType> {
    let ext = path.extension()?.to_str()?;
    FileType::from_extension(&format!(".{}", ext.to_lowercase()))
}

/// Probe 2: shebang line. Only consulted for files without a recognised
/// extension. Reads at most the first line; any I/O failure means "no
/// match" rather than an error.
fn probe_shebang(path: &Path) -> Option<FileType> {
    let file = File::open(path).ok()?;
    let mut first_line = String::new();
    BufReader::new(file).read_line(&mut first_line).ok()?;

    let rest = first_line.strip_prefix("#!")?;
    let mut words = rest.split_whitespace();
    let interpreter = words.next()?;

    // `#!/usr/bin/env python3` names the real interpreter second.
    let name = match basename(interpreter) {
        "env" => words.next()?,
        other => other,
    };

    FileType::from_interpreter(basename(name))
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;
    use test_case::test_case;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test_case("site.css", FileType::Css)]
    #[test_case("app.js", FileType::Js)]
    #[test_case("notes.md", FileType::Markdown)]
    #[test_case("conf.yml", FileType::Yaml)]
    #[test_case("script.SH", FileType::Shell; "uppercase extension")]
    fn classify_by_extension(name: &str, expected: FileType) {
        // Extension probe needs no file on disk.
        assert_eq!(classify(Path::new(name)), expected);
    }

    #[test]
    fn classify_unrecognised_extension_is_unknown() {
        assert_eq!(classify(Path::new("data.xyz")), FileType::Unknown);
    }

    #[test]
    fn classify_is_deterministic() {
        let p = Path::new("style.css");
        assert_eq!(classify(p), classify(p));
    }

    #[test]
    fn classify_extensionless_script_by_shebang() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "deploy", "#!/bin/bash\necho hi\n");
        assert_eq!(classify(&path), FileType::Shell);
    }

    #[test]
    fn classify_env_shebang_names_interpreter_second() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "tool", "#!/usr/bin/env python3\nprint()\n");
        assert_eq!(classify(&path), FileType::Python);
    }

    #[test]
    fn classify_extension_wins_over_shebang() {
        // A .rb file with a python shebang is still ruby: the extension
        // probe runs first.
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "odd.rb", "#!/usr/bin/env python\n");
        assert_eq!(classify(&path), FileType::Ruby);
    }

    #[test]
    fn classify_missing_file_without_extension_is_unknown() {
        assert_eq!(classify(Path::new("/no/such/file")), FileType::Unknown);
    }

    #[test]
    fn classify_file_without_shebang_is_unknown() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "README", "plain text\n");
        assert_eq!(classify(&path), FileType::Unknown);
    }
}
