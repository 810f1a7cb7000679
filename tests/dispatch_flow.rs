//! End-to-end tests for the dispatch pipeline.
//!
//! Each test builds a throwaway installation — tiered root directories
//! holding small shell-script helpers — then drives the public library API
//! the way the hook entry points do and asserts on exit codes and
//! filesystem side effects.

#![cfg(unix)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use hookmux::capture::capture_and_commit;
use hookmux::config::{load_with_vars, ConfigTable};
use hookmux::dispatch::Dispatcher;
use hookmux::resolve::ToolRoots;
use hookmux::types::Purpose;

const HELPERS: &str = "helpers";

/// A throwaway three-tier installation.
struct Install {
    local: TempDir,
    project: TempDir,
    shared: TempDir,
}

impl Install {
    fn new() -> Self {
        Self {
            local: TempDir::new().unwrap(),
            project: TempDir::new().unwrap(),
            shared: TempDir::new().unwrap(),
        }
    }

    /// Roots without the shared tier (standalone mode).
    fn roots(&self) -> ToolRoots {
        ToolRoots::new(self.local.path().into(), self.project.path().into(), None)
    }

    /// Roots with the shared tier (sub-component mode).
    fn roots_with_shared(&self) -> ToolRoots {
        ToolRoots::new(
            self.local.path().into(),
            self.project.path().into(),
            Some(self.shared.path().into()),
        )
    }

    /// Config from defaults + synthetic env vars; no config file on disk.
    fn config(&self, env: &[(&str, &str)]) -> ConfigTable {
        let vars: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_with_vars(self.project.path(), vars)
    }

    fn script(&self, root: &TempDir, relative: &str, body: &str) {
        write_script(root.path(), relative, body);
    }

    fn target(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.project.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn marker(&self, name: &str) -> PathBuf {
        self.project.path().join(name)
    }
}

fn write_script(root: &Path, relative: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

// ---------------------------------------------------------------------------
// Fallback across alternatives
// ---------------------------------------------------------------------------

#[test]
fn pretty_css_falls_back_to_trim_and_strips_whitespace() {
    // PRETTY_CSS="formatterA+trim trim": formatterA is nowhere on disk,
    // trim exists — dispatch must run trim alone and return 0.
    let install = Install::new();
    install.script(
        &install.project,
        "helpers/_common/trim",
        "sed 's/[[:space:]]*$//' \"$1\" > \"$1.tmp\" && mv \"$1.tmp\" \"$1\"",
    );

    let roots = install.roots();
    let config = install.config(&[("PRETTY_CSS", "formatterA+trim trim")]);
    let dispatcher = Dispatcher::new(&roots, &config);

    let css = install.target("site.css", "body {\n  margin: 0;   \n}\t\n");
    let outcome = dispatcher
        .dispatch(Purpose::Pretty, Path::new(HELPERS), &css, &[])
        .unwrap();

    assert_eq!(outcome.code, 0);
    assert_eq!(
        fs::read_to_string(&css).unwrap(),
        "body {\n  margin: 0;\n}\n"
    );
}

#[test]
fn lint_js_commits_to_first_resolvable_and_its_failure_is_final() {
    // LINT_JS="toolX toolY", both resolvable, toolX exits 1: dispatch
    // returns 1 and toolY never runs.
    let install = Install::new();
    let y_marker = install.marker("toolY-ran");
    install.script(&install.project, "helpers/js/toolX", "exit 1");
    install.script(
        &install.project,
        "helpers/js/toolY",
        &format!("touch {}", y_marker.display()),
    );

    let roots = install.roots();
    let config = install.config(&[("LINT_JS", "toolX toolY")]);
    let dispatcher = Dispatcher::new(&roots, &config);

    let js = install.target("app.js", "var x = 1\n");
    let outcome = dispatcher
        .dispatch(Purpose::Lint, Path::new(HELPERS), &js, &[])
        .unwrap();

    assert_eq!(outcome.code, 1);
    assert!(!y_marker.exists(), "toolY must not run once toolX committed");
}

#[test]
fn chain_aborts_before_second_link_on_failure() {
    let install = Install::new();
    let b_marker = install.marker("b-ran");
    install.script(&install.project, "helpers/css/a", "exit 7");
    install.script(
        &install.project,
        "helpers/css/b",
        &format!("touch {}", b_marker.display()),
    );

    let roots = install.roots();
    let config = install.config(&[("PRETTY_CSS", "a+b")]);
    let dispatcher = Dispatcher::new(&roots, &config);

    let css = install.target("site.css", "");
    let outcome = dispatcher
        .dispatch(Purpose::Pretty, Path::new(HELPERS), &css, &[])
        .unwrap();

    assert_eq!(outcome.code, 7);
    assert!(!b_marker.exists());
}

// ---------------------------------------------------------------------------
// Tier preference at dispatch level
// ---------------------------------------------------------------------------

#[test]
fn local_helper_overrides_project_and_shared() {
    let install = Install::new();
    let which = install.marker("which-tier");
    for (root, tier) in [
        (&install.local, "local"),
        (&install.project, "project"),
        (&install.shared, "shared"),
    ] {
        install.script(
            root,
            "helpers/css/check",
            &format!("echo {tier} > {}", which.display()),
        );
    }

    let roots = install.roots_with_shared();
    let config = install.config(&[("LINT_CSS", "check")]);
    let dispatcher = Dispatcher::new(&roots, &config);

    let css = install.target("site.css", "");
    dispatcher
        .dispatch(Purpose::Lint, Path::new(HELPERS), &css, &[])
        .unwrap();

    assert_eq!(fs::read_to_string(&which).unwrap().trim(), "local");
}

#[test]
fn shared_tier_supplies_tools_only_in_sub_component_mode() {
    let install = Install::new();
    let marker = install.marker("shared-ran");
    install.script(
        &install.shared,
        "helpers/css/check",
        &format!("touch {}", marker.display()),
    );
    let config = install.config(&[("LINT_CSS", "check")]);
    let css = install.target("site.css", "");

    // Standalone: the shared helper is invisible, dispatch is a no-op.
    let standalone = install.roots();
    let outcome = Dispatcher::new(&standalone, &config)
        .dispatch(Purpose::Lint, Path::new(HELPERS), &css, &[])
        .unwrap();
    assert_eq!(outcome.code, 0);
    assert!(!marker.exists());

    // Sub-component: the same helper resolves and runs.
    let embedded = install.roots_with_shared();
    Dispatcher::new(&embedded, &config)
        .dispatch(Purpose::Lint, Path::new(HELPERS), &css, &[])
        .unwrap();
    assert!(marker.exists());
}

// ---------------------------------------------------------------------------
// Optional-tool policy
// ---------------------------------------------------------------------------

#[test]
fn dispatch_without_any_installed_tool_is_a_silent_noop() {
    let install = Install::new();
    let roots = install.roots();
    let config = install.config(&[("LINT_CSS", "ghostA ghostB+x ghostC")]);
    let dispatcher = Dispatcher::new(&roots, &config);

    let css = install.target("site.css", "body {}\n");
    let outcome = dispatcher
        .dispatch(Purpose::Lint, Path::new(HELPERS), &css, &[])
        .unwrap();

    assert_eq!(outcome.code, 0);
    assert_eq!(fs::read_to_string(&css).unwrap(), "body {}\n");
}

#[test]
fn unknown_file_type_is_a_silent_noop() {
    let install = Install::new();
    let marker = install.marker("ran");
    install.script(
        &install.project,
        "helpers/_common/check",
        &format!("touch {}", marker.display()),
    );
    let roots = install.roots();
    let config = install.config(&[]);
    let dispatcher = Dispatcher::new(&roots, &config);

    let odd = install.target("blob.qqq", "");
    let outcome = dispatcher
        .dispatch(Purpose::Lint, Path::new(HELPERS), &odd, &[])
        .unwrap();

    assert_eq!(outcome.code, 0);
    assert!(!marker.exists());
}

// ---------------------------------------------------------------------------
// Per-command options
// ---------------------------------------------------------------------------

#[test]
fn options_from_env_reach_the_helper_before_the_file_path() {
    let install = Install::new();
    let log = install.marker("argv.log");
    install.script(
        &install.project,
        "helpers/markdown/format",
        &format!("echo \"$@\" > {}", log.display()),
    );

    let roots = install.roots();
    let config = install.config(&[
        ("PRETTY_MARKDOWN", "format"),
        ("PRETTY_MARKDOWN_FORMAT_OPTIONS", "--wrap 80"),
    ]);
    let dispatcher = Dispatcher::new(&roots, &config);

    let md = install.target("notes.md", "# hi\n");
    dispatcher
        .dispatch(Purpose::Pretty, Path::new(HELPERS), &md, &[])
        .unwrap();

    assert_eq!(
        fs::read_to_string(&log).unwrap().trim(),
        format!("--wrap 80 {}", md.display())
    );
}

// ---------------------------------------------------------------------------
// Capture-and-commit
// ---------------------------------------------------------------------------

#[test]
fn capture_commits_formatter_stdout_over_the_target() {
    let install = Install::new();
    let target = install.target("doc.md", "shouting text\n");

    let mut cmd = std::process::Command::new("sh");
    cmd.arg("-c").arg("tr 'a-z' 'A-Z' < \"$1\"").arg("fmt").arg(&target);

    let code = capture_and_commit(&target, &mut cmd).unwrap();
    assert_eq!(code, 0);
    assert_eq!(fs::read_to_string(&target).unwrap(), "SHOUTING TEXT\n");
}

#[test]
fn capture_failure_rolls_back_nothing_because_nothing_was_written() {
    let install = Install::new();
    let target = install.target("doc.md", "precious\n");

    let mut cmd = std::process::Command::new("sh");
    cmd.arg("-c").arg("echo half-done; exit 9");

    let code = capture_and_commit(&target, &mut cmd).unwrap();
    assert_eq!(code, 9);
    assert_eq!(fs::read_to_string(&target).unwrap(), "precious\n");
}
