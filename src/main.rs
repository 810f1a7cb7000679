use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use console::style;

use hookmux::capture::capture_and_commit;
use hookmux::classify::classify;
use hookmux::config;
use hookmux::dispatch::Dispatcher;
use hookmux::error::HookmuxError;
use hookmux::observability::init_logging;
use hookmux::resolve::ToolRoots;
use hookmux::types::Purpose;

#[derive(Parser)]
#[command(name = "hookmux")]
#[command(version, about = "Per-file-type lint and pretty-print dispatch for source-control hooks")]
struct Cli {
    /// Helper directory, relative to each search root
    #[arg(long, global = true, default_value = "helpers")]
    helper_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured lint chain for a file
    Lint {
        /// Target file
        file: PathBuf,
        /// Extra arguments passed through to the helper
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run the configured pretty-print chain for a file
    Pretty {
        /// Target file
        file: PathBuf,
        /// Extra arguments passed through to the helper
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the file-type tag for a path
    Classify {
        /// Path to classify
        file: PathBuf,
    },
    /// Resolve a relative tool path against the search tiers
    Resolve {
        /// Relative path, e.g. helpers/css/trim
        relative: PathBuf,
    },
    /// Run a stdout-printing formatter and commit its output over the file
    Capture {
        /// Target file to rewrite on success
        file: PathBuf,
        /// Command and arguments to run
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

/// Assemble the search roots from the bootstrap environment.
///
/// - `HOOKMUX_TARGET_DIR` — the target repository root (default: cwd)
/// - `HOOKMUX_LOCAL_DIR` — user overrides (default: `<target>/.hookmux`)
/// - `HOOKMUX_SHARED_DIR` — the shared tooling distribution; set only when
///   hookmux is embedded as a sub-component, which enables the third tier
///
/// Returns the roots plus the target directory, which is also where the
/// project config file lives.
fn bootstrap() -> (ToolRoots, PathBuf) {
    let target = std::env::var_os("HOOKMUX_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let local = std::env::var_os("HOOKMUX_LOCAL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| target.join(".hookmux"));
    let shared = std::env::var_os("HOOKMUX_SHARED_DIR").map(PathBuf::from);

    (ToolRoots::new(local, target.clone(), shared), target)
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let (roots, target_dir) = bootstrap();

    match cli.command {
        Commands::Lint { file, args } => {
            run_dispatch(&roots, &target_dir, Purpose::Lint, &cli.helper_dir, &file, &args);
        }
        Commands::Pretty { file, args } => {
            run_dispatch(&roots, &target_dir, Purpose::Pretty, &cli.helper_dir, &file, &args);
        }
        Commands::Classify { file } => {
            println!("{}", classify(&file));
        }
        Commands::Resolve { relative } => match roots.resolve(&relative) {
            Some(resolved) => {
                println!("{} ({})", resolved.path.display(), resolved.tier);
            }
            None => {
                eprintln!(
                    "{} {} not found in any tier",
                    style("hookmux:").dim(),
                    relative.display()
                );
                process::exit(1);
            }
        },
        Commands::Capture { file, command } => {
            let mut cmd = process::Command::new(&command[0]);
            cmd.args(&command[1..]);
            match capture_and_commit(&file, &mut cmd) {
                Ok(code) => process::exit(code),
                Err(e) => fail(&e),
            }
        }
    }
}

fn run_dispatch(
    roots: &ToolRoots,
    target_dir: &std::path::Path,
    purpose: Purpose,
    helper_dir: &std::path::Path,
    file: &std::path::Path,
    args: &[String],
) {
    let config = config::load(target_dir);
    let dispatcher = Dispatcher::new(roots, &config);

    match dispatcher.dispatch(purpose, helper_dir, file, args) {
        Ok(outcome) => process::exit(outcome.code),
        Err(e) => fail(&e),
    }
}

fn fail(e: &HookmuxError) -> ! {
    eprintln!("{} {e}", style("hookmux error:").red().bold());
    process::exit(1);
}
