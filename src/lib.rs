//! hookmux — per-file-type tool resolution and execution for
//! source-control hooks.
//!
//! Given a file, hookmux classifies its type, looks up the configured
//! command-set alternatives for that type, resolves each against a tiered
//! directory hierarchy (local override → project → shared distribution),
//! and runs the first resolvable chain of sub-commands, aborting at the
//! first failure. Missing tools are never an error — an installation
//! without an optional formatter dispatches as a no-op.

pub mod capture;
pub mod chain;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod observability;
pub mod resolve;
pub mod types;
