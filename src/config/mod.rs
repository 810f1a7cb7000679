//! Configuration system — YAML file, environment overrides, typed lookup.

pub mod loader;
pub mod schema;

// Re-export the most commonly used types.
pub use loader::{load, load_with_vars};
pub use schema::{ConfigTable, HookmuxConfig};
