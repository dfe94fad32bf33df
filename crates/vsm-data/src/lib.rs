//! Data-driven process definitions for VSM Core.
//!
//! Reads RON, TOML or JSON files describing processes, their recipes and
//! initial stock, and builds ready-to-use [`vsm_core`] processes from them.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, Format, LoadedProcess, load_processes, load_processes_str};
