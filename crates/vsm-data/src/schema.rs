//! Serde data file structs for process definitions.
//!
//! These structs define the on-disk format of a value stream's processes.
//! They are deserialized from RON, JSON, or TOML and then built into core
//! types by the loader.

use serde::Deserialize;
use vsm_core::config::RecipeProcessConfig;
use vsm_core::process::ProcessKind;

/// Top-level contents of a process definition file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessFile {
    #[serde(default)]
    pub processes: Vec<ProcessData>,
}

/// One process in a data file.
///
/// Recipe and stock entries use the short tuple form
/// `("product", quantity)`. Recipe quantities are signed: negative entries
/// are consumed, positive entries produced.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessData {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: ProcessKind,
    /// Required for recipe processes, rejected for plain ones.
    #[serde(default)]
    pub config: Option<RecipeProcessConfig>,
    #[serde(default)]
    pub recipe: Vec<(String, i32)>,
    /// Initial stock. A zero quantity only registers the product.
    #[serde(default)]
    pub stock: Vec<(String, u32)>,
}

fn default_kind() -> ProcessKind {
    ProcessKind::Plain
}
