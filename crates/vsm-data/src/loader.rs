//! Loading pipeline: reads a data file, validates it, and builds processes.
//!
//! Provides format detection (RON/JSON/TOML), deserialization helpers, and
//! the conversion from [`ProcessFile`] into core processes.

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use vsm_core::config::ConfigError;
use vsm_core::factory::RecipeProcess;
use vsm_core::inventory::InventoryError;
use vsm_core::process::{Process, ProcessKind, ProcessNode};
use vsm_core::product::Product;
use vsm_core::recipe::RecipeError;

use crate::schema::{ProcessData, ProcessFile};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// Two processes share a name.
    #[error("duplicate process name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A recipe process has no timing/efficiency configuration.
    #[error("recipe process '{process}' in {file} has no config")]
    MissingConfig { file: PathBuf, process: String },

    /// A plain process declares a recipe or a config.
    #[error("plain process '{process}' in {file} cannot declare a recipe or config")]
    UnexpectedRecipe { file: PathBuf, process: String },

    #[error("invalid config for '{process}' in {file}: {source}")]
    Config {
        file: PathBuf,
        process: String,
        #[source]
        source: ConfigError,
    },

    #[error("invalid recipe for '{process}' in {file}: {source}")]
    Recipe {
        file: PathBuf,
        process: String,
        #[source]
        source: RecipeError,
    },

    #[error("invalid stock for '{process}' in {file}: {source}")]
    Inventory {
        file: PathBuf,
        process: String,
        #[source]
        source: InventoryError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `file` only labels errors.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

// ===========================================================================
// Loaded processes
// ===========================================================================

/// A process built from a data file.
#[derive(Debug, Clone)]
pub enum LoadedProcess {
    Plain(Process),
    Recipe(RecipeProcess),
}

impl LoadedProcess {
    pub fn as_recipe(&self) -> Option<&RecipeProcess> {
        match self {
            LoadedProcess::Recipe(p) => Some(p),
            LoadedProcess::Plain(_) => None,
        }
    }

    pub fn into_recipe(self) -> Option<RecipeProcess> {
        match self {
            LoadedProcess::Recipe(p) => Some(p),
            LoadedProcess::Plain(_) => None,
        }
    }

    pub fn quantity_of(&self, product: &Product) -> u32 {
        match self {
            LoadedProcess::Plain(p) => p.quantity_of(product),
            LoadedProcess::Recipe(p) => p.quantity_of(product),
        }
    }
}

impl ProcessNode for LoadedProcess {
    fn name(&self) -> &str {
        match self {
            LoadedProcess::Plain(p) => p.name(),
            LoadedProcess::Recipe(p) => p.name(),
        }
    }

    fn kind(&self) -> ProcessKind {
        match self {
            LoadedProcess::Plain(p) => p.kind(),
            LoadedProcess::Recipe(p) => p.kind(),
        }
    }

    fn describe(&self) -> String {
        match self {
            LoadedProcess::Plain(p) => p.describe(),
            LoadedProcess::Recipe(p) => p.describe(),
        }
    }
}

// ===========================================================================
// Loading functions
// ===========================================================================

/// Load every process defined in a RON, TOML or JSON file.
pub fn load_processes(path: &Path) -> Result<Vec<LoadedProcess>, DataLoadError> {
    let data: ProcessFile = deserialize_file(path)?;
    build_processes(data, path)
}

/// Load processes from in-memory text.
pub fn load_processes_str(content: &str, format: Format) -> Result<Vec<LoadedProcess>, DataLoadError> {
    let label = Path::new("<inline>");
    let data: ProcessFile = deserialize_str(content, format, label)?;
    build_processes(data, label)
}

fn build_processes(data: ProcessFile, file: &Path) -> Result<Vec<LoadedProcess>, DataLoadError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut processes = Vec::with_capacity(data.processes.len());

    for def in data.processes {
        if !seen.insert(def.name.clone()) {
            return Err(DataLoadError::DuplicateName {
                file: file.to_path_buf(),
                name: def.name,
            });
        }
        let built = match def.kind {
            ProcessKind::Plain => LoadedProcess::Plain(build_plain(def, file)?),
            ProcessKind::Recipe => LoadedProcess::Recipe(build_recipe(def, file)?),
        };
        processes.push(built);
    }

    tracing::debug!(
        file = %file.display(),
        processes = processes.len(),
        "loaded process definitions"
    );
    Ok(processes)
}

fn build_plain(def: ProcessData, file: &Path) -> Result<Process, DataLoadError> {
    if def.config.is_some() || !def.recipe.is_empty() {
        return Err(DataLoadError::UnexpectedRecipe {
            file: file.to_path_buf(),
            process: def.name,
        });
    }
    let mut process = Process::new(def.name.clone());
    seed_stock(&mut process, def.stock, &def.name, file)?;
    Ok(process)
}

fn build_recipe(def: ProcessData, file: &Path) -> Result<RecipeProcess, DataLoadError> {
    let config = def.config.ok_or_else(|| DataLoadError::MissingConfig {
        file: file.to_path_buf(),
        process: def.name.clone(),
    })?;
    let mut process =
        RecipeProcess::new(def.name.clone(), config).map_err(|source| DataLoadError::Config {
            file: file.to_path_buf(),
            process: def.name.clone(),
            source,
        })?;

    for (name, quantity) in def.recipe {
        process
            .set_recipe_entry(Product::new(name), quantity)
            .map_err(|source| DataLoadError::Recipe {
                file: file.to_path_buf(),
                process: def.name.clone(),
                source,
            })?;
    }
    seed_stock(&mut process, def.stock, &def.name, file)?;
    Ok(process)
}

/// The stock operations shared by both process flavours.
trait Stockable {
    fn register(&mut self, product: Product);
    fn add(&mut self, product: &Product, quantity: u32) -> Result<(), InventoryError>;
}

impl Stockable for Process {
    fn register(&mut self, product: Product) {
        Process::register(self, product);
    }

    fn add(&mut self, product: &Product, quantity: u32) -> Result<(), InventoryError> {
        Process::add(self, product, quantity)
    }
}

impl Stockable for RecipeProcess {
    fn register(&mut self, product: Product) {
        RecipeProcess::register(self, product);
    }

    fn add(&mut self, product: &Product, quantity: u32) -> Result<(), InventoryError> {
        RecipeProcess::add(self, product, quantity)
    }
}

/// Register every stock entry, then add its quantity. Zero only registers.
fn seed_stock(
    process: &mut impl Stockable,
    stock: Vec<(String, u32)>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    for (product, quantity) in stock {
        let product = Product::new(product);
        process.register(product.clone());
        if quantity > 0 {
            process
                .add(&product, quantity)
                .map_err(|source| DataLoadError::Inventory {
                    file: file.to_path_buf(),
                    process: name.to_string(),
                    source,
                })?;
        }
    }
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================
