//! Application configuration for rstextract.
//!
//! A project config lives at `./rstextract.toml`; a user-wide fallback at
//! `~/.rstextract/rstextract.toml`. CLI flags override config file values,
//! which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RstExtractError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "rstextract.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".rstextract";

/// Marker token that flags a comment block as documentation payload.
pub const DEFAULT_MARKER: &str = "+rst";

// ---------------------------------------------------------------------------
// Config structs (matching rstextract.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Extraction settings.
    #[serde(default)]
    pub extract: ExtractSection,

    /// Output settings.
    #[serde(default)]
    pub output: OutputSection,
}

/// `[extract]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractSection {
    /// Token that must stand alone on the first line of a comment block.
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Extension of the generated documents (without the dot).
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// Ignore `*_test.go` files when loading a source directory.
    #[serde(default)]
    pub skip_test_files: bool,
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            output_extension: default_output_extension(),
            skip_test_files: false,
        }
    }
}

fn default_marker() -> String {
    DEFAULT_MARKER.into()
}
fn default_output_extension() -> String {
    "rst".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    /// What to do when one unit's document cannot be written.
    #[serde(default)]
    pub on_write_error: WriteErrorPolicy,
}

/// Behaviour when writing a single output document fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteErrorPolicy {
    /// Stop the whole run at the first failed write.
    #[default]
    Abort,
    /// Log the failure, record it in the report, and continue with the next unit.
    Skip,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.rstextract/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RstExtractError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user config file (`~/.rstextract/rstextract.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| RstExtractError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        RstExtractError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Resolve the effective config.
///
/// Lookup order: the explicit path (must exist), `rstextract.toml` in
/// `project_dir`, the user config file, then built-in defaults. Returns the
/// config together with the file it came from, if any.
pub fn resolve_config(
    explicit: Option<&Path>,
    project_dir: &Path,
) -> Result<(AppConfig, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((load_config_from(path)?, Some(path.to_path_buf())));
    }

    let project = project_dir.join(CONFIG_FILE_NAME);
    if project.is_file() {
        tracing::debug!(path = %project.display(), "using project config");
        return Ok((load_config_from(&project)?, Some(project)));
    }

    let user = config_file_path()?;
    if user.is_file() {
        tracing::debug!(path = %user.display(), "using user config");
        return Ok((load_config_from(&user)?, Some(user)));
    }

    Ok((AppConfig::default(), None))
}

/// Create the user config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| RstExtractError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| RstExtractError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| RstExtractError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
