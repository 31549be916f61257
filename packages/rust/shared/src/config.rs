//! Application configuration for protonav.
//!
//! The optional config lives at `./protonav.toml` in the repository being
//! maintained. CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProtonavError, Result};
use crate::types::Category;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "protonav.toml";

// ---------------------------------------------------------------------------
// Config structs (matching protonav.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Markdown sources, one per category.
    #[serde(default)]
    pub docs: DocsConfig,

    /// Site configuration target.
    #[serde(default)]
    pub site: SiteConfig,

    /// Section naming rules.
    #[serde(default)]
    pub sections: SectionRules,
}

/// `[docs]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_node_doc")]
    pub node: PathBuf,

    #[serde(default = "default_provider_doc")]
    pub provider: PathBuf,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            node: default_node_doc(),
            provider: default_provider_doc(),
        }
    }
}

fn default_node_doc() -> PathBuf {
    PathBuf::from("docs").join("node.md")
}
fn default_provider_doc() -> PathBuf {
    PathBuf::from("docs").join("provider.md")
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Path to the site configuration file whose `nav` gets rewritten.
    #[serde(default = "default_site_config")]
    pub config: PathBuf,

    /// Key of the `nav` entry owned by this tool.
    #[serde(default = "default_nav_section")]
    pub nav_section: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            config: default_site_config(),
            nav_section: default_nav_section(),
        }
    }
}

fn default_site_config() -> PathBuf {
    PathBuf::from("mkdocs.yml")
}
fn default_nav_section() -> String {
    "Protobuf Documentation".into()
}

/// `[sections]` section: how TOC labels are recognised and renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRules {
    /// Package prefix removed from section labels.
    #[serde(default = "default_strip_prefix")]
    pub strip_prefix: String,

    /// Substring that marks a TOC label as a section; also removed from the name.
    #[serde(default = "default_marker")]
    pub marker: String,
}

impl Default for SectionRules {
    fn default() -> Self {
        Self {
            strip_prefix: default_strip_prefix(),
            marker: default_marker(),
        }
    }
}

fn default_strip_prefix() -> String {
    "akash/".into()
}
fn default_marker() -> String {
    ".proto".into()
}

// ---------------------------------------------------------------------------
// Sync config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime configuration for a navigation sync, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub node_doc: PathBuf,
    pub provider_doc: PathBuf,
    pub site_config: PathBuf,
    pub nav_section: String,
    pub rules: SectionRules,
}

impl SyncConfig {
    /// Markdown source for a category.
    pub fn doc_path(&self, category: Category) -> &Path {
        match category {
            Category::Node => &self.node_doc,
            Category::Provider => &self.provider_doc,
        }
    }
}

impl From<&AppConfig> for SyncConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            node_doc: config.docs.node.clone(),
            provider_doc: config.docs.provider.clone(),
            site_config: config.site.config.clone(),
            nav_section: config.site.nav_section.clone(),
            rules: config.sections.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path to the config file in the current working directory.
pub fn config_file_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| ProtonavError::io(".", e))?;
    Ok(cwd.join(CONFIG_FILE_NAME))
}

/// Load the application config from the working directory. Returns defaults if
/// the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ProtonavError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ProtonavError::parse(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Write a default config file into `dir`. Returns the path to the created file.
///
/// Refuses to overwrite an existing file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(ProtonavError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| ProtonavError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ProtonavError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
