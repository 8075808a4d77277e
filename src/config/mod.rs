//! Site configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[base]`    | Site metadata (title, author, url)               |
//! | `[build]`   | Collection directories, extensions, switches     |
//! | `[layouts]` | Explicit layout name → template path entries     |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Slow Reading"
//! url = "https://essays.example.com"
//!
//! [build]
//! posts = "_posts"
//! drafts = "_drafts"
//! show_drafts = true
//!
//! [layouts]
//! essay = "templates/long-form.html"
//! ```

mod base;
mod build;
pub mod defaults;
mod error;

use base::BaseConfig;
use build::BuildConfig;
use error::ConfigError;

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Ingestion settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Layouts registered by name, overriding those found in `build.layouts`
    #[serde(default)]
    pub layouts: BTreeMap<String, PathBuf>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load `folio.toml` (or the file named by `--config`) and apply CLI
    /// overrides. A missing config file means all defaults.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let root = expand_tilde(root);
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.config_path = Self::normalize_path(&config_path);
        config.update_with_cli(cli);
        config.resolve_paths(&root);
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Apply CLI path overrides.
    pub fn update_with_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.build.posts, cli.posts.as_ref());
        Self::update_option(&mut self.build.drafts, cli.drafts_dir.as_ref());
        Self::update_option(&mut self.build.layouts, cli.layouts.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Make every configured path absolute, relative to `root`.
    pub fn resolve_paths(&mut self, root: &Path) {
        let root = Self::normalize_path(&expand_tilde(root));
        let join = |path: &Path| Self::normalize_path(&root.join(expand_tilde(path)));

        self.build.posts = join(&self.build.posts);
        self.build.drafts = join(&self.build.drafts);
        self.build.layouts = join(&self.build.layouts);
        self.build.output = join(&self.build.output);
        for template in self.layouts.values_mut() {
            *template = join(template);
        }

        self.build.root = Some(root);
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before ingestion
    pub fn validate(&self) -> Result<()> {
        if !self.build.posts.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[build.posts] directory `{}` not found",
                self.build.posts.display()
            )));
        }

        if self.build.extensions.is_empty() {
            bail!(ConfigError::Validation(
                "[build.extensions] must have at least one element".into()
            ));
        }

        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        for (name, template) in &self.layouts {
            if !template.is_file() {
                bail!(ConfigError::Validation(format!(
                    "[layouts.{name}] `{}` is not a file",
                    template.display()
                )));
            }
        }

        Ok(())
    }
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(text) => PathBuf::from(shellexpand::tilde(text).into_owned()),
        None => path.to_path_buf(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("_posts")).unwrap();
        dir
    }

    #[test]
    fn test_default_config_validates_with_posts_dir() {
        let dir = site();
        let mut config = SiteConfig::default();
        config.resolve_paths(dir.path());

        assert!(config.validate().is_ok());
        assert!(config.build.posts.is_absolute());
        assert!(config.build.posts.ends_with("_posts"));
        assert!(config.build.output.ends_with("_site"));
    }

    #[test]
    fn test_missing_posts_dir_fails_validation() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.resolve_paths(dir.path());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("[build.posts]"));
    }

    #[test]
    fn test_empty_extensions_fail_validation() {
        let dir = site();
        let mut config = SiteConfig::from_str("[build]\nextensions = []").unwrap();
        config.resolve_paths(dir.path());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_must_be_http() {
        let dir = site();
        let mut config = SiteConfig::from_str("[base]\nurl = \"example.com\"").unwrap();
        config.resolve_paths(dir.path());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("[base.url]"));
    }

    #[test]
    fn test_layout_table_paths_are_resolved() {
        let dir = site();
        fs::create_dir(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/essay.html"), "{{ content }}").unwrap();

        let mut config =
            SiteConfig::from_str("[layouts]\nessay = \"templates/essay.html\"").unwrap();
        config.resolve_paths(dir.path());

        assert!(config.layouts["essay"].is_absolute());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_layout_template_fails_validation() {
        let dir = site();
        let mut config = SiteConfig::from_str("[layouts]\npost = \"nope.html\"").unwrap();
        config.resolve_paths(dir.path());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("[layouts.post]"));
    }

    #[test]
    fn test_load_applies_cli_overrides() {
        let dir = site();
        fs::write(
            dir.path().join("folio.toml"),
            "[base]\ntitle = \"Loaded\"\n[build]\nposts = \"essays\"\n",
        )
        .unwrap();
        let root = dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["folio", "--root", root, "check"]).unwrap();
        let config = SiteConfig::load(&cli).unwrap();
        assert_eq!(config.base.title, "Loaded");
        assert!(config.build.posts.ends_with("essays"));

        let cli =
            Cli::try_parse_from(["folio", "--root", root, "--posts", "_posts", "check"]).unwrap();
        let config = SiteConfig::load(&cli).unwrap();
        assert!(config.build.posts.ends_with("_posts"));
        assert!(config.config_path.ends_with("folio.toml"));
    }

    #[test]
    fn test_load_without_config_file_uses_defaults() {
        let dir = site();
        let root = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["folio", "--root", root, "check"]).unwrap();

        let config = SiteConfig::load(&cli).unwrap();
        assert_eq!(config.base.author, "<YOUR_NAME>");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = SiteConfig::from_str("[build\nposts = 1").unwrap_err();
        assert!(err.to_string().contains("parsing"));
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde(Path::new("_posts")), PathBuf::from("_posts"));
    }
}
