//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use beanline_core::EngineConfig;

use crate::output::Output;

/// File names searched for when `--config` is not given.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["beanline.toml", ".beanline.toml", "beanline.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Effective engine configuration.
    pub config: EngineConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from a config file and command line overrides.
    pub fn load(config_path: Option<&str>, api_base_url: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = match config_path {
            Some(path) => {
                let config = EngineConfig::load(path)
                    .with_context(|| format!("Failed to load config: {}", path))?;
                (config, Some(PathBuf::from(path)))
            }
            None => match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (EngineConfig::default(), None),
            },
        };

        if let Some(url) = api_base_url {
            config = config.with_api_base_url(url);
            config.validate().context("Invalid --api-base-url")?;
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find a config file in the directory tree, starting at `start`.
fn find_config(start: &Path) -> Option<(EngineConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let path = current.join(name);
            if path.exists() {
                if let Ok(config) = EngineConfig::load(&path) {
                    return Some((config, path));
                }
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
