use blueprint_editor::{PatchStrategy, Patcher, DEFAULT_INDENT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "blueprint.config.json";

/// Blueprint configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// How patch targets are located ("scoped" or "first-match")
    #[serde(default)]
    pub patch_strategy: PatchStrategy,

    /// Indentation for added declarations
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Fail on malformed CSS instead of skipping it
    #[serde(default)]
    pub strict: bool,

    /// File extensions treated as stylesheets when inspecting directories
    #[serde(default = "default_css_extensions")]
    pub css_extensions: Vec<String>,
}

fn default_indent() -> String {
    DEFAULT_INDENT.to_string()
}

fn default_css_extensions() -> Vec<String> {
    vec!["css".to_string()]
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            debug!(path = %config_path.display(), "Loading config");
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Patcher for this config, optionally overriding the strategy
    pub fn patcher(&self, strategy: Option<PatchStrategy>) -> Patcher {
        Patcher::new(strategy.unwrap_or(self.patch_strategy)).with_indent(self.indent.clone())
    }

    pub fn is_stylesheet(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.css_extensions.iter().any(|allowed| allowed == ext))
            .unwrap_or(false)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            patch_strategy: PatchStrategy::default(),
            indent: default_indent(),
            strict: false,
            css_extensions: default_css_extensions(),
        }
    }
}
