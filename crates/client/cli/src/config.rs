//! CLI configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use runtime::RuntimeConfig;

/// Everything `battle-sim` needs to locate content and drive the runtime.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub content_dir: PathBuf,
    pub stage_file: String,
    pub runtime: RuntimeConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            content_dir: combat_content::bundled_data_dir(),
            stage_file: "stage.ron".to_string(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CONTENT_DIR` - Directory with stage, enemy, party and balance files
    ///   (default: the bundled content)
    /// - `STAGE_FILE` - Stage file inside `CONTENT_DIR` (default: `stage.ron`)
    /// - `BATTLE_*` - Runtime settings, see [`RuntimeConfig::from_env`]
    ///
    /// A first positional argument overrides `STAGE_FILE`.
    pub fn from_env() -> Self {
        let mut config = Self {
            runtime: RuntimeConfig::from_env(),
            ..Self::default()
        };

        if let Some(dir) = env::var_os("CONTENT_DIR") {
            config.content_dir = PathBuf::from(dir);
        }
        if let Ok(stage) = env::var("STAGE_FILE")
            && !stage.trim().is_empty()
        {
            config.stage_file = stage;
        }
        if let Some(stage) = env::args().nth(1) {
            config.stage_file = stage;
        }

        config
    }
}
