use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::die::Die;
use crate::game::MIN_DICE;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Picks the format from the file extension; anything but `.yaml`/`.yml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GameConfig {
    pub dice: Vec<Die>,
    pub rounds: u32,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dice: Vec::new(),
            rounds: 1,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self> {
        let cfg: GameConfig = match format {
            ConfigFormat::Json => serde_json::from_str(text).context("invalid JSON game config")?,
            ConfigFormat::Yaml => serde_yaml::from_str(text).context("invalid YAML game config")?,
        };
        Ok(cfg)
    }

    /// Parse `2,2,4,4,9,9`-style arguments, one die each.
    pub fn dice_from_args<S: AsRef<str>>(args: &[S]) -> Result<Vec<Die>> {
        args.iter()
            .map(|arg| {
                let arg = arg.as_ref();
                arg.parse::<Die>()
                    .with_context(|| format!("error parsing dice values '{}'", arg))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.dice.len() < MIN_DICE {
            bail!(
                "at least {} dice must be provided, got {}",
                MIN_DICE,
                self.dice.len()
            );
        }
        if self.rounds == 0 {
            bail!("rounds must be at least 1");
        }
        Ok(())
    }
}
