use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;
use crate::render::Palette;

/// Read when present and no `-c` is given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/touchkeysd.toml";

/// Startup settings. Built-in defaults, overridden by the config file, then by
/// command line flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub framebuffer: PathBuf,
    /// Touch source; scanned for under `input_dir` when unset.
    pub device: Option<PathBuf>,
    pub input_dir: PathBuf,
    pub font: PathBuf,
    /// Name the uinput keyboard registers with.
    pub device_name: String,
    pub colors: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            framebuffer: PathBuf::from("/dev/fb0"),
            device: None,
            input_dir: PathBuf::from("/dev/input"),
            font: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
            device_name: "touchkeysd".to_string(),
            colors: Palette::default(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Loads the file named on the command line, else the default file if it
    /// exists, then applies the flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply(cli);
        Ok(config)
    }

    pub fn apply(&mut self, cli: &Cli) {
        if let Some(device) = &cli.device {
            self.device = Some(device.clone());
        }
        if let Some(font) = &cli.font {
            self.font = font.clone();
        }
    }
}
