use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Which window an incoming FIFO command runs in.
///
/// Read fresh on every dispatch, so a config change takes effect on the
/// next command without restarting the channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetSelectionMode {
    #[default]
    LastFocused,
    LastOpened,
    LastVisible,
}

impl fmt::Display for TargetSelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetSelectionMode::LastFocused => "last-focused",
            TargetSelectionMode::LastOpened => "last-opened",
            TargetSelectionMode::LastVisible => "last-visible",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target selection for commands arriving over the FIFO.
    #[serde(default)]
    pub open_target: TargetSelectionMode,
    /// File name of the pipe inside the runtime directory.
    #[serde(default = "default_fifo_name")]
    pub fifo_name: String,
}

fn default_fifo_name() -> String {
    "fifo".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            open_target: TargetSelectionMode::default(),
            fifo_name: default_fifo_name(),
        }
    }
}

impl Config {
    /// Load config from a TOML file. An unrecognized `open_target` value is
    /// rejected here, at load time, rather than falling back at dispatch time.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
