use crate::{coerce, statics};
use anyhow::Context;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use time::UtcOffset;

pub const DEFAULT_CONFIG_FILE: &str = "procset.json5";

/// Application settings, read from an optional JSON5 file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Backend document backing both services.
    pub backend_path: PathBuf,
    /// Offset the timestamp editor works in: `UTC` or `+HH:MM`.
    pub display_offset: String,
    pub dark_theme: bool,
    pub flag_label: String,
    pub timestamp_label: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_path: PathBuf::from("backend.json5"),
            display_offset: "UTC".to_string(),
            dark_theme: true,
            flag_label: statics::EN_LABEL_PROCESS_FLAG.to_string(),
            timestamp_label: statics::EN_LABEL_PROCESS_TIMESTAMP.to_string(),
        }
    }
}

impl AppConfig {
    pub fn parse_json5(text: &str) -> anyhow::Result<Self> {
        let config = json5::from_str::<AppConfig>(text)?;
        config.utc_offset()?;
        Ok(config)
    }

    /// Relative backend paths are resolved against the config file's directory.
    pub fn load_path(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        let mut config = Self::parse_json5(&text).with_context(|| format!("parsing {path:?}"))?;
        if config.backend_path.is_relative()
            && let Some(dir) = path.parent()
        {
            config.backend_path = dir.join(&config.backend_path);
        }
        Ok(config)
    }

    /// An explicit path must exist; otherwise the default file is used when present.
    pub fn discover(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load_path(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load_path(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn utc_offset(&self) -> anyhow::Result<UtcOffset> {
        coerce::parse_utc_offset(&self.display_offset)
            .with_context(|| format!("displayOffset '{}'", self.display_offset))
    }
}
