use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use ui_decorators::decorators::DecoratorConfig;
use ui_decorators::graph::Workspace;

pub const SETTINGS_PATH: &str = "settings.json";
pub const DEFAULT_WORKSPACE: &str = "workspace.json";

#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct AppSettings {
    #[serde(default)]
    pub config: DecoratorConfig,
    #[serde(default)]
    pub last_workspace: Option<String>,
}

impl AppSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
    }

    /// Settings from `path`, or defaults if it is missing or unreadable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                if path.as_ref().exists() {
                    log::warn!("using default settings: {e:#}");
                }
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("serializing settings")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }
}

pub fn load_workspace(path: impl AsRef<Path>) -> Result<Workspace> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing workspace {}", path.display()))
}

pub fn save_workspace(workspace: &Workspace, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(workspace).context("serializing workspace")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("ui_decorators_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_settings_round_trip_through_file() {
        let path = temp_path("settings.json");
        let mut settings = AppSettings::default();
        settings.config.note_margin = 16.0;
        settings.last_workspace = Some("demo.json".into());
        settings.save(&path).unwrap();

        let back = AppSettings::load(&path).unwrap();
        assert_eq!(back.config.note_margin, 16.0);
        assert_eq!(back.last_workspace.as_deref(), Some("demo.json"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"config": {"title_inset": 20.0}}"#).unwrap();
        assert_eq!(settings.config.title_inset, 20.0);
        assert_eq!(settings.config.note_line_height_mult, 1.4);
        assert!(settings.last_workspace.is_none());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = temp_path("missing.json");
        let err = AppSettings::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
        assert_eq!(
            AppSettings::load_or_default(&path).config.title_inset,
            DecoratorConfig::default().title_inset
        );
    }

    #[test]
    fn test_corrupt_workspace_is_an_error() {
        let path = temp_path("corrupt.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_workspace(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}
