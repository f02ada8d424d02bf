use serde::{Deserialize, Serialize};

use crate::error::PrefsError;

pub const DEFAULT_THEME_KEY: &str = "ui:theme";
pub const DEFAULT_SIDEBAR_KEY: &str = "ui:sidebar-collapsed";

/// Controller configuration. Every field has a default, so an empty JSON
/// object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerConfig {
    /// Storage key for the theme preference.
    pub theme_key: String,
    /// Storage key for the sidebar collapsed flag.
    pub sidebar_key: String,
    /// Whether the sidebar part of the controller is active at all.
    pub sidebar: bool,
    /// Class toggled on the document root while dark mode is active.
    pub dark_class: String,
    /// Selector of the container that carries `data-sidebar-collapsed`.
    pub container_selector: String,
    /// Attribute holding trigger markers on interactive elements.
    pub action_attribute: String,
    pub log_level: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            theme_key: DEFAULT_THEME_KEY.to_string(),
            sidebar_key: DEFAULT_SIDEBAR_KEY.to_string(),
            sidebar: true,
            dark_class: "theme-dark".to_string(),
            container_selector: ".app".to_string(),
            action_attribute: "data-action".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ControllerConfig {
    /// Theme-only configuration, as used by pages without a collapsible sidebar.
    pub fn theme_only() -> Self {
        Self {
            sidebar: false,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PrefsError> {
        let config: ControllerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PrefsError> {
        if self.theme_key.is_empty() {
            return Err(PrefsError::Config("themeKey must not be empty".to_string()));
        }
        if self.sidebar_key.is_empty() {
            return Err(PrefsError::Config("sidebarKey must not be empty".to_string()));
        }
        if self.theme_key == self.sidebar_key {
            return Err(PrefsError::Config(format!(
                "themeKey and sidebarKey must differ (both are '{}')",
                self.theme_key
            )));
        }
        if self.dark_class.trim().is_empty() || self.dark_class.contains(char::is_whitespace) {
            return Err(PrefsError::Config(format!(
                "darkClass must be a single class name, got '{}'",
                self.dark_class
            )));
        }
        if self.container_selector.trim().is_empty() {
            return Err(PrefsError::Config("containerSelector must not be empty".to_string()));
        }
        if self.action_attribute.trim().is_empty() {
            return Err(PrefsError::Config("actionAttribute must not be empty".to_string()));
        }
        Ok(())
    }
}
