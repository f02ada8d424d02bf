use std::fmt;
use std::str::FromStr;

use crate::error::PrefsError;

/// Binary visual mode applied to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Parse a persisted value. Only the exact strings "light" and "dark" are accepted.
    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_dark(is_dark: bool) -> Theme {
        if is_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = PrefsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::parse(s).ok_or_else(|| PrefsError::MalformedValue {
            key: "theme".to_string(),
            value: s.to_string(),
        })
    }
}

/// Encoding of the sidebar collapsed flag, both in storage ("1"/"0")
/// and on the container attribute ("true"/"false").
pub struct SidebarState;

impl SidebarState {
    pub fn parse_collapsed(value: &str) -> Option<bool> {
        match value {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        }
    }

    pub fn encode_collapsed(collapsed: bool) -> &'static str {
        if collapsed {
            "1"
        } else {
            "0"
        }
    }

    pub fn attribute_value(collapsed: bool) -> &'static str {
        if collapsed {
            "true"
        } else {
            "false"
        }
    }

    /// Anything other than "true" reads as expanded.
    pub fn parse_attribute(value: Option<&str>) -> bool {
        value == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_only_exact_values() {
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("Dark"), None);
        assert_eq!(Theme::parse(" dark"), None);
        assert_eq!(Theme::parse("purple"), None);
        assert_eq!(Theme::parse(""), None);
    }

    #[test]
    fn test_toggled_flips() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_from_str_reports_malformed() {
        let err = "purple".parse::<Theme>().unwrap_err();
        assert!(matches!(err, PrefsError::MalformedValue { .. }));
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
    }

    #[test]
    fn test_sidebar_encoding() {
        assert_eq!(SidebarState::parse_collapsed("1"), Some(true));
        assert_eq!(SidebarState::parse_collapsed("0"), Some(false));
        assert_eq!(SidebarState::parse_collapsed("true"), None);
        assert_eq!(SidebarState::encode_collapsed(true), "1");
        assert_eq!(SidebarState::attribute_value(false), "false");
        assert!(SidebarState::parse_attribute(Some("true")));
        assert!(!SidebarState::parse_attribute(Some("yes")));
        assert!(!SidebarState::parse_attribute(None));
    }
}
