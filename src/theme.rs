use serde::{Deserialize, Serialize};

use crate::error::{ErdrawError, Result};

const GITHUB_LIGHT_BACKGROUND: &str = "#ffffff";
const GITHUB_LIGHT_TEXT: &str = "#24292f";
const GITHUB_LIGHT_GRID: &str = "#eaeef2";
const TABLE_BODY: &str = "#ffffff";
const KEY_ICON: &str = "#eab308";
const NOT_NULL_ICON: &str = "#4ade80";

const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("github_dark", include_str!("../themes/github_dark.toml")),
    ("github_light", include_str!("../themes/github_light.toml")),
    ("solarized_light", include_str!("../themes/solarized_light.toml")),
];

const FONT_FAMILY: &str = "sans-serif";
const EDGE_WIDTH: f32 = 1.0;
const GRID_GAP: f32 = 16.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_text")]
    pub text_color: String,
    #[serde(default = "default_grid")]
    pub grid_color: String,
    #[serde(default = "default_table_body")]
    pub table_body_color: String,
    #[serde(default = "default_key_icon")]
    pub key_icon_color: String,
    #[serde(default = "default_not_null_icon")]
    pub not_null_icon_color: String,

    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_edge_width")]
    pub edge_width: f32,
    #[serde(default = "default_grid_gap")]
    pub grid_gap: f32,
}

fn default_background() -> String {
    GITHUB_LIGHT_BACKGROUND.to_string()
}
fn default_text() -> String {
    GITHUB_LIGHT_TEXT.to_string()
}
fn default_grid() -> String {
    GITHUB_LIGHT_GRID.to_string()
}
fn default_table_body() -> String {
    TABLE_BODY.to_string()
}
fn default_key_icon() -> String {
    KEY_ICON.to_string()
}
fn default_not_null_icon() -> String {
    NOT_NULL_ICON.to_string()
}
fn default_font_family() -> String {
    FONT_FAMILY.to_string()
}
fn default_edge_width() -> f32 {
    EDGE_WIDTH
}
fn default_grid_gap() -> f32 {
    GRID_GAP
}

impl Default for Theme {
    fn default() -> Self {
        Self::github_light()
    }
}

#[derive(Debug, Deserialize)]
struct AlacrittyColors {
    primary: AlacrittyPrimary,
    normal: AlacrittyNormal,
}

#[derive(Debug, Deserialize)]
struct AlacrittyPrimary {
    background: String,
    foreground: String,
}

#[derive(Debug, Deserialize)]
struct AlacrittyNormal {
    yellow: String,
    green: String,
    white: String,
}

#[derive(Debug, Deserialize)]
struct AlacrittyTheme {
    colors: AlacrittyColors,
}

impl Theme {
    pub fn github_light() -> Self {
        Theme {
            background_color: GITHUB_LIGHT_BACKGROUND.to_string(),
            text_color: GITHUB_LIGHT_TEXT.to_string(),
            grid_color: GITHUB_LIGHT_GRID.to_string(),
            table_body_color: TABLE_BODY.to_string(),
            key_icon_color: KEY_ICON.to_string(),
            not_null_icon_color: NOT_NULL_ICON.to_string(),
            font_family: FONT_FAMILY.to_string(),
            edge_width: EDGE_WIDTH,
            grid_gap: GRID_GAP,
        }
    }

    pub fn from_builtin(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let content = BUILTIN_THEMES
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| {
                ErdrawError::Theme(format!(
                    "Unknown built-in theme '{}'. Available: {}",
                    name,
                    Self::list_builtins().join(", ")
                ))
            })?;
        Self::from_alacritty_toml(content)
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_THEMES.iter().map(|(n, _)| *n).collect()
    }

    pub fn from_alacritty_yaml(content: &str) -> Result<Self> {
        let alacritty: AlacrittyTheme = serde_yaml::from_str(content)
            .map_err(|e| ErdrawError::Theme(format!("Failed to parse Alacritty YAML: {}", e)))?;

        Ok(Self::from_alacritty_theme(alacritty))
    }

    pub fn from_alacritty_toml(content: &str) -> Result<Self> {
        let alacritty: AlacrittyTheme = toml::from_str(content)
            .map_err(|e| ErdrawError::Theme(format!("Failed to parse Alacritty TOML: {}", e)))?;

        Ok(Self::from_alacritty_theme(alacritty))
    }

    fn from_alacritty_theme(alacritty: AlacrittyTheme) -> Self {
        let colors = alacritty.colors;

        Theme {
            background_color: colors.primary.background,
            text_color: colors.primary.foreground,
            grid_color: colors.normal.white,
            key_icon_color: colors.normal.yellow,
            not_null_icon_color: colors.normal.green,
            ..Self::github_light()
        }
    }

    /// A built-in name, or a path to an Alacritty theme (TOML first, then YAML).
    pub fn resolve(spec: &str) -> Result<Self> {
        let path = std::path::Path::new(spec);
        if !path.is_file() {
            return Self::from_builtin(spec);
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_alacritty_toml(&content).or_else(|_| {
            Self::from_alacritty_yaml(&content).map_err(|_| {
                ErdrawError::Theme(format!(
                    "Failed to parse theme file as TOML or YAML: {}",
                    path.display()
                ))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn from_builtin_accepts_hyphenated_and_case_insensitive_names() {
        let underscore = Theme::from_builtin("github_dark").expect("underscore variant");
        let hyphen = Theme::from_builtin("GitHub-Dark").expect("hyphen variant");

        assert_eq!(underscore.background_color, hyphen.background_color);
        assert_eq!(underscore.text_color, "#c9d1d9");
    }

    #[test]
    fn every_builtin_parses() {
        for name in Theme::list_builtins() {
            assert!(Theme::from_builtin(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn unknown_builtin_lists_alternatives() {
        let err = Theme::from_builtin("neon").unwrap_err().to_string();
        assert!(err.contains("github_light"), "{err}");
    }

    #[test]
    fn yaml_themes_are_accepted() {
        let yaml = "colors:\n  primary:\n    background: '#000000'\n    foreground: '#ffffff'\n  normal:\n    yellow: '#ffff00'\n    green: '#00ff00'\n    white: '#cccccc'\n";
        let theme = Theme::from_alacritty_yaml(yaml).unwrap();
        assert_eq!(theme.background_color, "#000000");
        assert_eq!(theme.grid_color, "#cccccc");
        assert_eq!(theme.table_body_color, "#ffffff");
    }
}
