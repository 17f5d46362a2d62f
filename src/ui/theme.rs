use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use keynav::notify::NoticeLevel;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub selected_bg: String,
    pub selected_fg: String,
    pub marked: String,
    pub error: String,
    pub warning: String,
    pub success: String,
    pub info: String,
}

impl Theme {
    /// Looks in `<config_dir>/keynav/themes/<name>.toml`, then the built-in
    /// themes.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("keynav")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(err) => {
                        tracing::warn!(theme = name, error = %err, "invalid user theme");
                    }
                }
            }
        }
        Self::builtin(name)
    }

    fn builtin(name: &str) -> Option<Self> {
        let colors = match name {
            "terminal-default" => ThemeColors::terminal(),
            "catppuccin-mocha" => ThemeColors::default(),
            _ => return None,
        };
        Some(Self {
            name: name.to_string(),
            colors,
        })
    }

    pub fn available_themes() -> Vec<String> {
        vec!["terminal-default".to_string(), "catppuccin-mocha".to_string()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "catppuccin-mocha".to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            muted: "#585b70".to_string(),
            accent: "#89b4fa".to_string(),
            accent_dim: "#45475a".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89b4fa".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            selected_bg: "#f5e0dc".to_string(),
            selected_fg: "#1e1e2e".to_string(),
            marked: "#cba6f7".to_string(),
            error: "#f38ba8".to_string(),
            warning: "#f9e2af".to_string(),
            success: "#a6e3a1".to_string(),
            info: "#89dceb".to_string(),
        }
    }
}

impl ThemeColors {
    fn terminal() -> Self {
        Self {
            bg: "reset".to_string(),
            fg: "reset".to_string(),
            muted: "darkgray".to_string(),
            accent: "blue".to_string(),
            accent_dim: "darkgray".to_string(),
            border: "gray".to_string(),
            border_focused: "blue".to_string(),
            header_bg: "reset".to_string(),
            header_fg: "white".to_string(),
            selected_bg: "white".to_string(),
            selected_fg: "black".to_string(),
            marked: "magenta".to_string(),
            error: "red".to_string(),
            warning: "yellow".to_string(),
            success: "green".to_string(),
            info: "cyan".to_string(),
        }
    }

    /// `#rrggbb` or a named terminal color; anything else is white.
    pub fn parse_color(value: &str) -> Color {
        if let Some(hex) = value.strip_prefix('#')
            && hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        value.parse().unwrap_or(Color::White)
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn selected_bg(&self) -> Color { Self::parse_color(&self.selected_bg) }
    pub fn selected_fg(&self) -> Color { Self::parse_color(&self.selected_fg) }
    pub fn marked(&self) -> Color { Self::parse_color(&self.marked) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
    pub fn info(&self) -> Color { Self::parse_color(&self.info) }

    pub fn notice(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Success => self.success(),
            NoticeLevel::Info => self.info(),
            NoticeLevel::Warning => self.warning(),
            NoticeLevel::Error => self.error(),
        }
    }
}
