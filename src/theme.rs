//! Light and dark themes
//!
//! Themes only change how things look. No behaviour of this crate depends on them.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use csscolorparser::Color;

/// What the user asked for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSetting {
    Light,
    Dark,
    /// Follow the color scheme reported by the platform
    System,
}

impl Default for ThemeSetting {
    fn default() -> Self {
        ThemeSetting::System
    }
}

impl FromStr for ThemeSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeSetting::Light),
            "dark" => Ok(ThemeSetting::Dark),
            "system" => Ok(ThemeSetting::System),
            other => Err(format!("Unknown theme {:?} (expected light, dark or system)", other)),
        }
    }
}

impl Display for ThemeSetting {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeSetting::Light => write!(f, "light"),
            ThemeSetting::Dark => write!(f, "dark"),
            ThemeSetting::System => write!(f, "system"),
        }
    }
}

/// The theme things are actually drawn with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }
}

/// The theme information that is passed to every screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeContext {
    pub setting: ThemeSetting,
    /// The color scheme reported by the platform, if it reports one
    pub system: Option<Theme>,
}

impl ThemeContext {
    pub fn new(setting: ThemeSetting, system: Option<Theme>) -> Self {
        Self { setting, system }
    }

    /// Use the process-wide setting (see [`crate::config::set_theme_setting`])
    pub fn current(system: Option<Theme>) -> Self {
        Self::new(crate::config::theme_setting(), system)
    }

    /// The theme to draw with. `System` falls back to the light theme when the platform reports nothing.
    pub fn effective(&self) -> Theme {
        match self.setting {
            ThemeSetting::Light => Theme::Light,
            ThemeSetting::Dark => Theme::Dark,
            ThemeSetting::System => self.system.unwrap_or(Theme::Light),
        }
    }
}


/// Colors of an input-like element (the due date label, text inputs...)
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub border: Color,
    pub text: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: color("#333"),
                border: color("#555"),
                text: color("white"),
            },
            Theme::Light => Self {
                background: color("#f0f0f0"),
                border: color("#ccc"),
                text: color("#000"),
            },
        }
    }
}

fn color(css: &str) -> Color {
    match csscolorparser::parse(css) {
        Ok(c) => c,
        Err(err) => {
            log::warn!("Invalid color {:?} ({}), using black instead", css, err);
            Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }
        },
    }
}
