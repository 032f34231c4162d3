//! Light and dark terminal palettes

use colored::{Color, ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual theme; affects colors only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Colors used by one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub heading: Color,
    pub accent: Color,
    pub card_fg: Color,
    pub card_bg: Color,
}

const LIGHT: Palette = Palette {
    text: Color::TrueColor { r: 10, g: 61, b: 98 },
    heading: Color::TrueColor { r: 10, g: 61, b: 98 },
    accent: Color::TrueColor { r: 0, g: 123, b: 255 },
    card_fg: Color::TrueColor { r: 10, g: 61, b: 98 },
    card_bg: Color::TrueColor { r: 244, g: 249, b: 255 },
};

const DARK: Palette = Palette {
    text: Color::White,
    heading: Color::BrightWhite,
    accent: Color::TrueColor { r: 0, g: 123, b: 255 },
    card_fg: Color::White,
    card_bg: Color::TrueColor { r: 14, g: 17, b: 23 },
};

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn text(self, s: &str) -> ColoredString {
        s.color(self.palette().text)
    }

    pub fn heading(self, s: &str) -> ColoredString {
        s.color(self.palette().heading).bold()
    }

    pub fn accent(self, s: &str) -> ColoredString {
        s.color(self.palette().accent)
    }

    pub fn card(self, s: &str) -> ColoredString {
        let palette = self.palette();
        s.color(palette.card_fg).on_color(palette.card_bg)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}' (expected light or dark)", other)),
        }
    }
}
