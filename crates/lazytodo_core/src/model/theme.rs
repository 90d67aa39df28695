//! Light/dark theme values.
//!
//! The stored preference is a tri-state: `None` means the user never made an
//! explicit choice, `Some(true)` means dark.

use std::fmt::{Display, Formatter};

/// Rendered color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

/// Explicit user choice, `Some(true)` meaning dark.
pub type ThemePreference = Option<bool>;

impl Theme {
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Icon shown on the toggle button; it advertises the other theme.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Light => "moon",
            Self::Dark => "sun",
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn toggled_flips_and_icon_points_to_other_theme() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.icon(), "sun");
        assert_eq!(Theme::Light.icon(), "moon");
        assert!(Theme::from_dark(true).is_dark());
    }
}
