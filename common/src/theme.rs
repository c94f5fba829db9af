use serde::{Deserialize, Serialize};

use crate::storage::StorageScope;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// The site default.
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph on the toggle button: the theme you would switch to.
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// Saved theme, or light when nothing usable is stored.
pub fn load_theme<S: StorageScope>(scope: &S) -> Theme {
    match scope.get(THEME_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_default(),
        Ok(None) => Theme::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read theme preference");
            Theme::default()
        }
    }
}

pub fn save_theme<S: StorageScope>(scope: &S, theme: Theme) {
    if let Err(e) = scope.set(THEME_KEY, theme.as_str()) {
        tracing::warn!(error = %e, "failed to persist theme preference");
    }
}

/// Flip the saved theme and return the new one.
pub fn toggle_theme<S: StorageScope>(scope: &S) -> Theme {
    let next = load_theme(scope).toggled();
    save_theme(scope, next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryScope;

    #[test]
    fn test_defaults_to_light() {
        let scope = MemoryScope::new();
        assert_eq!(load_theme(&scope), Theme::Light);
        scope.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(load_theme(&scope), Theme::Light);
        assert_eq!("sepia".parse::<Theme>(), Err(UnknownTheme("sepia".into())));
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
    }

    #[test]
    fn test_toggle_persists() {
        let scope = MemoryScope::new();
        assert_eq!(toggle_theme(&scope), Theme::Dark);
        assert_eq!(scope.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(load_theme(&scope).icon(), "☀️");
        assert_eq!(toggle_theme(&scope), Theme::Light);
    }
}
