use crate::core::{KeyValueStore, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const THEME_KEY: &str = "xfuse_theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

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
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

pub struct ThemePreference<K: KeyValueStore> {
    storage: K,
}

impl<K: KeyValueStore> ThemePreference<K> {
    pub fn new(storage: K) -> Self {
        Self { storage }
    }

    /// 未設定或值無法辨識時預設為深色
    pub async fn current(&self) -> Result<Theme> {
        let saved = self.storage.get(THEME_KEY).await?;
        Ok(saved
            .and_then(|value| value.parse().ok())
            .unwrap_or_default())
    }

    pub async fn set(&self, theme: Theme) -> Result<()> {
        tracing::debug!("Theme set to {}", theme);
        self.storage.set(THEME_KEY, theme.as_str()).await
    }

    pub async fn toggle(&self) -> Result<Theme> {
        let next = self.current().await?.toggled();
        self.set(next).await?;
        Ok(next)
    }
}
