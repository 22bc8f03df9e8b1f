//! Shared types used across the catalog, viewer, and rendering modules.
//!
//! `Project` and `ImageAsset` are the resolved, single-language view of a
//! catalog entry. They are immutable once built; the viewer only ever holds a
//! shared reference to the selected project.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Site language. English is the fallback for every localized field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fi,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fi => "fi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "fi" => Ok(Language::Fi),
            other => Err(format!("unsupported language '{other}' (expected en or fi)")),
        }
    }
}

/// Light/dark color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Initial theme: a saved preference wins, otherwise follow the system.
    pub fn resolve(saved: Option<Theme>, prefers_dark: bool) -> Theme {
        match saved {
            Some(theme) => theme,
            None if prefers_dark => Theme::Dark,
            None => Theme::Light,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unsupported theme '{other}' (expected light or dark)")),
        }
    }
}

/// A string with an English value and an optional Finnish translation.
///
/// Deserializes from either a bare string (English only) or a table:
///
/// ```json
/// "Final Logo Design"
/// { "en": "Final Logo Design", "fi": "Lopullinen logosuunnitelma" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Translated {
        en: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fi: Option<String>,
    },
}

impl LocalizedText {
    pub fn get(&self, lang: Language) -> &str {
        match (self, lang) {
            (LocalizedText::Plain(text), _) => text,
            (LocalizedText::Translated { fi: Some(fi), .. }, Language::Fi) => fi,
            (LocalizedText::Translated { en, .. }, _) => en,
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        LocalizedText::Plain(text.to_string())
    }
}

/// One image of a project gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A project as shown in the works grid and the gallery modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    /// Markdown source.
    pub description: String,
    /// Ordered gallery. May be empty.
    pub images: Vec<ImageAsset>,
    pub cover_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
}

impl Project {
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}
