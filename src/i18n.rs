//! Localized UI labels.
//!
//! The gallery and menu never hard-code user-visible text; they read it from a
//! [`Labels`] table for the active language. Built-in English and Finnish
//! tables ship with the crate, and a `labels.toml` file can override
//! individual keys per language:
//!
//! ```toml
//! [en]
//! client = "Client"
//!
//! [fi]
//! share = "Jaa"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::Language;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// All user-visible labels for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub client: String,
    pub project_type: String,
    pub tools: String,
    pub close: String,
    pub share: String,
    pub copied: String,
    pub back_to_projects: String,
    pub previous_image: String,
    pub next_image: String,
    pub close_fullscreen: String,
    /// `{n}` is replaced with the 1-based slide number.
    pub go_to_slide: String,
    /// `{n}` is replaced with the 1-based slide number.
    pub image_alt: String,
    pub no_images: String,
    pub image_unavailable: String,
    pub menu_open: String,
    pub menu_close: String,
    pub theme_toggle: String,
    pub filter_all: String,
}

impl Labels {
    pub fn builtin(lang: Language) -> Self {
        match lang {
            Language::En => Self {
                client: "Client Name".into(),
                project_type: "Project Type".into(),
                tools: "Tools Used".into(),
                close: "Close modal".into(),
                share: "Share project".into(),
                copied: "Link copied".into(),
                back_to_projects: "Back to projects".into(),
                previous_image: "Previous image".into(),
                next_image: "Next image".into(),
                close_fullscreen: "Close fullscreen".into(),
                go_to_slide: "Go to slide {n}".into(),
                image_alt: "Project image {n}".into(),
                no_images: "No images available".into(),
                image_unavailable: "Image unavailable".into(),
                menu_open: "Open menu".into(),
                menu_close: "Close menu".into(),
                theme_toggle: "Switch theme".into(),
                filter_all: "All".into(),
            },
            Language::Fi => Self {
                client: "Asiakas".into(),
                project_type: "Projektin tyyppi".into(),
                tools: "Työkalut".into(),
                close: "Sulje modaali".into(),
                share: "Jaa projekti".into(),
                copied: "Linkki kopioitu".into(),
                back_to_projects: "Takaisin projekteihin".into(),
                previous_image: "Edellinen kuva".into(),
                next_image: "Seuraava kuva".into(),
                close_fullscreen: "Sulje koko näyttö".into(),
                go_to_slide: "Siirry kuvaan {n}".into(),
                image_alt: "Projektin kuva {n}".into(),
                no_images: "Ei kuvia saatavilla".into(),
                image_unavailable: "Kuva ei saatavilla".into(),
                menu_open: "Avaa valikko".into(),
                menu_close: "Sulje valikko".into(),
                theme_toggle: "Vaihda teemaa".into(),
                filter_all: "Kaikki".into(),
            },
        }
    }

    /// Built-in labels with the overrides from `path` applied for `lang`.
    pub fn load_overrides(path: &Path, lang: Language) -> Result<Self, LabelsError> {
        let content = fs::read_to_string(path)?;
        let file: LabelsFile = toml::from_str(&content)?;
        let mut labels = Self::builtin(lang);
        let overrides = match lang {
            Language::En => file.en,
            Language::Fi => file.fi,
        };
        if let Some(overrides) = overrides {
            labels.apply(overrides);
        }
        Ok(labels)
    }

    /// Alt text for slide `index` (0-based) when the image has no caption.
    pub fn slide_alt(&self, index: usize) -> String {
        self.image_alt.replace("{n}", &(index + 1).to_string())
    }

    pub fn slide_button(&self, index: usize) -> String {
        self.go_to_slide.replace("{n}", &(index + 1).to_string())
    }

    fn apply(&mut self, o: LabelOverrides) {
        let fields = [
            (&mut self.client, o.client),
            (&mut self.project_type, o.project_type),
            (&mut self.tools, o.tools),
            (&mut self.close, o.close),
            (&mut self.share, o.share),
            (&mut self.copied, o.copied),
            (&mut self.back_to_projects, o.back_to_projects),
            (&mut self.previous_image, o.previous_image),
            (&mut self.next_image, o.next_image),
            (&mut self.close_fullscreen, o.close_fullscreen),
            (&mut self.go_to_slide, o.go_to_slide),
            (&mut self.image_alt, o.image_alt),
            (&mut self.no_images, o.no_images),
            (&mut self.image_unavailable, o.image_unavailable),
            (&mut self.menu_open, o.menu_open),
            (&mut self.menu_close, o.menu_close),
            (&mut self.theme_toggle, o.theme_toggle),
            (&mut self.filter_all, o.filter_all),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LabelsFile {
    en: Option<LabelOverrides>,
    fi: Option<LabelOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LabelOverrides {
    client: Option<String>,
    project_type: Option<String>,
    tools: Option<String>,
    close: Option<String>,
    share: Option<String>,
    copied: Option<String>,
    back_to_projects: Option<String>,
    previous_image: Option<String>,
    next_image: Option<String>,
    close_fullscreen: Option<String>,
    go_to_slide: Option<String>,
    image_alt: Option<String>,
    no_images: Option<String>,
    image_unavailable: Option<String>,
    menu_open: Option<String>,
    menu_close: Option<String>,
    theme_toggle: Option<String>,
    filter_all: Option<String>,
}
