//! Project catalog loading and per-language resolution.
//!
//! The catalog is a single JSON file holding every project with its localized
//! fields side by side. It is loaded once and stays immutable; callers ask for
//! a resolved [`Project`] list in one language.
//!
//! ```json
//! {
//!   "projects": [
//!     {
//!       "id": "1",
//!       "title": { "en": "Brand Identity Design", "fi": "Brändi-identiteetin Suunnittelu" },
//!       "description": { "en": "A complete brand overhaul..." },
//!       "images": [
//!         { "url": "logo.svg", "caption": { "en": "Final Logo Design" } }
//!       ],
//!       "cover_image": "logo.svg",
//!       "client": "Nordic Tech Solutions",
//!       "project_type": { "en": "Branding & Identity", "fi": "Brändäys & Identiteetti" },
//!       "tools": ["Illustrator", "Photoshop"]
//!     }
//!   ]
//! }
//! ```
//!
//! Missing Finnish strings fall back to English. An empty `images` array is
//! valid; the viewer handles it.

use crate::types::{ImageAsset, Language, LocalizedText, Project};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate project id: {0}")]
    DuplicateId(String),
    #[error("Project {0} has an empty id")]
    EmptyId(usize),
}

/// On-disk catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    pub projects: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
    pub cover_image: String,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub project_type: Option<LocalizedText>,
    #[serde(default)]
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogImage {
    pub url: String,
    #[serde(default)]
    pub caption: Option<LocalizedText>,
}

impl CatalogEntry {
    pub fn resolve(&self, lang: Language) -> Project {
        Project {
            id: self.id.clone(),
            title: self.title.get(lang).to_string(),
            description: self.description.get(lang).to_string(),
            images: self
                .images
                .iter()
                .map(|image| ImageAsset {
                    url: image.url.clone(),
                    caption: image.caption.as_ref().map(|c| c.get(lang).to_string()),
                })
                .collect(),
            cover_image: self.cover_image.clone(),
            client: self.client.clone(),
            project_type: self.project_type.as_ref().map(|t| t.get(lang).to_string()),
            tools: self.tools.clone(),
        }
    }
}

impl Catalog {
    /// Parse and validate a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject empty and duplicate ids.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for (idx, entry) in self.projects.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(idx));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(())
    }

    /// All projects resolved for `lang`, in catalog order.
    pub fn projects(&self, lang: Language) -> Vec<Project> {
        self.projects.iter().map(|e| e.resolve(lang)).collect()
    }

    pub fn find(&self, id: &str, lang: Language) -> Option<Project> {
        self.projects
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.resolve(lang))
    }

    /// Distinct project types in first-seen order, for the works filter.
    pub fn project_types(&self, lang: Language) -> Vec<String> {
        let mut seen = HashSet::new();
        self.projects
            .iter()
            .filter_map(|e| e.project_type.as_ref())
            .map(|t| t.get(lang).to_string())
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }
}

/// Load the catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = fs::read_to_string(path)?;
    Catalog::from_json(&content)
}

/// Keep projects of one type; `None` is the "All" filter.
pub fn filter_by_type<'a>(projects: &'a [Project], project_type: Option<&str>) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| match project_type {
            None => true,
            Some(wanted) => p.project_type.as_deref() == Some(wanted),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{
        "projects": [
            {
                "id": "1",
                "title": { "en": "Brand Identity Design", "fi": "Brändi-identiteetin Suunnittelu" },
                "description": "A complete brand overhaul.",
                "images": [
                    { "url": "logo.svg", "caption": { "en": "Final Logo Design", "fi": "Lopullinen logosuunnitelma" } },
                    { "url": "styleguide.png" }
                ],
                "cover_image": "logo.svg",
                "client": "Nordic Tech Solutions",
                "project_type": { "en": "Branding & Identity", "fi": "Brändäys & Identiteetti" },
                "tools": ["Illustrator", "Photoshop"]
            },
            {
                "id": "2",
                "title": "Julia 1&2 Website",
                "description": "Cinema website.",
                "cover_image": "julia.png",
                "project_type": { "en": "Web Design" }
            },
            {
                "id": "3",
                "title": "Logo refresh",
                "description": "Second branding job.",
                "cover_image": "refresh.png",
                "project_type": { "en": "Branding & Identity", "fi": "Brändäys & Identiteetti" }
            }
        ]
    }"#;

    #[test]
    fn resolves_finnish_fields_with_english_fallback() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let projects = catalog.projects(Language::Fi);

        assert_eq!(projects[0].title, "Brändi-identiteetin Suunnittelu");
        assert_eq!(
            projects[0].images[0].caption.as_deref(),
            Some("Lopullinen logosuunnitelma")
        );
        assert_eq!(projects[0].images[1].caption, None);
        assert_eq!(projects[1].title, "Julia 1&2 Website");
        assert_eq!(projects[1].project_type.as_deref(), Some("Web Design"));
    }

    #[test]
    fn missing_images_is_an_empty_gallery() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let project = catalog.find("2", Language::En).unwrap();
        assert!(project.images.is_empty());
    }

    #[test]
    fn find_unknown_id_is_none() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert!(catalog.find("99", Language::En).is_none());
    }

    #[test]
    fn project_types_are_distinct_in_catalog_order() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(
            catalog.project_types(Language::En),
            vec!["Branding & Identity".to_string(), "Web Design".to_string()]
        );
    }

    #[test]
    fn filter_by_type_none_keeps_everything() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let projects = catalog.projects(Language::En);

        assert_eq!(filter_by_type(&projects, None).len(), 3);
        let branding = filter_by_type(&projects, Some("Branding & Identity"));
        let ids: Vec<&str> = branding.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{"projects": [
            {"id": "a", "title": "A", "description": "", "cover_image": "a.png"},
            {"id": "a", "title": "B", "description": "", "cover_image": "b.png"}
        ]}"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let json = r#"{"projects": [
            {"id": "a", "title": "A", "description": "", "cover_image": "a.png", "colour": "red"}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn load_catalog_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("catalog.json");
        fs::write(&path, CATALOG).unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.projects.len(), 3);
    }

    #[test]
    fn load_catalog_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_catalog(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
