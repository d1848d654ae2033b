//! In-memory skill catalog.
//!
//! The catalog is loaded once per process and is read-only afterwards. Its
//! JSON shape is an object keyed by skill id:
//!
//! ```text
//! {
//!   "machine-learning": {
//!     "aliases": { "machine-learning": ["ML", "machine learning"] },
//!     "sources": [
//!       { "sourceName": "Github Topics", "displayName": "Machine Learning",
//!         "shortDescription": "...", "longDescription": "...", "url": "..." }
//!     ]
//!   }
//! }
//! ```
//!
//! `aliases` may also be a plain list of strings.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// One descriptive record of a skill, as published by some source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub id: String,
    pub aliases: Vec<String>,
    pub sources: Vec<Source>,
}

impl SkillEntry {
    pub fn new(id: impl Into<String>, aliases: Vec<String>, sources: Vec<Source>) -> Self {
        SkillEntry { id: id.into(), aliases, sources }
    }

    /// The entry in its `skills.json` shape: aliases keyed by the skill id,
    /// no top-level `id` field.
    pub fn to_catalog_json(&self) -> serde_json::Value {
        serde_json::json!({
            "aliases": { (self.id.as_str()): &self.aliases },
            "sources": &self.sources,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AliasField {
    List(Vec<String>),
    ById(BTreeMap<String, Vec<String>>),
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    aliases: Option<AliasField>,
    #[serde(default)]
    sources: Vec<Source>,
}

impl RawEntry {
    fn into_entry(self, id: String) -> SkillEntry {
        let aliases = match self.aliases {
            None => Vec::new(),
            Some(AliasField::List(list)) => list,
            Some(AliasField::ById(mut by_id)) => by_id.remove(&id).unwrap_or_default(),
        };
        SkillEntry { id, aliases, sources: self.sources }
    }
}

/// All known skills, keyed (and iterated) by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillCatalog {
    entries: BTreeMap<String, SkillEntry>,
}

impl SkillCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = SkillEntry>) -> Self {
        SkillCatalog { entries: entries.into_iter().map(|e| (e.id.clone(), e)).collect() }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, RawEntry> = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, RawEntry> = serde_json::from_reader(reader)?;
        Ok(Self::from_raw(raw))
    }

    /// Load a catalog from a `skills.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(std::io::BufReader::new(file))?;
        tracing::info!(path = %path.display(), skills = catalog.len(), "loaded skill catalog");
        Ok(catalog)
    }

    fn from_raw(raw: BTreeMap<String, RawEntry>) -> Self {
        SkillCatalog { entries: raw.into_iter().map(|(id, e)| (id.clone(), e.into_entry(id))).collect() }
    }

    pub fn get(&self, skill_id: &str) -> Option<&SkillEntry> {
        self.entries.get(skill_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
