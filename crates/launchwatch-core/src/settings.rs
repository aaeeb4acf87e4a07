//! Extractor settings: the category table and text-parser marker phrases.
//!
//! The bullet-list markers recognized by the text parser ("Products Found:",
//! note prefixes like "All products are") are artifacts of one upstream
//! model's response style. A different model phrases equivalent output
//! differently, so all of these live in a settings file rather than in code.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One product category plus the lowercase keywords that map free text to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// On-disk shape of `config/categories.yaml`. Every section is optional;
/// omitted sections fall back to the built-in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub product_list_markers: Vec<String>,
    #[serde(default)]
    pub note_prefixes: Vec<String>,
}

/// Resolved settings consumed by the extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    /// Enumerated category set; anything unmatched maps to [`Self::FALLBACK_CATEGORY`].
    pub categories: Vec<CategoryConfig>,
    /// Lines containing one of these phrases open the product section of a
    /// bullet-list result.
    pub product_list_markers: Vec<String>,
    /// Lines starting with one of these phrases open the trailing note
    /// section of a bullet-list result.
    pub note_prefixes: Vec<String>,
}

impl ExtractorSettings {
    pub const FALLBACK_CATEGORY: &'static str = "Other";

    /// Picks the first configured category whose keyword list matches the
    /// given text (case-insensitive substring match), or the fallback.
    #[must_use]
    pub fn categorize(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        for category in &self.categories {
            if category
                .keywords
                .iter()
                .any(|kw| !kw.is_empty() && lower.contains(kw.as_str()))
            {
                return category.name.clone();
            }
        }
        Self::FALLBACK_CATEGORY.to_string()
    }
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        let cat = |name: &str, keywords: &[&str]| CategoryConfig {
            name: name.to_string(),
            keywords: keywords.iter().map(|s| (*s).to_string()).collect(),
        };
        Self {
            categories: vec![
                cat(
                    "Text Generation",
                    &["text", "writing", "copywriting", "chatbot", "llm", "summariz"],
                ),
                cat(
                    "Image Generation",
                    &["image", "photo", "picture", "avatar", "art generat"],
                ),
                cat(
                    "Audio Generation",
                    &["audio", "music", "voice", "speech", "podcast", "sound"],
                ),
                cat(
                    "Social/Entertainment",
                    &["social", "meme", "game", "entertainment", "video"],
                ),
                cat(
                    "Productivity",
                    &[
                        "productivity",
                        "email",
                        "workflow",
                        "assistant",
                        "calendar",
                        "note-taking",
                        "automation",
                    ],
                ),
                cat("Design", &["design", "logo", "prototyp", "figma"]),
                cat(
                    "DevOps",
                    &["coding", "developer", "deploy", "devops", "infrastructure"],
                ),
            ],
            product_list_markers: vec!["Products Found:".to_string(), "Here are".to_string()],
            note_prefixes: vec![
                "All products are".to_string(),
                "The search was".to_string(),
            ],
        }
    }
}

/// Load extractor settings from a YAML file, overlaying the defaults.
///
/// Sections present in the file replace the corresponding defaults wholesale;
/// absent sections keep them.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_settings(path: &Path) -> Result<ExtractorSettings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SettingsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: SettingsFile = serde_yaml::from_str(&content)?;
    let settings = merge_settings(file);
    validate_settings(&settings)?;
    Ok(settings)
}

fn merge_settings(file: SettingsFile) -> ExtractorSettings {
    let defaults = ExtractorSettings::default();
    ExtractorSettings {
        categories: if file.categories.is_empty() {
            defaults.categories
        } else {
            file.categories
        },
        product_list_markers: if file.product_list_markers.is_empty() {
            defaults.product_list_markers
        } else {
            file.product_list_markers
        },
        note_prefixes: if file.note_prefixes.is_empty() {
            defaults.note_prefixes
        } else {
            file.note_prefixes
        },
    }
}

fn validate_settings(settings: &ExtractorSettings) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for category in &settings.categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(category.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category name: '{}'",
                category.name
            )));
        }
    }
    if settings
        .product_list_markers
        .iter()
        .any(|m| m.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "product list markers must be non-empty".to_string(),
        ));
    }
    Ok(())
}
