use super::standard::STANDARD_TEMPLATES;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Intra-residue bonds of one residue type, as pairs of atom names.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ResidueTemplate {
    pub bonds: Vec<[String; 2]>,
}

/// Residue connectivity templates keyed by residue name.
///
/// User tables are TOML files with one table per residue:
///
/// ```toml
/// [LIG]
/// bonds = [["C1", "C2"], ["C2", "O1"]]
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectivityRegistry {
    registry: HashMap<String, ResidueTemplate>,
}

static STANDARD: OnceLock<Arc<ConnectivityRegistry>> = OnceLock::new();

impl ConnectivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table for standard amino acids and nucleotides, shared by
    /// every reader that is not given a custom registry.
    pub fn standard() -> Arc<ConnectivityRegistry> {
        STANDARD
            .get_or_init(|| {
                let registry = STANDARD_TEMPLATES
                    .entries()
                    .map(|(name, bonds)| {
                        let bonds = bonds
                            .iter()
                            .map(|(a, b)| [a.to_string(), b.to_string()])
                            .collect();
                        (name.to_string(), ResidueTemplate { bonds })
                    })
                    .collect();
                Arc::new(Self { registry })
            })
            .clone()
    }

    pub fn load(path: &Path) -> Result<Self, TemplateLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TemplateLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|source| match source {
            TemplateLoadError::Toml { source, .. } => TemplateLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, TemplateLoadError> {
        let registry: HashMap<String, ResidueTemplate> =
            toml::from_str(content).map_err(|e| TemplateLoadError::Toml {
                path: "<string>".to_string(),
                source: e,
            })?;
        Ok(Self { registry })
    }

    /// Adds every template of `other`, replacing templates with the same
    /// residue name.
    pub fn merge(&mut self, other: ConnectivityRegistry) {
        self.registry.extend(other.registry);
    }

    pub fn insert(&mut self, residue_name: &str, template: ResidueTemplate) {
        self.registry.insert(residue_name.to_string(), template);
    }

    pub fn get(&self, residue_name: &str) -> Option<&ResidueTemplate> {
        self.registry.get(residue_name)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum TemplateLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}
