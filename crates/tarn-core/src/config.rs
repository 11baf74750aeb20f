use std::path::Path;

use serde::{Deserialize, Serialize};
use tarn_util::errors::TarnResult;

use crate::version::{LexicalComparator, MavenComparator, SemverComparator, VersionComparator};

/// Resolver configuration, usually loaded from a `tarn.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Emit per-set update traces during resolution.
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub versioning: VersioningConfig,

    #[serde(default)]
    pub selection: SelectionConfig,
}

/// Version ordering settings from `[versioning]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersioningConfig {
    #[serde(default)]
    pub scheme: VersionScheme,
}

/// Selection settings from `[selection]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionConfig {
    #[serde(default)]
    pub prefer: Preference,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionScheme {
    #[default]
    Maven,
    Semver,
    Lexical,
}

/// Which end of the version order a singleton selection favours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    #[default]
    Highest,
    Lowest,
}

impl VersionScheme {
    pub fn comparator(self) -> Box<dyn VersionComparator> {
        match self {
            VersionScheme::Maven => Box::new(MavenComparator),
            VersionScheme::Semver => Box::new(SemverComparator),
            VersionScheme::Lexical => Box::new(LexicalComparator),
        }
    }
}

impl ResolverConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> TarnResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file, or return defaults if it doesn't exist.
    pub fn load(path: &Path) -> TarnResult<Self> {
        if !path.is_file() {
            tracing::debug!("No resolver config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
