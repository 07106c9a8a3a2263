use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::columns::{OutputColumn, parse_columns};
use crate::consts::{DEFAULT_NAME_PREFIX, MAX_MATCHED_REGIONS_LEN};
use crate::errors::UserError;
use crate::policy::{ExtractionPolicy, PolicyRegistry};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RecordClassAssignment {
    pub name: String,
    pub policy: ExtractionPolicy,
}

///
/// Settings of a span composition. Every field has a default, so an empty TOML file is valid.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ComposeConfig {
    /// Prefix of staged set names.
    pub name_prefix: String,
    pub max_matched_regions_len: usize,
    /// Also emit output features that matched nothing.
    pub include_unmatched: bool,
    /// Stage both sides at the same time.
    pub parallel_staging: bool,
    /// Policy for record classes with no assignment; unset rejects them.
    pub default_policy: Option<ExtractionPolicy>,
    /// Assignments added to (or overriding) the built-in ones.
    pub record_classes: Vec<RecordClassAssignment>,
    pub columns: Option<Vec<String>>,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        ComposeConfig {
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            max_matched_regions_len: MAX_MATCHED_REGIONS_LEN,
            include_unmatched: false,
            parallel_staging: true,
            default_policy: None,
            record_classes: Vec::new(),
            columns: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl TryFrom<&Path> for ComposeConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}

impl ComposeConfig {
    /// Built-in record class assignments plus the configured ones.
    pub fn policy_registry(&self) -> PolicyRegistry {
        let mut registry = PolicyRegistry::default();
        for assignment in &self.record_classes {
            registry.assign(&assignment.name, assignment.policy);
        }
        registry.set_default_policy(self.default_policy);
        registry
    }

    /// The configured column order, or every column in the default order.
    pub fn default_columns(&self) -> Result<Vec<OutputColumn>, UserError> {
        match &self.columns {
            Some(names) => parse_columns(names),
            None => Ok(OutputColumn::ALL.to_vec()),
        }
    }
}
