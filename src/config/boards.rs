use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const DEFAULT_BOARDS: &str = include_str!("../../config/boards.yml");

/// A section of a board: a heading and the apps placed under it, in order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SectionDefinition {
    pub name: String,
    #[serde(default)]
    pub apps: Vec<String>,
}

/// Everything the two board seeders place.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BoardDefinitions {
    /// Sections of the primary board, top to bottom.
    pub homelab: Vec<SectionDefinition>,
    /// The single section of the Infrastructure board.
    pub infrastructure: SectionDefinition,
}

impl BoardDefinitions {
    /// Definitions compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(DEFAULT_BOARDS).context("Invalid built-in board definitions")
    }

    /// Load from a YAML file, or fall back to the built-in definitions.
    pub fn load(maybe_path: Option<&str>) -> Result<Self> {
        match maybe_path {
            Some(path) => {
                let yml = std::fs::read_to_string(path)
                    .with_context(|| format!("Could not read board definitions from {}", path))?;
                Self::from_yaml(&yml).with_context(|| format!("Invalid board definitions in {}", path))
            }
            None => Self::builtin(),
        }
    }

    pub fn from_yaml(yml: &str) -> Result<Self> {
        let definitions: BoardDefinitions = serde_yaml::from_str(yml)?;
        definitions.validate()?;
        Ok(definitions)
    }

    fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for section in &self.homelab {
            if section.name.trim().is_empty() {
                anyhow::bail!("Section name must not be empty");
            }
            if !names.insert(section.name.as_str()) {
                anyhow::bail!("Duplicate section: {}", section.name);
            }
        }
        if self.infrastructure.name.trim().is_empty() {
            anyhow::bail!("Infrastructure section name must not be empty");
        }
        if self.infrastructure.apps.is_empty() {
            anyhow::bail!("Infrastructure section must list at least one app");
        }
        Ok(())
    }
}
