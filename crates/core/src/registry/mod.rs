//! Container type registry.
//!
//! Loaded once at start-up and shared read-only; it is passed explicitly to
//! every component that needs it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::Slot;

const DEFAULT_ICON: &str = "content-container";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read registry file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse registry: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("container type `{0}` registered twice")]
    DuplicateType(String),
}

/// One cell of a container grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridColumn {
    pub name: String,
    pub slot: Slot,
    /// Field restrictions for children of this slot, e.g. `recordType => "text,image"`.
    #[serde(default)]
    pub allowed: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerConfiguration {
    pub record_type: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Rows of columns.
    #[serde(default)]
    pub grid: Vec<Vec<GridColumn>>,
    #[serde(default = "default_true")]
    pub register_in_wizard: bool,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_true() -> bool {
    true
}

impl ContainerConfiguration {
    pub fn new(record_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            label: label.into(),
            description: String::new(),
            icon: default_icon(),
            grid: Vec::new(),
            register_in_wizard: true,
        }
    }

    pub fn with_row(mut self, row: Vec<GridColumn>) -> Self {
        self.grid.push(row);
        self
    }

    fn columns(&self) -> impl Iterator<Item = &GridColumn> {
        self.grid.iter().flatten()
    }
}

impl GridColumn {
    pub fn new(name: impl Into<String>, slot: Slot) -> Self {
        Self {
            name: name.into(),
            slot,
            allowed: BTreeMap::new(),
        }
    }

    pub fn allow(mut self, field: impl Into<String>, values: impl Into<String>) -> Self {
        self.allowed.insert(field.into(), values.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    containers: Vec<ContainerConfiguration>,
}

#[derive(Debug, Clone, Default)]
pub struct ContainerRegistry {
    containers: BTreeMap<String, ContainerConfiguration>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `{"containers": [...]}` document.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for configuration in file.containers {
            registry.register(configuration)?;
        }
        Ok(registry)
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            types = registry.containers.len(),
            "Container registry loaded"
        );
        Ok(registry)
    }

    pub fn register(&mut self, configuration: ContainerConfiguration) -> Result<(), RegistryError> {
        if self.containers.contains_key(&configuration.record_type) {
            return Err(RegistryError::DuplicateType(configuration.record_type));
        }
        self.containers
            .insert(configuration.record_type.clone(), configuration);
        Ok(())
    }

    pub fn configuration(&self, record_type: &str) -> Option<&ContainerConfiguration> {
        self.containers.get(record_type)
    }

    pub fn is_container_element(&self, record_type: &str) -> bool {
        self.containers.contains_key(record_type)
    }

    pub fn registered_types(&self) -> Vec<&str> {
        self.containers.keys().map(String::as_str).collect()
    }

    pub fn grid(&self, record_type: &str) -> &[Vec<GridColumn>] {
        self.configuration(record_type)
            .map(|configuration| configuration.grid.as_slice())
            .unwrap_or_default()
    }

    /// Columns of one container type, row by row.
    pub fn available_columns(&self, record_type: &str) -> Vec<&GridColumn> {
        self.configuration(record_type)
            .map(|configuration| configuration.columns().collect())
            .unwrap_or_default()
    }

    pub fn all_available_columns(&self) -> Vec<&GridColumn> {
        self.containers
            .values()
            .flat_map(ContainerConfiguration::columns)
            .collect()
    }

    /// Restrictions for children placed in `slot`. The last matching column wins.
    pub fn allowed_configuration(&self, record_type: &str, slot: Slot) -> BTreeMap<String, String> {
        self.available_columns(record_type)
            .into_iter()
            .filter(|column| column.slot == slot)
            .last()
            .map(|column| column.allowed.clone())
            .unwrap_or_default()
    }

    pub fn is_valid_slot(&self, record_type: &str, slot: Slot) -> bool {
        self.available_columns(record_type)
            .iter()
            .any(|column| column.slot == slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ContainerRegistry {
        let mut registry = ContainerRegistry::new();
        registry
            .register(
                ContainerConfiguration::new("two-columns", "Two columns")
                    .with_row(vec![
                        GridColumn::new("left", 200).allow("recordType", "text,image"),
                        GridColumn::new("right", 201),
                    ]),
            )
            .unwrap();
        registry
            .register(
                ContainerConfiguration::new("stage", "Stage")
                    .with_row(vec![GridColumn::new("main", 300)])
                    .with_row(vec![GridColumn::new("footer", 301)]),
            )
            .unwrap();
        registry
    }

    #[test]
    fn known_types_are_containers() {
        let registry = registry();
        assert!(registry.is_container_element("two-columns"));
        assert!(!registry.is_container_element("text"));
        assert_eq!(registry.registered_types(), vec!["stage", "two-columns"]);
    }

    #[test]
    fn slots_come_from_the_grid() {
        let registry = registry();
        assert!(registry.is_valid_slot("two-columns", 201));
        assert!(!registry.is_valid_slot("two-columns", 300));
        assert!(!registry.is_valid_slot("text", 200));
        assert_eq!(registry.available_columns("stage").len(), 2);
        assert_eq!(registry.all_available_columns().len(), 4);
        assert!(registry.grid("unknown").is_empty());
    }

    #[test]
    fn allowed_configuration_per_slot() {
        let registry = registry();
        let allowed = registry.allowed_configuration("two-columns", 200);
        assert_eq!(allowed.get("recordType").map(String::as_str), Some("text,image"));
        assert!(registry.allowed_configuration("two-columns", 201).is_empty());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = registry();
        let err = registry
            .register(ContainerConfiguration::new("stage", "Stage again"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType(t) if t == "stage"));
    }

    #[test]
    fn parse_registry_document() {
        let registry = ContainerRegistry::from_json(
            r#"{
                "containers": [{
                    "recordType": "two-columns",
                    "label": "Two columns",
                    "grid": [[{ "name": "left", "slot": 1 }, { "name": "right", "slot": 2 }]]
                }]
            }"#,
        )
        .unwrap();

        let configuration = registry.configuration("two-columns").unwrap();
        assert_eq!(configuration.icon, DEFAULT_ICON);
        assert!(configuration.register_in_wizard);
        assert!(registry.is_valid_slot("two-columns", 2));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = ContainerRegistry::from_json("{\"containers\": 3}").unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }
}
