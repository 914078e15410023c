//! Registry of created schemas.

use uuid::Uuid;

use crate::error::SchemaError;
use crate::types::Schema;

/// Schemas in creation order, looked up by id.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: Vec<Schema>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema and return a reference to the stored copy.
    ///
    /// Schemas are immutable once registered, so adding a second schema with the same id fails.
    pub fn add(&mut self, schema: Schema) -> Result<&Schema, SchemaError> {
        if self.get(schema.id).is_some() {
            return Err(SchemaError::DuplicateId { id: schema.id });
        }
        self.schemas.push(schema);
        Ok(&self.schemas[self.schemas.len() - 1])
    }

    pub fn get(&self, id: Uuid) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.id == id)
    }

    /// First schema with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
