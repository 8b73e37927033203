use std::collections::HashMap;

use crate::{ModelError, ModelResult, ReferenceSpec, TypeSchema};

/// Naming facts about one object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSummary {
    pub name: String,
    pub plural_name: String,
    pub unique_key: Option<String>,
}

/// Immutable per-run context: every known object type and the reference
/// specs derived from its schema.
///
/// Built once from the store's schemas and passed by reference to every
/// stage that needs type lookups.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    types: HashMap<String, TypeSummary>,
    /// Plural name -> singular name.
    plurals: HashMap<String, String>,
    references: HashMap<String, Vec<ReferenceSpec>>,
}

impl SchemaCatalog {
    pub fn new(schemas: &[TypeSchema]) -> Self {
        let mut catalog = Self::default();
        for schema in schemas {
            catalog.insert(schema);
        }
        catalog
    }

    fn insert(&mut self, schema: &TypeSchema) {
        self.types.insert(
            schema.name.clone(),
            TypeSummary {
                name: schema.name.clone(),
                plural_name: schema.plural_name.clone(),
                unique_key: schema.unique_key.clone(),
            },
        );
        self.plurals
            .insert(schema.plural_name.clone(), schema.name.clone());
        self.references
            .insert(schema.name.clone(), schema.reference_specs());
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TypeSummary> {
        self.types.get(name)
    }

    /// Looks up a type by its plural (collection) name.
    pub fn by_plural(&self, plural_name: &str) -> Option<&TypeSummary> {
        self.plurals
            .get(plural_name)
            .and_then(|name| self.types.get(name))
    }

    pub fn plural_of(&self, name: &str) -> ModelResult<&str> {
        self.get(name)
            .map(|t| t.plural_name.as_str())
            .ok_or_else(|| ModelError::UnknownObject(name.to_string()))
    }

    /// The unique key field of a type. `Ok(None)` if the type declares none.
    pub fn unique_key(&self, name: &str) -> ModelResult<Option<&str>> {
        self.get(name)
            .map(|t| t.unique_key.as_deref())
            .ok_or_else(|| ModelError::UnknownObject(name.to_string()))
    }

    /// Reference specs of a type; empty for unknown types and types without
    /// references.
    pub fn reference_specs(&self, name: &str) -> &[ReferenceSpec] {
        self.references.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
