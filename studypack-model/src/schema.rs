use serde::{Deserialize, Serialize};

/// Describes an object type's structure as declared by the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSchema {
    /// Singular type name (e.g., "c_task"); matches `Entity::object`.
    pub name: String,
    /// Plural collection name (e.g., "c_tasks") used for retrieval.
    pub plural_name: String,
    /// Field whose value is the portable manifest key for this type.
    #[serde(default)]
    pub unique_key: Option<String>,
    #[serde(default, rename = "properties")]
    pub fields: Vec<FieldDefinition>,
}

impl TypeSchema {
    pub fn new(name: &str, plural_name: &str, unique_key: &str) -> Self {
        Self {
            name: name.into(),
            plural_name: plural_name.into(),
            unique_key: Some(unique_key.into()),
            fields: Vec::new(),
        }
    }

    /// Adds a field, keeping declaration order.
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Derives the reference specs for this type.
    ///
    /// `Reference` fields, and `Identifier` fields that name a target type,
    /// become specs. `Document` fields are recursed into and only emitted when
    /// they contain at least one reference; the wrapper itself is never
    /// required, only the references inside it may be.
    pub fn reference_specs(&self) -> Vec<ReferenceSpec> {
        extract_specs(&self.fields)
    }
}

/// The kind of a schema field, as far as reference tracking cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Scalar,
    Reference,
    Identifier,
    Document,
}

impl FieldKind {
    /// Maps the store's property type name onto a field kind.
    pub fn from_store_type(type_name: &str) -> Self {
        match type_name {
            "Reference" => Self::Reference,
            "ObjectId" => Self::Identifier,
            "Document" => Self::Document,
            _ => Self::Scalar,
        }
    }
}

/// A single field of a [`TypeSchema`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "StoreProperty")]
pub struct FieldDefinition {
    pub name: String,
    pub kind: FieldKind,
    pub array: bool,
    /// Type the field points at. Only meaningful for references and ids.
    pub target_type: Option<String>,
    pub required: bool,
    /// Sub-fields of an embedded document. Empty for every other kind.
    pub nested_fields: Vec<FieldDefinition>,
}

impl FieldDefinition {
    fn simple(name: &str, kind: FieldKind, target_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            kind,
            array: false,
            target_type: target_type.map(Into::into),
            required: false,
            nested_fields: Vec::new(),
        }
    }

    /// Shorthand for a plain data field.
    pub fn scalar(name: &str) -> Self {
        Self::simple(name, FieldKind::Scalar, None)
    }

    /// Shorthand for a reference field pointing at `target`.
    pub fn reference(name: &str, target: &str) -> Self {
        Self::simple(name, FieldKind::Reference, Some(target))
    }

    /// Shorthand for a raw id field. Without a target it is not a reference.
    pub fn identifier(name: &str, target: Option<&str>) -> Self {
        Self::simple(name, FieldKind::Identifier, target)
    }

    /// Shorthand for an embedded document with the given sub-fields.
    pub fn document(name: &str, nested_fields: Vec<FieldDefinition>) -> Self {
        Self {
            nested_fields,
            ..Self::simple(name, FieldKind::Document, None)
        }
    }

    /// Marks the field as array-valued.
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Property layout as the store's object metadata returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreProperty {
    name: String,
    #[serde(rename = "type", default)]
    type_name: String,
    #[serde(default)]
    array: bool,
    #[serde(default)]
    source_object: Option<String>,
    #[serde(default)]
    validators: Vec<StoreValidator>,
    #[serde(default)]
    properties: Vec<StoreProperty>,
}

#[derive(Debug, Deserialize)]
struct StoreValidator {
    name: String,
}

impl From<StoreProperty> for FieldDefinition {
    fn from(prop: StoreProperty) -> Self {
        let required = prop.validators.iter().any(|v| v.name == "required");
        Self {
            name: prop.name,
            kind: FieldKind::from_store_type(&prop.type_name),
            array: prop.array,
            target_type: prop.source_object,
            required,
            nested_fields: prop.properties.into_iter().map(Into::into).collect(),
        }
    }
}

/// A schema-derived description of one reference-bearing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSpec {
    pub name: String,
    pub kind: FieldKind,
    pub array: bool,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    /// Specs for the references inside an embedded document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<ReferenceSpec>,
}

impl ReferenceSpec {
    fn leaf(field: &FieldDefinition) -> Self {
        Self {
            name: field.name.clone(),
            kind: field.kind,
            array: field.array,
            required: field.required,
            target_type: field.target_type.clone(),
            nested: Vec::new(),
        }
    }

    pub fn is_document(&self) -> bool {
        self.kind == FieldKind::Document
    }
}

fn extract_specs(fields: &[FieldDefinition]) -> Vec<ReferenceSpec> {
    let mut specs: Vec<ReferenceSpec> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for field in fields {
        if seen.contains(&field.name.as_str()) {
            continue;
        }
        seen.push(&field.name);

        let spec = match field.kind {
            FieldKind::Reference => Some(ReferenceSpec::leaf(field)),
            FieldKind::Identifier if field.target_type.is_some() => Some(ReferenceSpec::leaf(field)),
            FieldKind::Document => {
                let nested = extract_specs(&field.nested_fields);
                (!nested.is_empty()).then(|| ReferenceSpec {
                    required: false,
                    nested,
                    ..ReferenceSpec::leaf(field)
                })
            }
            FieldKind::Identifier | FieldKind::Scalar => None,
        };

        specs.extend(spec);
    }

    specs
}

/// Field paths needed to resolve `specs`: the field name for plain
/// references, `document.field` for each reference inside a document.
pub fn projection_paths(specs: &[ReferenceSpec]) -> Vec<String> {
    specs
        .iter()
        .flat_map(|spec| {
            if spec.is_document() {
                spec.nested
                    .iter()
                    .map(|sub| format!("{}.{}", spec.name, sub.name))
                    .collect()
            } else {
                vec![spec.name.clone()]
            }
        })
        .collect()
}
