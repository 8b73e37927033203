//! Typed walk over arbitrary record values.
//!
//! Records from the store have no guaranteed shape: one array may mix
//! reference objects, raw ids, and plain documents. [`Node`] classifies a
//! JSON value into the four shapes the integrity checks care about so every
//! traversal matches on them exhaustively.

use serde_json::{Map, Value};

use crate::{Entity, ModelError, ModelResult, ObjectId};

/// Maximum nesting depth [`collect_ids`] will descend before failing.
pub const MAX_WALK_DEPTH: usize = 128;

const ID_KEY: &str = "_id";

/// A JSON value classified by shape.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// Null, bool, number, or a string that is not an id.
    Scalar(&'a Value),
    /// A string with the shape of an object id.
    Identifier(&'a str),
    Sequence(&'a [Value]),
    Keyed(&'a Map<String, Value>),
}

impl<'a> Node<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) if ObjectId::is_object_id(s) => Node::Identifier(s),
            Value::Array(items) => Node::Sequence(items),
            Value::Object(map) => Node::Keyed(map),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Node::Scalar(value),
        }
    }

    /// The id this node stands for: a raw id, or the `_id` of a keyed value.
    pub fn referenced_id(&self) -> Option<ObjectId> {
        match *self {
            Node::Identifier(s) => ObjectId::parse(s).ok(),
            Node::Keyed(map) => map
                .get(ID_KEY)
                .and_then(Value::as_str)
                .and_then(|s| ObjectId::parse(s).ok()),
            Node::Scalar(_) | Node::Sequence(_) => None,
        }
    }
}

/// Collects every id embedded anywhere in `value`, in document order.
///
/// The `_id` key of a keyed value is emitted directly; every other key is
/// recursed into regardless of its name. Fails with
/// [`ModelError::DepthExceeded`] instead of returning a partial list when the
/// value nests deeper than [`MAX_WALK_DEPTH`].
pub fn collect_ids(value: &Value) -> ModelResult<Vec<ObjectId>> {
    let mut ids = Vec::new();
    collect_into(Node::classify(value), 0, &mut ids)?;
    Ok(ids)
}

fn collect_into(node: Node<'_>, depth: usize, ids: &mut Vec<ObjectId>) -> ModelResult<()> {
    if depth > MAX_WALK_DEPTH {
        return Err(ModelError::DepthExceeded { limit: MAX_WALK_DEPTH });
    }

    match node {
        Node::Scalar(_) => {}
        Node::Identifier(s) => ids.extend(ObjectId::parse(s).ok()),
        Node::Sequence(items) => {
            for item in items {
                collect_into(Node::classify(item), depth + 1, ids)?;
            }
        }
        Node::Keyed(map) => collect_keyed(map, depth, ids)?,
    }
    Ok(())
}

fn collect_keyed(map: &Map<String, Value>, depth: usize, ids: &mut Vec<ObjectId>) -> ModelResult<()> {
    for (key, value) in map {
        if key == ID_KEY {
            if let Some(id) = value.as_str().and_then(|s| ObjectId::parse(s).ok()) {
                ids.push(id);
            }
        } else {
            collect_into(Node::classify(value), depth + 1, ids)?;
        }
    }
    Ok(())
}

impl Entity {
    /// Every id the entity embeds, its own `_id` first.
    pub fn embedded_ids(&self) -> ModelResult<Vec<ObjectId>> {
        let mut ids = vec![self.id.clone()];
        collect_keyed(&self.data, 0, &mut ids)?;
        Ok(ids)
    }
}
