//! Identifier type used by the object store.
//!
//! Store identifiers are 24 hexadecimal digits. Matching is exact on the
//! string as the store returned it; the case of the digits is not normalized.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

const OBJECT_ID_LEN: usize = 24;

/// Unique identifier of a record in the object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Parses an object id, rejecting anything that is not 24 hex digits.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        if Self::is_object_id(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ModelError::InvalidObjectId(s.to_string()))
        }
    }

    /// Returns true if `s` has the shape of an object id.
    #[must_use]
    pub fn is_object_id(s: &str) -> bool {
        s.len() == OBJECT_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if Self::is_object_id(&s) {
            Ok(Self(s))
        } else {
            Err(ModelError::InvalidObjectId(s))
        }
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
