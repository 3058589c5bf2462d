// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A typed identifier for graph objects.
///
/// Ids arrive from the remote API as opaque strings (numeric ids, UUIDs, ...). The only rule
/// enforced locally is that an id is not empty, because edge ids are derived by concatenating
/// endpoint ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("id must not be empty")]
    Empty,
    #[error("id must not be blank")]
    Blank,
}

fn validate_id(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.trim().is_empty() {
        return Err(IdError::Blank);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
pub type NodeId = Id<NodeIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeIdTag {}
pub type EdgeId = Id<EdgeIdTag>;

impl EdgeId {
    /// Derives the id of the edge connecting `source` to `target`: `e{source}-{target}`.
    ///
    /// `-` and `\` inside each endpoint are backslash-escaped to keep the separator unambiguous.
    pub fn between(source: &NodeId, target: &NodeId) -> Self {
        let mut value = String::with_capacity(source.as_str().len() + target.as_str().len() + 2);
        value.push('e');
        push_escaped(&mut value, source.as_str());
        value.push('-');
        push_escaped(&mut value, target.as_str());
        Self { value, _marker: PhantomData }
    }
}

fn push_escaped(out: &mut String, endpoint: &str) {
    for ch in endpoint.chars() {
        if matches!(ch, '-' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::{EdgeId, Id, IdError, NodeId};

    #[test]
    fn id_rejects_empty() {
        let result: Result<Id<()>, _> = Id::new("");
        assert_eq!(result, Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_blank() {
        let result: Result<Id<()>, _> = Id::new("  \t");
        assert_eq!(result, Err(IdError::Blank));
    }

    #[test]
    fn edge_id_joins_endpoints() {
        let source = NodeId::new("1").expect("node id");
        let target = NodeId::new("23").expect("node id");
        assert_eq!(EdgeId::between(&source, &target).as_str(), "e1-23");
    }

    #[test]
    fn edge_id_escapes_dashes_in_endpoints() {
        let id = |value: &str| NodeId::new(value).expect("node id");
        let left = EdgeId::between(&id("a"), &id("b-c"));
        let right = EdgeId::between(&id("a-b"), &id("c"));
        assert_eq!(left.as_str(), r"ea-b\-c");
        assert_eq!(right.as_str(), r"ea\-b-c");
        assert_ne!(left, right);
        assert_eq!(EdgeId::between(&id(r"x\"), &id("y")).as_str(), r"ex\\-y");
    }

    #[test]
    fn node_id_deserializes_from_json_string() {
        let id: NodeId = serde_json::from_str("\"a\"").expect("deserialize");
        assert_eq!(id.as_str(), "a");

        let err = serde_json::from_str::<NodeId>("\"\"").unwrap_err();
        assert!(err.to_string().contains("must not be empty"), "{err}");
    }
}
