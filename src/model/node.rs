// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ids::NodeId;

/// The kind of a research-tree node, as reported by the API `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum NodeKind {
    #[default]
    Text,
    Root,
    Question,
    Email,
    Call,
    File,
    Search,
    Image,
    Link,
    Audio,
    Input,
    /// A type string this client does not know yet.
    Other,
}

impl NodeKind {
    pub const ALL: [NodeKind; 12] = [
        Self::Text,
        Self::Root,
        Self::Question,
        Self::Email,
        Self::Call,
        Self::File,
        Self::Search,
        Self::Image,
        Self::Link,
        Self::Audio,
        Self::Input,
        Self::Other,
    ];

    pub fn from_type_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Self::Text,
            "root" => Self::Root,
            "question" => Self::Question,
            "email" => Self::Email,
            "call" => Self::Call,
            "file" => Self::File,
            "search" => Self::Search,
            "image" => Self::Image,
            "link" => Self::Link,
            "audio" => Self::Audio,
            "input" => Self::Input,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Root => "root",
            Self::Question => "question",
            Self::Email => "email",
            Self::Call => "call",
            Self::File => "file",
            Self::Search => "search",
            Self::Image => "image",
            Self::Link => "link",
            Self::Audio => "audio",
            Self::Input => "input",
            Self::Other => "other",
        }
    }

    /// Short marker shown inside rendered node boxes.
    pub fn badge(self) -> &'static str {
        match self {
            Self::Text => "¶",
            Self::Root => "◆",
            Self::Question => "?",
            Self::Email => "@",
            Self::Call => "☎",
            Self::File => "▤",
            Self::Search => "⌕",
            Self::Image => "▣",
            Self::Link => "↗",
            Self::Audio => "♪",
            Self::Input => "›",
            Self::Other => "·",
        }
    }

    pub fn is_root(self) -> bool {
        matches!(self, Self::Root)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(Self::from_type_str).unwrap_or_default())
    }
}

/// How a node is attached to the node that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Child,
    Sibling,
    Spouse,
}

impl Relation {
    pub const ALL: [Relation; 3] = [Self::Child, Self::Sibling, Self::Spouse];

    pub fn is_lateral(self) -> bool {
        !matches!(self, Self::Child)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Child => "child",
            Self::Sibling => "sibling",
            Self::Spouse => "spouse",
        })
    }
}

/// A node record exactly as received from the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    id: NodeId,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable_ids")]
    children: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable_ids")]
    siblings: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable_ids")]
    spouses: Vec<NodeId>,
}

fn nullable_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<NodeId>, D::Error> {
    Ok(Option::<Vec<NodeId>>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawNode {
    pub fn new(id: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            content: None,
            children: Vec::new(),
            siblings: Vec::new(),
            spouses: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeId>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    pub fn with_siblings(mut self, siblings: impl IntoIterator<Item = NodeId>) -> Self {
        self.siblings = siblings.into_iter().collect();
        self
    }

    pub fn with_spouses(mut self, spouses: impl IntoIterator<Item = NodeId>) -> Self {
        self.spouses = spouses.into_iter().collect();
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }

    pub fn siblings(&self) -> &[NodeId] {
        &self.siblings
    }

    pub fn spouses(&self) -> &[NodeId] {
        &self.spouses
    }

    pub fn related(&self, relation: Relation) -> &[NodeId] {
        match relation {
            Relation::Child => &self.children,
            Relation::Sibling => &self.siblings,
            Relation::Spouse => &self.spouses,
        }
    }

    /// All declared relations, children first, then siblings, then spouses.
    pub fn relations(&self) -> impl Iterator<Item = (Relation, &NodeId)> + '_ {
        Relation::ALL
            .into_iter()
            .flat_map(move |relation| self.related(relation).iter().map(move |id| (relation, id)))
    }

    pub fn relation_count(&self) -> usize {
        self.children.len() + self.siblings.len() + self.spouses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeKind, RawNode, Relation};
    use crate::model::NodeId;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[test]
    fn unknown_kind_deserializes_as_other() {
        let node: RawNode =
            serde_json::from_str(r#"{"id":"1","name":"n","type":"spreadsheet"}"#).expect("node");
        assert_eq!(node.kind(), NodeKind::Other);
    }

    #[test]
    fn missing_or_null_fields_use_defaults() {
        let node: RawNode =
            serde_json::from_str(r#"{"id":"1","type":null,"children":null}"#).expect("node");
        assert_eq!(node.kind(), NodeKind::Text);
        assert_eq!(node.name(), "");
        assert!(node.children().is_empty());
        assert!(node.content().is_none());
    }

    #[test]
    fn kind_strings_round_trip_for_known_kinds() {
        for kind in NodeKind::ALL {
            if kind == NodeKind::Other {
                continue;
            }
            assert_eq!(NodeKind::from_type_str(kind.as_str()), kind);
        }
        assert_eq!(NodeKind::from_type_str(" ROOT "), NodeKind::Root);
    }

    #[test]
    fn relations_iterate_children_then_siblings_then_spouses() {
        let node = RawNode::new(nid("r"), "root", NodeKind::Root)
            .with_spouses([nid("p")])
            .with_siblings([nid("s")])
            .with_children([nid("a"), nid("b")]);

        let relations = node
            .relations()
            .map(|(relation, id)| (relation, id.as_str().to_owned()))
            .collect::<Vec<_>>();
        assert_eq!(
            relations,
            vec![
                (Relation::Child, "a".to_owned()),
                (Relation::Child, "b".to_owned()),
                (Relation::Sibling, "s".to_owned()),
                (Relation::Spouse, "p".to_owned()),
            ]
        );
        assert_eq!(node.relation_count(), 4);
    }
}
