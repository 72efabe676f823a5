// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::ast::Operator;

/// Identity key of a graph element. Course nodes use the canonical course string.
pub type ElementId = SmolStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Target,
    #[default]
    Prereq,
    Operator,
    Expand,
    Compound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeKind {
    #[default]
    #[serde(rename = "prereq")]
    Prereq,
    #[serde(rename = "expand-edge")]
    Expand,
}

impl EdgeKind {
    fn is_prereq(&self) -> bool {
        matches!(self, Self::Prereq)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    id: ElementId,
    #[serde(default)]
    label: String,
    #[serde(rename = "type", default)]
    kind: NodeKind,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<ElementId>,
    #[serde(rename = "parentOperatorId", default, skip_serializing_if = "Option::is_none")]
    parent_operator_id: Option<ElementId>,
    #[serde(rename = "parentOperatorType", default, skip_serializing_if = "Option::is_none")]
    parent_operator_type: Option<Operator>,
    #[serde(rename = "targetCourseId", default, skip_serializing_if = "Option::is_none")]
    target_course_id: Option<ElementId>,
}

impl NodeData {
    pub fn new(id: impl Into<ElementId>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            title: String::new(),
            parent: None,
            parent_operator_id: None,
            parent_operator_type: None,
            target_course_id: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_parent(mut self, parent: impl Into<ElementId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_target_course(mut self, course_id: impl Into<ElementId>) -> Self {
        self.target_course_id = Some(course_id.into());
        self
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parent(&self) -> Option<&ElementId> {
        self.parent.as_ref()
    }

    pub fn parent_operator_id(&self) -> Option<&ElementId> {
        self.parent_operator_id.as_ref()
    }

    pub fn parent_operator_type(&self) -> Option<Operator> {
        self.parent_operator_type
    }

    pub fn set_parent_operator(&mut self, operator_id: ElementId, operator: Operator) {
        self.parent_operator_id = Some(operator_id);
        self.parent_operator_type = Some(operator);
    }

    pub fn target_course_id(&self) -> Option<&ElementId> {
        self.target_course_id.as_ref()
    }

    pub fn is_operator(&self) -> bool {
        self.kind == NodeKind::Operator
    }

    pub fn is_compound(&self) -> bool {
        self.kind == NodeKind::Compound
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    #[serde(default)]
    id: ElementId,
    source: ElementId,
    target: ElementId,
    #[serde(rename = "type", default, skip_serializing_if = "EdgeKind::is_prereq")]
    kind: EdgeKind,
}

impl EdgeData {
    pub fn new(
        id: impl Into<ElementId>,
        source: impl Into<ElementId>,
        target: impl Into<ElementId>,
    ) -> Self {
        Self { id: id.into(), source: source.into(), target: target.into(), kind: EdgeKind::Prereq }
    }

    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn source(&self) -> &ElementId {
        &self.source
    }

    pub fn target(&self) -> &ElementId {
        &self.target
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }
}

/// One node or edge of a course graph.
///
/// Serialized in the renderer's element-definition shape, `{"data": {...}}`; an element is an
/// edge iff its data carries `source` and `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ElementDefinition", into = "ElementDefinition")]
pub enum GraphElement {
    Node(NodeData),
    Edge(EdgeData),
}

impl GraphElement {
    pub fn id(&self) -> &ElementId {
        match self {
            Self::Node(node) => node.id(),
            Self::Edge(edge) => edge.id(),
        }
    }

    pub fn as_node(&self) -> Option<&NodeData> {
        match self {
            Self::Node(node) => Some(node),
            Self::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&EdgeData> {
        match self {
            Self::Node(_) => None,
            Self::Edge(edge) => Some(edge),
        }
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Edge(_))
    }
}

impl From<NodeData> for GraphElement {
    fn from(node: NodeData) -> Self {
        Self::Node(node)
    }
}

impl From<EdgeData> for GraphElement {
    fn from(edge: EdgeData) -> Self {
        Self::Edge(edge)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ElementDataRepr {
    Edge(EdgeData),
    Node(NodeData),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ElementDefinition {
    data: ElementDataRepr,
    #[serde(default = "pannable_default")]
    pannable: bool,
}

fn pannable_default() -> bool {
    true
}

impl From<ElementDefinition> for GraphElement {
    fn from(definition: ElementDefinition) -> Self {
        match definition.data {
            ElementDataRepr::Edge(edge) => Self::Edge(edge),
            ElementDataRepr::Node(node) => Self::Node(node),
        }
    }
}

impl From<GraphElement> for ElementDefinition {
    fn from(element: GraphElement) -> Self {
        let data = match element {
            GraphElement::Node(node) => ElementDataRepr::Node(node),
            GraphElement::Edge(edge) => ElementDataRepr::Edge(edge),
        };
        Self { data, pannable: true }
    }
}

/// Parses a department/course graph payload (a JSON array of element definitions).
///
/// Nodes without a `title` get an empty one and every element is marked pannable. Edges
/// without an id are given `<source>-<target>`.
pub fn parse_graph_data(json: &str) -> Result<Vec<GraphElement>, serde_json::Error> {
    let mut elements: Vec<GraphElement> = serde_json::from_str(json)?;
    for element in &mut elements {
        if let GraphElement::Edge(edge) = element {
            if edge.id.is_empty() {
                edge.id = smol_str::format_smolstr!("{}-{}", edge.source, edge.target);
            }
        }
    }
    Ok(elements)
}
