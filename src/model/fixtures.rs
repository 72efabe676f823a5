// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ast::AstNode;
use super::element::{EdgeData, GraphElement, NodeData, NodeKind};

pub(crate) fn cs(number: u32) -> AstNode {
    AstNode::course(["COMP SCI"], number)
}

pub(crate) fn math(number: u32) -> AstNode {
    AstNode::course(["MATH"], number)
}

pub(crate) fn node(id: &str, kind: NodeKind) -> GraphElement {
    GraphElement::Node(NodeData::new(id, id, kind))
}

pub(crate) fn edge(source: &str, target: &str) -> GraphElement {
    GraphElement::Edge(EdgeData::new(format!("{source}->{target}"), source, target))
}

pub(crate) fn node_ids(elements: &[GraphElement]) -> Vec<&str> {
    elements.iter().filter_map(|e| e.as_node()).map(|n| n.id().as_str()).collect()
}

pub(crate) fn edge_pairs(elements: &[GraphElement]) -> Vec<(&str, &str)> {
    elements
        .iter()
        .filter_map(|e| e.as_edge())
        .map(|e| (e.source().as_str(), e.target().as_str()))
        .collect()
}

/// `COMP SCI 400` requires `(300 AND MATH 222) OR 354`, plus free text.
pub(crate) fn cs400_ast() -> AstNode {
    AstNode::or([
        AstNode::and([cs(300), math(222), AstNode::text("junior standing")]),
        cs(354),
    ])
}

/// A small prerequisite DAG shaped like a compiled course graph:
///
/// ```text
/// A ─┐
///    ├─ one-of ─┐
/// B ─┘          ├─ T
/// C ────────────┘
/// ```
pub(crate) fn small_course_graph() -> Vec<GraphElement> {
    vec![
        node("T", NodeKind::Target),
        node("A", NodeKind::Prereq),
        node("B", NodeKind::Prereq),
        node("C", NodeKind::Prereq),
        GraphElement::Node(NodeData::new("one-of", "one of", NodeKind::Operator)),
        edge("A", "one-of"),
        edge("B", "one-of"),
        edge("one-of", "T"),
        edge("C", "T"),
    ]
}
