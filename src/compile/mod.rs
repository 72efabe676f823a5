// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Compiles a prerequisite expression into graph elements.
//!
//! Course references become `prereq` nodes keyed by their canonical string. AND/OR nodes
//! become synthetic `operator` nodes, but only when more than one child survives; a single
//! surviving child is wired straight to the parent. Free-text leaves are dropped.

use std::collections::BTreeMap;

use smol_str::format_smolstr;

use crate::model::{
    course_id_label, AstNode, EdgeData, ElementId, GraphElement, NodeData, NodeKind, Operator,
    OperatorNode,
};

mod ids;

pub(crate) use ids::SyntheticIds;

/// Compiles `ast` into a flat element list rooted at `target_course_id`.
///
/// The target node comes first, followed by the remaining nodes in traversal order and then
/// every edge. Synthetic ids are scoped to this call, so compiling the same AST twice yields
/// identical output.
pub fn ast_to_elements(ast: &AstNode, target_course_id: &str) -> Vec<GraphElement> {
    let mut compiler = Compiler::new(target_course_id);
    let root = compiler.process(ast);
    if let Some(root) = root {
        let target = compiler.target.clone();
        compiler.push_edge(root, target);
    }
    compiler.finish()
}

struct Compiler {
    target: ElementId,
    ids: SyntheticIds,
    nodes: Vec<NodeData>,
    node_index: BTreeMap<ElementId, usize>,
    edges: Vec<EdgeData>,
}

impl Compiler {
    fn new(target_course_id: &str) -> Self {
        let target = ElementId::from(target_course_id);
        let target_node =
            NodeData::new(target.clone(), course_id_label(target_course_id), NodeKind::Target);

        let mut node_index = BTreeMap::new();
        node_index.insert(target.clone(), 0);

        Self {
            ids: SyntheticIds::new(target_course_id),
            target,
            nodes: vec![target_node],
            node_index,
            edges: Vec::new(),
        }
    }

    fn process(&mut self, node: &AstNode) -> Option<ElementId> {
        match node {
            AstNode::Text(_) => None,
            AstNode::Course(reference) => {
                let id = ElementId::from(reference.canonical());
                if id == self.target {
                    // A course listed as its own prerequisite would close a cycle on the root.
                    tracing::debug!(course = %id, "dropping self-referencing prerequisite");
                    return None;
                }
                if !self.node_index.contains_key(&id) {
                    self.node_index.insert(id.clone(), self.nodes.len());
                    self.nodes.push(NodeData::new(
                        id.clone(),
                        reference.short_label(),
                        NodeKind::Prereq,
                    ));
                }
                Some(id)
            }
            AstNode::Operator(op) => self.process_operator(op),
        }
    }

    fn process_operator(&mut self, op: &OperatorNode) -> Option<ElementId> {
        let child_ids =
            op.children.iter().filter_map(|child| self.process(child)).collect::<Vec<_>>();

        let slot = self.ids.reserve(op.operator);
        match child_ids.len() {
            0 => {
                self.ids.reclaim(slot);
                None
            }
            1 => {
                self.ids.reclaim(slot);
                child_ids.into_iter().next()
            }
            _ => {
                let operator_id = slot.id().clone();
                self.node_index.insert(operator_id.clone(), self.nodes.len());
                self.nodes.push(NodeData::new(
                    operator_id.clone(),
                    op.operator.label(),
                    NodeKind::Operator,
                ));

                for child_id in child_ids {
                    self.mark_parent_operator(&child_id, &operator_id, op.operator);
                    self.push_edge(child_id, operator_id.clone());
                }

                Some(operator_id)
            }
        }
    }

    fn mark_parent_operator(&mut self, child_id: &ElementId, operator_id: &ElementId, op: Operator) {
        let Some(&idx) = self.node_index.get(child_id) else {
            return;
        };
        let node = &mut self.nodes[idx];
        if node.parent_operator_id().is_none() {
            node.set_parent_operator(operator_id.clone(), op);
        }
    }

    fn push_edge(&mut self, source: ElementId, target: ElementId) {
        let id = self.ids.next_edge_id();
        self.edges.push(EdgeData::new(id, source, target));
    }

    fn finish(self) -> Vec<GraphElement> {
        let mut out = Vec::with_capacity(self.nodes.len() + self.edges.len());
        out.extend(self.nodes.into_iter().map(GraphElement::Node));
        out.extend(self.edges.into_iter().map(GraphElement::Edge));
        out
    }
}

/// Id of the expand/collapse control attached to `course_id`.
pub fn expand_node_id(course_id: &str) -> ElementId {
    format_smolstr!("expand-{course_id}")
}

/// Id of the edge joining an expand control to its course.
pub fn expand_edge_id(course_id: &str) -> ElementId {
    format_smolstr!("expand-edge-{course_id}")
}

#[cfg(test)]
mod tests;
