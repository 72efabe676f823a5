// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Prerequisite tree layout.
//!
//! The layered solver only produces a rough placement. The passes after it make the result
//! read as a tree flowing into the target course: every node gets the longest-path depth
//! from the root, each depth column is right-aligned, sibling groups are re-packed and the
//! root is centered on its direct prerequisites.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::measure::{tree_node_size, Size};
use super::solver::{
    LayeredOptions, LayeredSolver, SimpleLayeredSolver, SolverEdge, SolverGraph, SolverNode,
    SolverOutput,
};
use super::{
    EdgePolicy, LayoutError, LayoutInput, LayoutResult, Point, BORDER_OFFSET, EXPAND_MARGIN,
    SIBLING_SPACING, TREE_LAYER_SPACING, TREE_NODE_SPACING,
};
use crate::model::{ElementId, GraphElement, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeLayoutConfig {
    pub node_spacing: f64,
    pub layer_spacing: f64,
    pub expand_margin: f64,
    pub sibling_spacing: f64,
    pub border_offset: f64,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: TREE_NODE_SPACING,
            layer_spacing: TREE_LAYER_SPACING,
            expand_margin: EXPAND_MARGIN,
            sibling_spacing: SIBLING_SPACING,
            border_offset: BORDER_OFFSET,
        }
    }
}

/// Configurable tree layout; [`generate_tree_layout`] covers the common case.
#[derive(Clone)]
pub struct TreeLayout {
    animate: bool,
    label_is_code: bool,
    policy: EdgePolicy,
    config: TreeLayoutConfig,
    solver: Arc<dyn LayeredSolver>,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            animate: false,
            label_is_code: true,
            policy: EdgePolicy::Strict,
            config: TreeLayoutConfig::default(),
            solver: Arc::new(SimpleLayeredSolver::default()),
        }
    }
}

impl std::fmt::Debug for TreeLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeLayout")
            .field("animate", &self.animate)
            .field("label_is_code", &self.label_is_code)
            .field("policy", &self.policy)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

pub fn generate_tree_layout(
    animate: bool,
    elements: &[GraphElement],
    label_is_code: bool,
) -> Result<LayoutResult, LayoutError> {
    TreeLayout::new().animate(animate).label_is_code(label_is_code).layout(elements)
}

#[derive(Debug, Clone)]
struct Placed {
    id: ElementId,
    x: f64,
    y: f64,
    size: Size,
    bordered: bool,
}

impl TreeLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn label_is_code(mut self, label_is_code: bool) -> Self {
        self.label_is_code = label_is_code;
        self
    }

    pub fn edge_policy(mut self, policy: EdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(mut self, config: TreeLayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn solver(mut self, solver: Arc<dyn LayeredSolver>) -> Self {
        self.solver = solver;
        self
    }

    pub fn layout(&self, elements: &[GraphElement]) -> Result<LayoutResult, LayoutError> {
        let input = LayoutInput::from_elements(elements, self.policy)?;
        if input.nodes().is_empty() {
            return Ok(LayoutResult::new(BTreeMap::new(), self.animate));
        }

        let edges = input
            .edges()
            .iter()
            .map(|edge| (edge.source().as_str(), edge.target().as_str()))
            .collect::<Vec<_>>();
        let has_incoming = edges.iter().map(|&(_, target)| target).collect::<BTreeSet<_>>();

        let mut sizes = BTreeMap::<&str, (Size, bool)>::new();
        let mut inflated = BTreeSet::<&str>::new();
        let mut solver_nodes = Vec::with_capacity(input.nodes().len());
        for node in input.nodes() {
            let id = node.id().as_str();
            let size = tree_node_size(node, self.label_is_code);
            sizes.insert(id, (size, !node.is_operator()));

            let mut width = size.width;
            if node.kind() == NodeKind::Prereq && !has_incoming.contains(id) {
                width += self.config.expand_margin;
                inflated.insert(id);
            }
            solver_nodes.push(SolverNode { id: node.id().clone(), width, height: size.height });
        }

        let graph = SolverGraph {
            nodes: solver_nodes,
            edges: input
                .edges()
                .iter()
                .map(|edge| {
                    SolverEdge::simple(edge.id().clone(), edge.source().clone(), edge.target().clone())
                })
                .collect(),
            options: LayeredOptions::default()
                .with_spacing(self.config.node_spacing, self.config.layer_spacing),
        };
        let output = self.solver.solve(&graph)?;

        let mut placed = Vec::with_capacity(output.children.len());
        for child in &output.children {
            let Some(&(size, bordered)) = sizes.get(child.id.as_str()) else {
                continue;
            };
            let mut x = child.x;
            if inflated.contains(child.id.as_str()) {
                x += self.config.expand_margin;
            }
            placed.push(Placed { id: child.id.clone(), x, y: child.y, size, bordered });
        }

        if let Some(root) = find_root(&edges, &output) {
            let predecessors = predecessor_map(&edges);
            let depths = node_depths(root, &predecessors);
            right_align(&mut placed, &depths, self.config.border_offset);
            compress_branches(&mut placed, root, &edges, &depths, self.config.sibling_spacing);
            center_root(&mut placed, root, &predecessors);
        }

        let positions = placed
            .into_iter()
            .map(|node| {
                let center = Point::new(
                    node.x + node.size.width / 2.0,
                    node.y + node.size.height / 2.0,
                );
                (node.id, center)
            })
            .collect();
        Ok(LayoutResult::new(positions, self.animate))
    }
}

/// The first edge target that never appears as a source; falls back to the solver's last
/// node when every target also has outgoing edges.
pub(crate) fn find_root<'a>(
    edges: &[(&'a str, &'a str)],
    output: &'a SolverOutput,
) -> Option<&'a str> {
    let sources = edges.iter().map(|&(source, _)| source).collect::<BTreeSet<_>>();
    edges
        .iter()
        .map(|&(_, target)| target)
        .find(|target| !sources.contains(target))
        .or_else(|| output.children.last().map(|child| child.id.as_str()))
}

fn predecessor_map<'a>(edges: &[(&'a str, &'a str)]) -> BTreeMap<&'a str, Vec<&'a str>> {
    let mut map = BTreeMap::<&str, Vec<&str>>::new();
    for &(source, target) in edges {
        map.entry(target).or_default().push(source);
    }
    map
}

/// Longest predecessor chain from `root` to every reachable node. Nodes on the current path
/// are not re-entered, so cyclic input terminates.
pub(crate) fn node_depths<'a>(
    root: &'a str,
    predecessors: &BTreeMap<&'a str, Vec<&'a str>>,
) -> BTreeMap<&'a str, usize> {
    let mut depths = BTreeMap::from([(root, 0usize)]);
    let mut on_path = BTreeSet::from([root]);
    let mut stack = vec![(root, 0usize, 0usize)];

    while let Some(frame) = stack.last_mut() {
        let (node, depth, cursor) = *frame;
        match predecessors.get(node).and_then(|preds| preds.get(cursor)).copied() {
            Some(pred) => {
                frame.2 += 1;
                if on_path.contains(pred) {
                    continue;
                }
                let next_depth = depth + 1;
                if depths.get(pred).is_some_and(|&known| known >= next_depth) {
                    continue;
                }
                depths.insert(pred, next_depth);
                on_path.insert(pred);
                stack.push((pred, next_depth, 0));
            }
            None => {
                on_path.remove(node);
                stack.pop();
            }
        }
    }

    depths
}

/// Aligns the right edges of every depth column. Nodes outside the root's tree keep the
/// solver's x.
fn right_align(placed: &mut [Placed], depths: &BTreeMap<&str, usize>, border_offset: f64) {
    let mut max_right = BTreeMap::<usize, f64>::new();
    for node in placed.iter() {
        if let Some(&depth) = depths.get(node.id.as_str()) {
            let right = node.x + node.size.width;
            max_right.entry(depth).and_modify(|max| *max = max.max(right)).or_insert(right);
        }
    }

    for node in placed.iter_mut() {
        let Some(max) = depths.get(node.id.as_str()).and_then(|depth| max_right.get(depth))
        else {
            continue;
        };
        let offset = if node.bordered { border_offset } else { 0.0 };
        node.x = max - node.size.width + offset;
    }
}

/// Re-packs nodes that share a depth and their first successor around the middle of the
/// span they occupied.
fn compress_branches(
    placed: &mut [Placed],
    root: &str,
    edges: &[(&str, &str)],
    depths: &BTreeMap<&str, usize>,
    spacing: f64,
) {
    let mut first_successor = BTreeMap::<&str, &str>::new();
    for &(source, target) in edges {
        first_successor.entry(source).or_insert(target);
    }

    let mut groups = BTreeMap::<(usize, &str), Vec<usize>>::new();
    for (idx, node) in placed.iter().enumerate() {
        let id = node.id.as_str();
        if id == root {
            continue;
        }
        if let (Some(&depth), Some(&successor)) = (depths.get(id), first_successor.get(id)) {
            groups.entry((depth, successor)).or_default().push(idx);
        }
    }

    for mut members in groups.into_values().filter(|members| members.len() > 1) {
        members.sort_by(|&a, &b| placed[a].y.total_cmp(&placed[b].y).then(a.cmp(&b)));

        let top = members.iter().map(|&i| placed[i].y).fold(f64::INFINITY, f64::min);
        let bottom = members
            .iter()
            .map(|&i| placed[i].y + placed[i].size.height)
            .fold(f64::NEG_INFINITY, f64::max);
        let packed = members.iter().map(|&i| placed[i].size.height).sum::<f64>()
            + spacing * (members.len() - 1) as f64;

        let mut y = (top + bottom) / 2.0 - packed / 2.0;
        for idx in members {
            placed[idx].y = y;
            y += placed[idx].size.height + spacing;
        }
    }
}

fn center_root(placed: &mut [Placed], root: &str, predecessors: &BTreeMap<&str, Vec<&str>>) {
    let Some(preds) = predecessors.get(root) else {
        return;
    };
    let span = placed
        .iter()
        .filter(|node| preds.contains(&node.id.as_str()))
        .fold(None, |span: Option<(f64, f64)>, node| {
            let (top, bottom) = (node.y, node.y + node.size.height);
            Some(span.map_or((top, bottom), |(t, b)| (t.min(top), b.max(bottom))))
        });
    let Some((top, bottom)) = span else {
        return;
    };
    if let Some(root_node) = placed.iter_mut().find(|node| node.id == root) {
        root_node.y = (top + bottom) / 2.0 - root_node.size.height / 2.0;
    }
}

#[cfg(test)]
mod tests;
