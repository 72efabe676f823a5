// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout algorithms for course graphs.
//!
//! The tree layout positions prerequisite graphs; the layered layout is a plainer variant
//! for whole-course views; the grouped layout only describes the parameters handed to the
//! renderer's force-directed layout.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::model::{EdgeData, EdgeKind, ElementId, GraphElement, NodeData, NodeKind};

pub mod grouped;
pub mod layered;
pub mod measure;
pub mod solver;
pub mod tree;

pub use grouped::{generate_grouped_layout, GroupedLayoutConfig};
pub use layered::generate_layered_layout;
pub use measure::Size;
pub use solver::{LayeredOptions, LayeredSolver, SimpleLayeredSolver};
pub use tree::{generate_tree_layout, TreeLayout, TreeLayoutConfig};

/// Gap between neighboring nodes of one layer in the tree layout.
pub const TREE_NODE_SPACING: f64 = 5.0;
/// Gap between consecutive layers in the tree layout.
pub const TREE_LAYER_SPACING: f64 = 30.0;
/// Width reserved left of leaf prerequisites for the expand control.
pub const EXPAND_MARGIN: f64 = 40.0;
/// Gap between re-packed siblings during branch compression.
pub const SIBLING_SPACING: f64 = 5.0;
/// Horizontal nudge for bordered nodes so edge endpoints line up with borderless ones.
pub const BORDER_OFFSET: f64 = 1.0;
pub const LAYERED_NODE_SPACING: f64 = 20.0;
pub const LAYERED_LAYER_SPACING: f64 = 50.0;
pub const ANIMATION_DURATION_MS: u32 = 1000;
pub const ANIMATION_EASING: &str = "ease-in-out";
pub const FIT_PADDING: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node centers plus the animation settings the renderer applies them with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    name: &'static str,
    positions: BTreeMap<ElementId, Point>,
    animate: bool,
    animation_duration: u32,
    animation_easing: &'static str,
    fit: bool,
    padding: f64,
}

impl LayoutResult {
    pub fn new(positions: BTreeMap<ElementId, Point>, animate: bool) -> Self {
        Self {
            name: "preset",
            positions,
            animate,
            animation_duration: ANIMATION_DURATION_MS,
            animation_easing: ANIMATION_EASING,
            fit: true,
            padding: FIT_PADDING,
        }
    }

    pub fn positions(&self) -> &BTreeMap<ElementId, Point> {
        &self.positions
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn animate(&self) -> bool {
        self.animate
    }

    pub fn animation_duration_ms(&self) -> u32 {
        self.animation_duration
    }

    pub fn animation_easing(&self) -> &'static str {
        self.animation_easing
    }

    pub fn fit(&self) -> bool {
        self.fit
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEndpoint {
    Source,
    Target,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    MissingNodeId,
    DuplicateNodeId { node_id: ElementId },
    UnknownEdgeEndpoint { edge_id: ElementId, endpoint: EdgeEndpoint, node_id: ElementId },
    Solver(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNodeId => f.write_str("node id is undefined"),
            Self::DuplicateNodeId { node_id } => write!(f, "duplicate node id {node_id}"),
            Self::UnknownEdgeEndpoint { edge_id, endpoint, node_id } => {
                let endpoint = match endpoint {
                    EdgeEndpoint::Source => "source",
                    EdgeEndpoint::Target => "target",
                };
                write!(f, "edge {edge_id} references unknown {endpoint} node {node_id}")
            }
            Self::Solver(message) => write!(f, "layered solver failed: {message}"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// How edges with a missing endpoint are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Initial compilation: a dangling edge is a structural error.
    #[default]
    Strict,
    /// Incremental expansion: staged element sets may hold edges whose endpoints are not
    /// present yet; those edges are dropped.
    FilterDangling,
}

/// Validated view of an element list. Expand controls never take part in layout.
#[derive(Debug, Clone)]
pub(crate) struct LayoutInput<'a> {
    nodes: Vec<&'a NodeData>,
    edges: Vec<&'a EdgeData>,
}

impl<'a> LayoutInput<'a> {
    pub(crate) fn from_elements(
        elements: &'a [GraphElement],
        policy: EdgePolicy,
    ) -> Result<Self, LayoutError> {
        let mut nodes = Vec::new();
        let mut node_ids = BTreeSet::<&str>::new();
        for node in elements.iter().filter_map(GraphElement::as_node) {
            if node.kind() == NodeKind::Expand {
                continue;
            }
            if node.id().is_empty() {
                return Err(LayoutError::MissingNodeId);
            }
            if !node_ids.insert(node.id().as_str()) {
                return Err(LayoutError::DuplicateNodeId { node_id: node.id().clone() });
            }
            nodes.push(node);
        }

        let mut edges = Vec::new();
        let mut dropped = 0usize;
        for edge in elements.iter().filter_map(GraphElement::as_edge) {
            if edge.kind() == EdgeKind::Expand {
                continue;
            }
            let missing = if !node_ids.contains(edge.source().as_str()) {
                Some((EdgeEndpoint::Source, edge.source()))
            } else if !node_ids.contains(edge.target().as_str()) {
                Some((EdgeEndpoint::Target, edge.target()))
            } else {
                None
            };

            match (missing, policy) {
                (None, _) => edges.push(edge),
                (Some(_), EdgePolicy::FilterDangling) => dropped += 1,
                (Some((endpoint, node_id)), EdgePolicy::Strict) => {
                    return Err(LayoutError::UnknownEdgeEndpoint {
                        edge_id: edge.id().clone(),
                        endpoint,
                        node_id: node_id.clone(),
                    });
                }
            }
        }

        if dropped > 0 {
            tracing::debug!(dropped, "filtered edges with missing endpoints before layout");
        }

        Ok(Self { nodes, edges })
    }

    pub(crate) fn nodes(&self) -> &[&'a NodeData] {
        &self.nodes
    }

    pub(crate) fn edges(&self) -> &[&'a EdgeData] {
        &self.edges
    }
}
