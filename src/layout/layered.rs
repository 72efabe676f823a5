// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::measure::layered_node_size;
use super::solver::{
    LayeredOptions, LayeredSolver, SimpleLayeredSolver, SolverEdge, SolverGraph, SolverNode,
};
use super::{EdgePolicy, LayoutError, LayoutInput, LayoutResult, Point};
use crate::model::GraphElement;

/// Plain layered layout for whole-course views: character-count sizing, no post-processing.
pub fn generate_layered_layout(
    animate: bool,
    elements: &[GraphElement],
    label_is_code: bool,
) -> Result<LayoutResult, LayoutError> {
    layered_layout_with(&SimpleLayeredSolver::default(), animate, elements, label_is_code)
}

pub fn layered_layout_with(
    solver: &dyn LayeredSolver,
    animate: bool,
    elements: &[GraphElement],
    label_is_code: bool,
) -> Result<LayoutResult, LayoutError> {
    let input = LayoutInput::from_elements(elements, EdgePolicy::Strict)?;

    let mut sizes = BTreeMap::new();
    let nodes = input
        .nodes()
        .iter()
        .map(|node| {
            let size = layered_node_size(node, label_is_code);
            sizes.insert(node.id().clone(), size);
            SolverNode { id: node.id().clone(), width: size.width, height: size.height }
        })
        .collect();
    let edges = input
        .edges()
        .iter()
        .map(|edge| SolverEdge::simple(edge.id().clone(), edge.source().clone(), edge.target().clone()))
        .collect();

    let output = solver.solve(&SolverGraph { nodes, edges, options: LayeredOptions::default() })?;

    let positions = output
        .children
        .into_iter()
        .filter_map(|child| {
            let size = sizes.get(&child.id)?;
            let center = Point::new(child.x + size.width / 2.0, child.y + size.height / 2.0);
            Some((child.id, center))
        })
        .collect();
    Ok(LayoutResult::new(positions, animate))
}
