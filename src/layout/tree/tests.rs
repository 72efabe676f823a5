// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use rstest::rstest;

use super::{find_root, generate_tree_layout, node_depths, TreeLayout};
use crate::layout::measure::tree_node_size;
use crate::layout::solver::{LayeredSolver, SolvedNode, SolverGraph, SolverOutput};
use crate::layout::{EdgePolicy, LayoutError, LayoutResult, EXPAND_MARGIN, SIBLING_SPACING};
use crate::model::fixtures::{edge, node, small_course_graph};
use crate::model::{GraphElement, NodeKind};

/// Returns fixed top-left positions and records the graph it was asked to solve.
#[derive(Default)]
struct FixedSolver {
    positions: Vec<(&'static str, f64, f64)>,
    seen: Mutex<Option<SolverGraph>>,
}

impl LayeredSolver for FixedSolver {
    fn solve(&self, graph: &SolverGraph) -> Result<SolverOutput, LayoutError> {
        if let Ok(mut seen) = self.seen.lock() {
            *seen = Some(graph.clone());
        }
        Ok(SolverOutput {
            children: self
                .positions
                .iter()
                .map(|&(id, x, y)| SolvedNode { id: id.into(), x, y })
                .collect(),
        })
    }
}

fn size_of(elements: &[GraphElement], id: &str) -> (f64, f64) {
    let node = elements
        .iter()
        .filter_map(GraphElement::as_node)
        .find(|n| n.id() == id)
        .expect("node");
    let size = tree_node_size(node, true);
    (size.width, size.height)
}

fn right_edge(result: &LayoutResult, elements: &[GraphElement], id: &str) -> f64 {
    let (width, _) = size_of(elements, id);
    result.position(id).expect("position").x + width / 2.0
}

fn vertical_span(result: &LayoutResult, elements: &[GraphElement], id: &str) -> (f64, f64) {
    let (_, height) = size_of(elements, id);
    let center = result.position(id).expect("position").y;
    (center - height / 2.0, center + height / 2.0)
}

#[test]
fn empty_graph_has_no_positions() {
    let result = generate_tree_layout(true, &[], true).unwrap();
    assert!(result.positions().is_empty());
    assert!(result.animate());
}

#[test]
fn every_node_gets_a_position() {
    let elements = small_course_graph();
    let result = generate_tree_layout(false, &elements, true).unwrap();
    for id in ["T", "A", "B", "C", "one-of"] {
        assert!(result.position(id).is_some(), "missing {id}");
    }
}

#[test]
fn equal_depth_nodes_share_right_edge() {
    let elements = small_course_graph();
    let result = generate_tree_layout(false, &elements, true).unwrap();

    // Depth 2: A and B, both bordered.
    assert!((right_edge(&result, &elements, "A") - right_edge(&result, &elements, "B")).abs() < 1e-9);
    // Depth 1: the operator has no border, C has one.
    let diff = right_edge(&result, &elements, "C") - right_edge(&result, &elements, "one-of");
    assert!((diff - 1.0).abs() < 1e-9, "border offset mismatch: {diff}");
}

#[test]
fn prerequisites_sit_left_of_what_they_unlock() {
    let elements = small_course_graph();
    let result = generate_tree_layout(false, &elements, true).unwrap();
    let x = |id: &str| result.position(id).expect("position").x;
    assert!(x("A") < x("one-of"));
    assert!(x("one-of") < x("T"));
    assert!(x("C") < x("T"));
}

#[test]
fn leaf_prerequisites_keep_room_for_expand_control() {
    let elements = small_course_graph();
    let result = generate_tree_layout(false, &elements, true).unwrap();
    for id in ["A", "B", "C"] {
        let (width, _) = size_of(&elements, id);
        let left = result.position(id).expect("position").x - width / 2.0;
        assert!(left >= EXPAND_MARGIN, "{id} starts at {left}");
    }
}

#[test]
fn root_is_centered_on_direct_prerequisites() {
    let elements = small_course_graph();
    let result = generate_tree_layout(false, &elements, true).unwrap();

    let (op_top, op_bottom) = vertical_span(&result, &elements, "one-of");
    let (c_top, c_bottom) = vertical_span(&result, &elements, "C");
    let mid = (op_top.min(c_top) + op_bottom.max(c_bottom)) / 2.0;
    let root = result.position("T").expect("root").y;
    assert!((root - mid).abs() < 1e-9, "root at {root}, expected {mid}");
}

#[test]
fn siblings_are_packed_and_centered_on_their_span() {
    let elements = vec![
        node("T", NodeKind::Target),
        node("A", NodeKind::Prereq),
        node("B", NodeKind::Prereq),
        edge("A", "T"),
        edge("B", "T"),
    ];
    let solver = Arc::new(FixedSolver {
        positions: vec![("A", 0.0, 0.0), ("B", 0.0, 100.0), ("T", 100.0, 50.0)],
        ..FixedSolver::default()
    });
    let result = TreeLayout::new().solver(solver.clone()).layout(&elements).unwrap();

    // Span 0..118 packs to 41px around its middle (59).
    let a = result.position("A").unwrap();
    let b = result.position("B").unwrap();
    assert_eq!(a.y, 38.5 + 9.0);
    assert_eq!(b.y, 38.5 + 18.0 + SIBLING_SPACING + 9.0);
    assert_eq!(result.position("T").unwrap().y, 59.0);

    // Leaf prerequisites were widened for the solver only.
    let seen = solver.seen.lock().unwrap();
    let graph = seen.as_ref().expect("solver called");
    let (width, _) = size_of(&elements, "A");
    let widths = graph.nodes.iter().map(|n| (n.id.as_str(), n.width)).collect::<BTreeMap<_, _>>();
    assert_eq!(widths["A"], width + EXPAND_MARGIN);
    assert_eq!(widths["T"], size_of(&elements, "T").0);
    // ...and shifted right by the margin, plus the 1px border.
    assert!((a.x - (EXPAND_MARGIN + 1.0 + width / 2.0)).abs() < 1e-9);
}

#[test]
fn strict_layout_rejects_dangling_edges() {
    let mut elements = small_course_graph();
    elements.push(edge("ghost", "T"));
    assert!(matches!(
        generate_tree_layout(false, &elements, true),
        Err(LayoutError::UnknownEdgeEndpoint { .. })
    ));

    let result = TreeLayout::new()
        .edge_policy(EdgePolicy::FilterDangling)
        .layout(&elements)
        .unwrap();
    assert!(result.position("ghost").is_none());
    assert_eq!(result.positions().len(), 5);
}

#[rstest]
#[case::single_sink(&[("A", "X"), ("B", "X"), ("X", "T")], "T")]
#[case::first_sink_wins(&[("A", "T"), ("B", "U")], "T")]
#[case::cycle_falls_back_to_last_node(&[("A", "B"), ("B", "A")], "last")]
fn root_identification(#[case] edges: &[(&str, &str)], #[case] expected: &str) {
    let output = SolverOutput {
        children: vec![
            SolvedNode { id: "first".into(), x: 0.0, y: 0.0 },
            SolvedNode { id: "last".into(), x: 0.0, y: 0.0 },
        ],
    };
    assert_eq!(find_root(edges, &output), Some(expected));
}

#[test]
fn depth_is_longest_predecessor_chain() {
    // A reaches T directly and through B.
    let preds = BTreeMap::from([("T", vec!["A", "B"]), ("B", vec!["A"])]);
    let depths = node_depths("T", &preds);
    assert_eq!(depths["T"], 0);
    assert_eq!(depths["B"], 1);
    assert_eq!(depths["A"], 2);
}

#[test]
fn depth_terminates_on_cycles() {
    let preds = BTreeMap::from([("T", vec!["A"]), ("A", vec!["B"]), ("B", vec!["A"])]);
    let depths = node_depths("T", &preds);
    assert_eq!(depths["A"], 1);
    assert_eq!(depths["B"], 2);
}

#[test]
fn cyclic_graph_still_lays_out() {
    let elements = vec![
        node("A", NodeKind::Prereq),
        node("B", NodeKind::Prereq),
        edge("A", "B"),
        edge("B", "A"),
    ];
    let result = generate_tree_layout(false, &elements, true).unwrap();
    assert_eq!(result.positions().len(), 2);
}
