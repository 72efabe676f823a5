// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use rstest::rstest;

use super::{ast_to_elements, expand_edge_id, expand_node_id};
use crate::model::fixtures::{cs, cs400_ast, edge_pairs, math, node_ids};
use crate::model::{AstNode, GraphElement, NodeKind, Operator};

fn kinds(elements: &[GraphElement]) -> Vec<NodeKind> {
    elements.iter().filter_map(|e| e.as_node()).map(|n| n.kind()).collect()
}

#[test]
fn single_course_yields_target_prereq_and_edge() {
    let elements = ast_to_elements(&cs(300), "COMP SCI 400");

    assert_eq!(node_ids(&elements), vec!["COMP SCI 400", "COMP SCI 300"]);
    assert_eq!(kinds(&elements), vec![NodeKind::Target, NodeKind::Prereq]);
    assert_eq!(edge_pairs(&elements), vec![("COMP SCI 300", "COMP SCI 400")]);
}

#[test]
fn or_of_two_courses_gets_one_of_node() {
    let elements = ast_to_elements(&AstNode::or([cs(200), math(222)]), "COMP SCI 400");

    assert_eq!(
        node_ids(&elements),
        vec!["COMP SCI 400", "COMP SCI 200", "MATH 222", "one-of-COMP SCI 400-0"]
    );
    let operator = elements[3].as_node().unwrap();
    assert_eq!(operator.kind(), NodeKind::Operator);
    assert_eq!(operator.label(), "one of");
    assert_eq!(
        edge_pairs(&elements),
        vec![
            ("COMP SCI 200", "one-of-COMP SCI 400-0"),
            ("MATH 222", "one-of-COMP SCI 400-0"),
            ("one-of-COMP SCI 400-0", "COMP SCI 400"),
        ]
    );
}

#[rstest]
#[case::or(AstNode::or([cs(300)]))]
#[case::and(AstNode::and([cs(300)]))]
#[case::text_sibling(AstNode::or([cs(300), AstNode::text("consent of instructor")]))]
#[case::nested(AstNode::and([AstNode::or([AstNode::and([cs(300)])])]))]
fn single_surviving_child_elides_operator(#[case] ast: AstNode) {
    let elements = ast_to_elements(&ast, "COMP SCI 400");

    assert_eq!(node_ids(&elements), vec!["COMP SCI 400", "COMP SCI 300"]);
    assert!(!kinds(&elements).contains(&NodeKind::Operator));
    assert_eq!(edge_pairs(&elements), vec![("COMP SCI 300", "COMP SCI 400")]);
}

#[rstest]
#[case::text(AstNode::text("graduate standing"))]
#[case::empty_or(AstNode::or([]))]
#[case::only_text(AstNode::and([AstNode::text("a"), AstNode::or([AstNode::text("b")])]))]
fn expression_without_courses_yields_only_target(#[case] ast: AstNode) {
    let elements = ast_to_elements(&ast, "COMP SCI 400");
    assert_eq!(node_ids(&elements), vec!["COMP SCI 400"]);
    assert!(edge_pairs(&elements).is_empty());
}

#[test]
fn and_nodes_are_labelled_all_of_and_record_parent_operator() {
    let elements = ast_to_elements(&cs400_ast(), "COMP SCI 400");

    let and = elements
        .iter()
        .filter_map(|e| e.as_node())
        .find(|n| n.id() == "and-COMP SCI 400-0")
        .expect("and node");
    assert_eq!(and.label(), "all of");
    assert_eq!(and.parent_operator_id().map(|id| id.as_str()), Some("one-of-COMP SCI 400-0"));

    let cs300 = elements.iter().filter_map(|e| e.as_node()).find(|n| n.id() == "COMP SCI 300");
    let cs300 = cs300.expect("COMP SCI 300");
    assert_eq!(cs300.parent_operator_id().map(|id| id.as_str()), Some("and-COMP SCI 400-0"));
    assert_eq!(cs300.parent_operator_type(), Some(Operator::And));

    assert_eq!(
        edge_pairs(&elements),
        vec![
            ("COMP SCI 300", "and-COMP SCI 400-0"),
            ("MATH 222", "and-COMP SCI 400-0"),
            ("and-COMP SCI 400-0", "one-of-COMP SCI 400-0"),
            ("COMP SCI 354", "one-of-COMP SCI 400-0"),
            ("one-of-COMP SCI 400-0", "COMP SCI 400"),
        ]
    );
}

#[test]
fn repeated_course_is_emitted_once() {
    let ast = AstNode::or([AstNode::and([cs(300), math(222)]), AstNode::and([cs(300), math(234)])]);
    let elements = ast_to_elements(&ast, "COMP SCI 400");

    let ids = node_ids(&elements);
    assert_eq!(ids.iter().filter(|id| **id == "COMP SCI 300").count(), 1);
    assert_eq!(
        edge_pairs(&elements).iter().filter(|(s, _)| *s == "COMP SCI 300").count(),
        2,
        "each operator still gets its own edge"
    );
}

#[test]
fn elided_operator_number_is_reused() {
    // The first OR collapses to one child; its number must go to the next OR.
    let ast = AstNode::and([AstNode::or([cs(300)]), AstNode::or([cs(354), math(222)]), cs(240)]);
    let elements = ast_to_elements(&ast, "COMP SCI 400");

    let operators = elements
        .iter()
        .filter_map(|e| e.as_node())
        .filter(|n| n.kind() == NodeKind::Operator)
        .map(|n| n.id().as_str())
        .collect::<Vec<_>>();
    assert_eq!(operators, vec!["one-of-COMP SCI 400-0", "and-COMP SCI 400-0"]);
}

#[test]
fn compilation_is_idempotent() {
    let first = ast_to_elements(&cs400_ast(), "COMP SCI 400");
    let second = ast_to_elements(&cs400_ast(), "COMP SCI 400");
    assert_eq!(first, second);
}

#[test]
fn edge_ids_are_unique_and_salted_with_target() {
    let ast = AstNode::or([AstNode::and([cs(300), math(222)]), AstNode::and([cs(300), math(222)])]);
    let elements = ast_to_elements(&ast, "COMP SCI 400");

    let edge_ids = elements
        .iter()
        .filter_map(|e| e.as_edge())
        .map(|e| e.id().as_str())
        .collect::<Vec<_>>();
    let unique = edge_ids.iter().collect::<BTreeSet<_>>();
    assert_eq!(unique.len(), edge_ids.len());
    assert!(edge_ids.iter().all(|id| id.starts_with("edge-COMP SCI 400-")));
}

#[test]
fn every_edge_references_emitted_nodes() {
    let elements = ast_to_elements(&cs400_ast(), "COMP SCI 400");
    let ids = node_ids(&elements).into_iter().collect::<BTreeSet<_>>();
    for (source, target) in edge_pairs(&elements) {
        assert!(ids.contains(source), "dangling source {source}");
        assert!(ids.contains(target), "dangling target {target}");
    }
}

#[test]
fn self_reference_is_dropped() {
    let elements = ast_to_elements(&AstNode::or([cs(400), cs(300)]), "COMP SCI 400");
    assert_eq!(node_ids(&elements), vec!["COMP SCI 400", "COMP SCI 300"]);
    assert_eq!(edge_pairs(&elements), vec![("COMP SCI 300", "COMP SCI 400")]);
}

#[test]
fn target_label_is_abbreviated() {
    let elements = ast_to_elements(&cs(300), "COMP SCI/MATH 240");
    let target = elements[0].as_node().unwrap();
    assert_eq!(target.id(), "COMP SCI/MATH 240");
    assert_eq!(target.label(), "COMP/MATH 240");
}

#[test]
fn expand_ids_follow_course_id() {
    assert_eq!(expand_node_id("COMP SCI 300"), "expand-COMP SCI 300");
    assert_eq!(expand_edge_id("COMP SCI 300"), "expand-edge-COMP SCI 300");
}
