// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ElementId, GraphElement, NodeData};

/// Node and edge adjacency of an element list. Edges with a missing endpoint are ignored.
struct Adjacency<'a> {
    nodes: BTreeMap<&'a str, &'a NodeData>,
    incoming: BTreeMap<&'a str, Vec<(&'a str, &'a str)>>,
    outgoing: BTreeMap<&'a str, Vec<(&'a str, &'a str)>>,
}

impl<'a> Adjacency<'a> {
    fn new(elements: &'a [GraphElement]) -> Self {
        let nodes = elements
            .iter()
            .filter_map(GraphElement::as_node)
            .map(|node| (node.id().as_str(), node))
            .collect::<BTreeMap<_, _>>();

        let mut incoming = BTreeMap::<&str, Vec<(&str, &str)>>::new();
        let mut outgoing = BTreeMap::<&str, Vec<(&str, &str)>>::new();
        for edge in elements.iter().filter_map(GraphElement::as_edge) {
            let (source, target) = (edge.source().as_str(), edge.target().as_str());
            if !nodes.contains_key(source) || !nodes.contains_key(target) {
                continue;
            }
            let id = edge.id().as_str();
            incoming.entry(target).or_default().push((id, source));
            outgoing.entry(source).or_default().push((id, target));
        }

        Self { nodes, incoming, outgoing }
    }

    fn incomers(&self, node: &str) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.incoming.get(node).into_iter().flatten().copied()
    }

    fn outgoers(&self, node: &str) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.outgoing.get(node).into_iter().flatten().copied()
    }

    fn is_compound(&self, node: &str) -> bool {
        self.nodes.get(node).is_some_and(|node| node.is_compound())
    }
}

fn owned(ids: impl IntoIterator<Item = impl AsRef<str>>) -> BTreeSet<ElementId> {
    ids.into_iter().map(|id| ElementId::from(id.as_ref())).collect()
}

/// Everything `node_id` depends on, walking prerequisites backwards but not past a taken
/// course. The start node and reached taken courses are included, in visit order.
pub fn predecessors_not_taken(
    elements: &[GraphElement],
    node_id: &str,
    taken: &BTreeSet<ElementId>,
) -> Vec<ElementId> {
    let graph = Adjacency::new(elements);
    let Some((&start, _)) = graph.nodes.get_key_value(node_id) else {
        return Vec::new();
    };

    let mut visited = BTreeSet::new();
    let mut order = Vec::new();
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        order.push(ElementId::from(node));
        if taken.contains(node) {
            continue;
        }
        let incomers = graph.incomers(node).map(|(_, source)| source).collect::<Vec<_>>();
        stack.extend(incomers.into_iter().rev().filter(|source| !visited.contains(source)));
    }
    order
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathHighlight {
    pub nodes: BTreeSet<ElementId>,
    pub edges: BTreeSet<ElementId>,
    pub faded_nodes: BTreeSet<ElementId>,
    pub faded_edges: BTreeSet<ElementId>,
}

/// Highlights a course with all of its transitive prerequisites and the courses it directly
/// unlocks; everything else is faded. Compound (subject) nodes and unknown ids yield `None`.
pub fn highlight_path(elements: &[GraphElement], node_id: &str) -> Option<PathHighlight> {
    let graph = Adjacency::new(elements);
    let (&start, node) = graph.nodes.get_key_value(node_id)?;
    if node.is_compound() {
        return None;
    }

    let mut nodes = BTreeSet::from([start]);
    let mut edges = BTreeSet::new();
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        for (edge, source) in graph.incomers(current) {
            edges.insert(edge);
            if nodes.insert(source) {
                stack.push(source);
            }
        }
    }
    for (edge, target) in graph.outgoers(start) {
        edges.insert(edge);
        nodes.insert(target);
    }

    let faded_nodes = graph
        .nodes
        .keys()
        .filter(|id| !nodes.contains(*id) && !graph.is_compound(id))
        .copied();
    let faded_edges = elements
        .iter()
        .filter_map(GraphElement::as_edge)
        .map(|edge| edge.id().as_str())
        .filter(|id| !edges.contains(id));

    Some(PathHighlight {
        faded_nodes: owned(faded_nodes),
        faded_edges: owned(faded_edges),
        nodes: owned(nodes),
        edges: owned(edges),
    })
}

/// Untaken courses directly unlocked by taken ones whose prerequisites are all taken.
pub fn mark_next_courses(
    elements: &[GraphElement],
    taken: &BTreeSet<ElementId>,
) -> BTreeSet<ElementId> {
    let graph = Adjacency::new(elements);
    let candidates = taken
        .iter()
        .flat_map(|id| graph.outgoers(id))
        .map(|(_, target)| target)
        .filter(|target| !taken.contains(*target))
        .collect::<BTreeSet<_>>();

    owned(
        candidates
            .into_iter()
            .filter(|id| graph.incomers(id).all(|(_, source)| taken.contains(source))),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseClasses {
    pub taken: BTreeSet<ElementId>,
    pub next: BTreeSet<ElementId>,
}

/// Splits the graph's courses into taken ones and the ones that can be taken next: courses
/// without prerequisites that unlock something, plus those [`mark_next_courses`] finds.
pub fn classify_courses(elements: &[GraphElement], taken: &BTreeSet<ElementId>) -> CourseClasses {
    let graph = Adjacency::new(elements);
    let mut classes = CourseClasses::default();
    for &id in graph.nodes.keys() {
        if taken.contains(id) {
            classes.taken.insert(ElementId::from(id));
        } else if graph.incomers(id).next().is_none() && graph.outgoers(id).next().is_some() {
            classes.next.insert(ElementId::from(id));
        }
    }
    classes.next.extend(mark_next_courses(elements, taken));
    classes
}

/// Keeps `root_course` with its untaken prerequisite paths, plus every compound node. Edges
/// left without an endpoint go too. An unknown root leaves the elements untouched.
pub fn filter_elements_by_root_course(
    elements: &[GraphElement],
    root_course: &str,
    taken: &BTreeSet<ElementId>,
) -> Vec<GraphElement> {
    let keep = predecessors_not_taken(elements, root_course, taken);
    if keep.is_empty() {
        return elements.to_vec();
    }
    let keep = keep.iter().map(ElementId::as_str).collect::<BTreeSet<_>>();

    let kept_nodes = elements
        .iter()
        .filter_map(GraphElement::as_node)
        .filter(|node| node.is_compound() || keep.contains(node.id().as_str()))
        .map(|node| node.id().as_str())
        .collect::<BTreeSet<_>>();

    elements
        .iter()
        .filter(|element| match element {
            GraphElement::Node(node) => kept_nodes.contains(node.id().as_str()),
            GraphElement::Edge(edge) => {
                kept_nodes.contains(edge.source().as_str())
                    && kept_nodes.contains(edge.target().as_str())
            }
        })
        .cloned()
        .collect()
}

/// Splits off the courses grouped under `subject` together with their edges. Returns
/// `(visible, hidden)`; appending `hidden` to `visible` restores the graph.
pub fn hide_subject(
    elements: &[GraphElement],
    subject: &str,
) -> (Vec<GraphElement>, Vec<GraphElement>) {
    let hidden_nodes = elements
        .iter()
        .filter_map(GraphElement::as_node)
        .filter(|node| node.parent().is_some_and(|parent| parent == subject))
        .map(|node| node.id().as_str())
        .collect::<BTreeSet<_>>();

    elements.iter().cloned().partition(|element| match element {
        GraphElement::Node(node) => !hidden_nodes.contains(node.id().as_str()),
        GraphElement::Edge(edge) => {
            !hidden_nodes.contains(edge.source().as_str())
                && !hidden_nodes.contains(edge.target().as_str())
        }
    })
}
