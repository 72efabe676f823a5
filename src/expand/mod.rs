// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interactive expand/collapse of a prerequisite graph.
//!
//! [`ExpandState`] owns the live element list. Every element carries a reference count: the
//! initial graph starts at one, and each expansion that needs an element adds one. Collapsing
//! an expansion releases its elements, and only those whose count drops to zero disappear,
//! so a course required by two expanded ancestors survives the collapse of either.
//!
//! All bookkeeping sits behind one async mutex. Course fetches run outside the lock; a fetch
//! that completes after its course left the graph (or after [`ExpandState::clear`]) is
//! dropped instead of applied.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Mutex as StdMutex, PoisonError};

use tokio::sync::{watch, Mutex};

use crate::compile::{ast_to_elements, expand_edge_id, expand_node_id};
use crate::layout::{EdgePolicy, LayoutError, LayoutResult, Point, TreeLayout};
use crate::model::{AstNode, EdgeData, EdgeKind, ElementId, GraphElement, NodeData, NodeKind};

pub mod renderer;
pub mod source;

pub use renderer::GraphRenderer;
pub use source::{CourseSource, FetchError, InMemoryCourses};

/// Horizontal distance between a course's center and its expand control.
pub const EXPAND_OFFSET: f64 = 40.0;
pub const EXPAND_LABEL: &str = "+";
pub const COLLAPSE_LABEL: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    Expanded { added: usize },
    /// The course is expanded already, or it is the graph's target, whose prerequisites are
    /// the initial graph.
    AlreadyExpanded,
    /// Another expansion of the same course is still fetching.
    InFlight,
    /// The course has no node in the live graph.
    NotInGraph,
    NoPrerequisites,
    /// The fetch failed; nothing changed.
    Failed,
    /// The course left the graph, or the graph was cleared, while fetching.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseOutcome {
    Collapsed { removed: usize },
    NotExpanded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    Layout(LayoutError),
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(err) => write!(f, "relayout failed: {err}"),
        }
    }
}

impl std::error::Error for ExpandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
        }
    }
}

impl From<LayoutError> for ExpandError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

/// The `+`/`-` affordance drawn next to an expandable course.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandControl {
    pub node: GraphElement,
    pub edge: GraphElement,
    pub position: Point,
}

impl ExpandControl {
    fn new(course_id: &str, expanded: bool, course_center: Point) -> Self {
        let node_id = expand_node_id(course_id);
        let label = if expanded { COLLAPSE_LABEL } else { EXPAND_LABEL };
        let node = NodeData::new(node_id.clone(), label, NodeKind::Expand)
            .with_target_course(course_id);
        let edge = EdgeData::new(expand_edge_id(course_id), node_id, course_id)
            .with_kind(EdgeKind::Expand);
        Self {
            node: node.into(),
            edge: edge.into(),
            position: Point::new(course_center.x - EXPAND_OFFSET, course_center.y),
        }
    }

    pub fn course_id(&self) -> Option<&ElementId> {
        self.node.as_node().and_then(NodeData::target_course_id)
    }

    pub fn label(&self) -> &str {
        self.node.as_node().map_or("", NodeData::label)
    }
}

#[derive(Debug, Clone, Default)]
struct Expansion {
    owned: Vec<ElementId>,
    /// Edges into the expanded course that are drawn ending at its control instead.
    redirected: Vec<ElementId>,
}

#[derive(Default)]
struct LiveGraph {
    target: Option<ElementId>,
    elements: Vec<GraphElement>,
    ref_counts: BTreeMap<ElementId, usize>,
    expanded: BTreeMap<ElementId, Expansion>,
    /// Control elements currently in the renderer.
    control_ids: Vec<ElementId>,
    generation: u64,
    renderer: Option<Box<dyn GraphRenderer>>,
    layout: Option<LayoutResult>,
}

struct Snapshot {
    elements: Vec<GraphElement>,
    ref_counts: BTreeMap<ElementId, usize>,
}

impl LiveGraph {
    fn new(target: ElementId, elements: Vec<GraphElement>) -> Self {
        let ref_counts = elements.iter().map(|element| (element.id().clone(), 1)).collect();
        Self { target: Some(target), elements, ref_counts, ..Self::default() }
    }

    fn is_target(&self, id: &str) -> bool {
        self.target.as_deref() == Some(id)
    }

    fn contains_node(&self, id: &str) -> bool {
        self.elements.iter().filter_map(GraphElement::as_node).any(|node| node.id() == id)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot { elements: self.elements.clone(), ref_counts: self.ref_counts.clone() }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.elements = snapshot.elements;
        self.ref_counts = snapshot.ref_counts;
    }

    /// Adds a compiled expansion. Returns the elements new to the graph and every id the
    /// expansion owns.
    fn merge(
        &mut self,
        course_id: &str,
        compiled: Vec<GraphElement>,
    ) -> (Vec<GraphElement>, Vec<ElementId>) {
        let mut added = Vec::new();
        let mut owned = Vec::new();
        for element in compiled {
            let id = element.id().clone();
            if id.as_str() == course_id {
                continue;
            }
            owned.push(id.clone());

            // Edge ids are scoped to the expanded course, so a live edge id is only seen again
            // when the same compilation is merged twice; it is shared like a node.
            let count = self.ref_counts.entry(id).or_insert(0);
            if *count == 0 {
                added.push(element);
            }
            *count += 1;
        }
        self.elements.extend(added.iter().cloned());
        (added, owned)
    }

    fn redirects_for(&self, course_id: &str, owned: &[ElementId]) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter_map(GraphElement::as_edge)
            .filter(|edge| edge.target().as_str() == course_id && owned.contains(edge.source()))
            .map(|edge| edge.id().clone())
            .collect()
    }

    /// Expansions reachable through `course_id`'s owned elements, deepest first.
    fn nested_expansions(&self, course_id: &str) -> Vec<ElementId> {
        let mut visited = BTreeSet::from([ElementId::from(course_id)]);
        let mut found = Vec::new();
        self.collect_nested(course_id, &mut visited, &mut found);
        found.reverse();
        found
    }

    fn collect_nested(
        &self,
        course_id: &str,
        visited: &mut BTreeSet<ElementId>,
        found: &mut Vec<ElementId>,
    ) {
        let Some(expansion) = self.expanded.get(course_id) else {
            return;
        };
        for nested in self.expanded.keys() {
            if expansion.owned.contains(nested) && visited.insert(nested.clone()) {
                found.push(nested.clone());
                self.collect_nested(nested, visited, found);
            }
        }
    }

    /// Drops one reference from each id; returns the ids that left the graph.
    fn release(&mut self, owned: &[ElementId]) -> Vec<ElementId> {
        let mut removed = Vec::new();
        for id in owned {
            let Some(count) = self.ref_counts.get_mut(id) else {
                continue;
            };
            if *count > 1 {
                *count -= 1;
                continue;
            }
            self.ref_counts.remove(id);
            removed.push(id.clone());
        }

        if !removed.is_empty() {
            let gone = removed.iter().collect::<BTreeSet<_>>();
            self.elements.retain(|element| !gone.contains(element.id()));
        }
        removed
    }

    /// Leaf prerequisites and expanded courses each get a control.
    fn expand_controls(&self, layout: &LayoutResult) -> Vec<ExpandControl> {
        let has_incoming = self
            .elements
            .iter()
            .filter_map(GraphElement::as_edge)
            .filter(|edge| edge.kind() == EdgeKind::Prereq)
            .map(|edge| edge.target().as_str())
            .collect::<BTreeSet<_>>();

        let mut courses = self
            .elements
            .iter()
            .filter_map(GraphElement::as_node)
            .filter(|node| node.kind() == NodeKind::Prereq)
            .map(|node| node.id().as_str())
            .filter(|id| !has_incoming.contains(id))
            .collect::<Vec<_>>();
        for course in self.expanded.keys() {
            if !courses.contains(&course.as_str()) {
                courses.push(course.as_str());
            }
        }

        courses
            .into_iter()
            .filter_map(|course| {
                let center = layout.position(course)?;
                Some(ExpandControl::new(course, self.expanded.contains_key(course), center))
            })
            .collect()
    }
}

/// Courses whose fetch is running. Each entry carries the ticket of the reservation that
/// owns it, so a reservation released after [`InFlight::clear`] leaves newer entries alone.
#[derive(Debug, Default)]
struct InFlight {
    next_ticket: u64,
    courses: BTreeMap<ElementId, u64>,
}

impl InFlight {
    fn reserve<'a>(set: &'a StdMutex<Self>, course_id: &str) -> Option<Reservation<'a>> {
        let mut inner = set.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.courses.contains_key(course_id) {
            return None;
        }
        let ticket = inner.next_ticket;
        inner.next_ticket += 1;
        let course_id = ElementId::from(course_id);
        inner.courses.insert(course_id.clone(), ticket);
        Some(Reservation { set, course_id, ticket })
    }

    fn clear(set: &StdMutex<Self>) {
        set.lock().unwrap_or_else(PoisonError::into_inner).courses.clear();
    }
}

/// Releases its in-flight entry when dropped, including when the expand future is cancelled
/// mid-fetch.
struct Reservation<'a> {
    set: &'a StdMutex<InFlight>,
    course_id: ElementId,
    ticket: u64,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        let mut inner = self.set.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.courses.get(&self.course_id) == Some(&self.ticket) {
            inner.courses.remove(&self.course_id);
        }
    }
}

/// Live, expandable prerequisite graph.
pub struct ExpandState<S> {
    source: S,
    layout: TreeLayout,
    graph: Mutex<LiveGraph>,
    in_flight: StdMutex<InFlight>,
    revision: watch::Sender<u64>,
}

impl<S: CourseSource> ExpandState<S> {
    pub fn new(source: S, initial_ast: &AstNode, target_course_id: &str) -> Self {
        let elements = ast_to_elements(initial_ast, target_course_id);
        let (revision, _) = watch::channel(0);
        Self {
            source,
            layout: TreeLayout::new().animate(true).edge_policy(EdgePolicy::FilterDangling),
            graph: Mutex::new(LiveGraph::new(ElementId::from(target_course_id), elements)),
            in_flight: StdMutex::new(InFlight::default()),
            revision,
        }
    }

    /// Replaces the layout settings. Incremental relayouts always filter dangling edges.
    pub fn with_layout(mut self, layout: TreeLayout) -> Self {
        self.layout = layout.edge_policy(EdgePolicy::FilterDangling);
        self
    }

    /// Revision counter, bumped after every change to the live graph or its layout.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub async fn elements(&self) -> Vec<GraphElement> {
        self.graph.lock().await.elements.clone()
    }

    pub async fn is_expanded(&self, course_id: &str) -> bool {
        self.graph.lock().await.expanded.contains_key(course_id)
    }

    pub async fn ref_count(&self, element_id: &str) -> usize {
        self.graph.lock().await.ref_counts.get(element_id).copied().unwrap_or(0)
    }

    pub async fn last_layout(&self) -> Option<LayoutResult> {
        self.graph.lock().await.layout.clone()
    }

    /// Controls for the last computed layout; empty before the first layout.
    pub async fn expand_controls(&self) -> Vec<ExpandControl> {
        let graph = self.graph.lock().await;
        graph.layout.as_ref().map(|layout| graph.expand_controls(layout)).unwrap_or_default()
    }

    /// Mirrors the live graph into `renderer` and lays it out. This first layout is strict:
    /// a dangling edge fails it instead of being filtered.
    pub async fn set_renderer(
        &self,
        mut renderer: Box<dyn GraphRenderer>,
    ) -> Result<LayoutResult, ExpandError> {
        let mut graph = self.graph.lock().await;
        let strict = self.layout.clone().edge_policy(EdgePolicy::Strict);
        let layout = strict.layout(&graph.elements)?;

        renderer.add(&graph.elements);
        graph.renderer = Some(renderer);
        graph.control_ids.clear();
        self.present(&mut graph, layout.clone());
        Ok(layout)
    }

    pub async fn relayout(&self) -> Result<LayoutResult, ExpandError> {
        let mut graph = self.graph.lock().await;
        let layout = self.layout.layout(&graph.elements)?;
        self.present(&mut graph, layout.clone());
        Ok(layout)
    }

    pub async fn expand_course(&self, course_id: &str) -> Result<ExpandOutcome, ExpandError> {
        let (generation, reservation) = {
            let graph = self.graph.lock().await;
            if graph.expanded.contains_key(course_id) || graph.is_target(course_id) {
                return Ok(ExpandOutcome::AlreadyExpanded);
            }
            if !graph.contains_node(course_id) {
                return Ok(ExpandOutcome::NotInGraph);
            }
            let Some(reservation) = InFlight::reserve(&self.in_flight, course_id) else {
                return Ok(ExpandOutcome::InFlight);
            };
            (graph.generation, reservation)
        };

        let fetched = self.source.fetch_course(course_id).await;

        let mut graph = self.graph.lock().await;
        drop(reservation);
        if graph.generation != generation {
            tracing::debug!(course_id, "graph cleared during fetch; dropping expansion");
            return Ok(ExpandOutcome::Stale);
        }

        let course = match fetched {
            Ok(course) => course,
            Err(err) => {
                tracing::warn!(course_id, error = %err, "failed to expand course");
                return Ok(ExpandOutcome::Failed);
            }
        };
        let Some(ast) = course.prerequisite_ast() else {
            tracing::info!(course_id, "no prerequisites");
            return Ok(ExpandOutcome::NoPrerequisites);
        };
        if !graph.contains_node(course_id) {
            tracing::debug!(course_id, "course left the graph during fetch; dropping expansion");
            return Ok(ExpandOutcome::Stale);
        }

        let snapshot = graph.snapshot();
        let (added, owned) = graph.merge(course_id, ast_to_elements(ast, course_id));
        if owned.is_empty() {
            tracing::info!(course_id, "prerequisites name no courses");
            return Ok(ExpandOutcome::NoPrerequisites);
        }

        let layout = match self.layout.layout(&graph.elements) {
            Ok(layout) => layout,
            Err(err) => {
                graph.restore(snapshot);
                return Err(err.into());
            }
        };

        let redirected = graph.redirects_for(course_id, &owned);
        tracing::debug!(
            course_id,
            added = added.len(),
            owned = owned.len(),
            redirected = redirected.len(),
            "expanded course"
        );
        graph.expanded.insert(ElementId::from(course_id), Expansion { owned, redirected });

        if let Some(renderer) = graph.renderer.as_mut() {
            renderer.add(&added);
            renderer.set_label(&expand_node_id(course_id), COLLAPSE_LABEL);
        }
        self.present(&mut graph, layout);

        Ok(ExpandOutcome::Expanded { added: added.len() })
    }

    pub async fn collapse_course(&self, course_id: &str) -> Result<CollapseOutcome, ExpandError> {
        let mut graph = self.graph.lock().await;
        if !graph.expanded.contains_key(course_id) {
            return Ok(CollapseOutcome::NotExpanded);
        }

        let mut order = graph.nested_expansions(course_id);
        order.push(ElementId::from(course_id));

        let mut removed = Vec::new();
        for expanded_id in &order {
            if let Some(expansion) = graph.expanded.remove(expanded_id) {
                removed.extend(graph.release(&expansion.owned));
            }
        }
        tracing::debug!(
            course_id,
            nested = order.len() - 1,
            removed = removed.len(),
            "collapsed course"
        );

        if let Some(renderer) = graph.renderer.as_mut() {
            if !removed.is_empty() {
                renderer.remove(&removed);
            }
        }

        let layout = self.layout.layout(&graph.elements)?;
        self.present(&mut graph, layout);
        Ok(CollapseOutcome::Collapsed { removed: removed.len() })
    }

    /// Empties the graph and detaches the renderer. Fetches still in flight become stale.
    pub async fn clear(&self) {
        let mut graph = self.graph.lock().await;
        let generation = graph.generation + 1;
        *graph = LiveGraph { generation, ..LiveGraph::default() };
        InFlight::clear(&self.in_flight);
        self.bump();
    }

    /// Hands a fresh layout to the renderer: controls are swapped out around it and every
    /// live redirect is reapplied.
    fn present(&self, graph: &mut LiveGraph, layout: LayoutResult) {
        let controls = graph.expand_controls(&layout);
        if let Some(renderer) = graph.renderer.as_mut() {
            if !graph.control_ids.is_empty() {
                renderer.remove(&std::mem::take(&mut graph.control_ids));
            }
            renderer.apply_layout(&layout);
            for control in &controls {
                renderer.add_at(&control.node, control.position);
                renderer.add(std::slice::from_ref(&control.edge));
                graph.control_ids.push(control.node.id().clone());
                graph.control_ids.push(control.edge.id().clone());
            }
            for (course_id, expansion) in &graph.expanded {
                let control_id = expand_node_id(course_id);
                for edge_id in &expansion.redirected {
                    renderer.move_edge_target(edge_id, &control_id);
                }
            }
        }
        graph.layout = Some(layout);
        self.bump();
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}
