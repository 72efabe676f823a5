// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layered graph solver boundary.
//!
//! [`LayeredSolver`] mirrors the JSON contract of an ELK-style layered layout engine: nodes
//! with sizes and hyperedges in, top-left node positions out. [`SimpleLayeredSolver`] is the
//! in-process implementation:
//!
//! 1. break cycles by reversing DFS back edges,
//! 2. longest-path layering with every sink in the last layer,
//! 3. split edges that span several layers with virtual nodes,
//! 4. barycenter layer sweeps, keeping the ordering with the fewest crossings,
//! 5. place nodes along the layer axis by repeatedly pulling each layer toward the mean of
//!    its neighbors (least squares under the spacing constraints).

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

use super::LayoutError;
use crate::model::ElementId;

const CROSSING_SWEEPS: usize = 4;
const BALANCE_PASSES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Right,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeRouting {
    #[default]
    Orthogonal,
    Polyline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodePlacement {
    /// Balanced placement; the built-in solver approximates network simplex by least-squares
    /// alignment of each node with its neighbors.
    #[default]
    NetworkSimplex,
    /// Nodes packed from the top of each layer.
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layering {
    #[default]
    LongestPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossingMinimization {
    #[default]
    LayerSweep,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayeredOptions {
    pub direction: Direction,
    pub edge_routing: EdgeRouting,
    pub node_placement: NodePlacement,
    pub layering: Layering,
    pub crossing_minimization: CrossingMinimization,
    pub node_spacing: f64,
    pub layer_spacing: f64,
}

impl Default for LayeredOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Right,
            edge_routing: EdgeRouting::Orthogonal,
            node_placement: NodePlacement::NetworkSimplex,
            layering: Layering::LongestPath,
            crossing_minimization: CrossingMinimization::LayerSweep,
            node_spacing: super::LAYERED_NODE_SPACING,
            layer_spacing: super::LAYERED_LAYER_SPACING,
        }
    }
}

impl LayeredOptions {
    pub fn with_spacing(mut self, node_spacing: f64, layer_spacing: f64) -> Self {
        self.node_spacing = node_spacing;
        self.layer_spacing = layer_spacing;
        self
    }

    /// The option map an ELK layered engine would be configured with.
    pub fn elk_options(&self) -> BTreeMap<&'static str, String> {
        let mut options = BTreeMap::new();
        options.insert("elk.algorithm", "layered".to_owned());
        let direction = match self.direction {
            Direction::Right => "RIGHT",
            Direction::Down => "DOWN",
        };
        options.insert("elk.direction", direction.to_owned());
        let routing = match self.edge_routing {
            EdgeRouting::Orthogonal => "ORTHOGONAL",
            EdgeRouting::Polyline => "POLYLINE",
        };
        options.insert("elk.edgeRouting", routing.to_owned());
        let placement = match self.node_placement {
            NodePlacement::NetworkSimplex => "NETWORK_SIMPLEX",
            NodePlacement::Simple => "SIMPLE",
        };
        options.insert("elk.layered.nodePlacement.strategy", placement.to_owned());
        options.insert("elk.layered.layering.strategy", "LONGEST_PATH".to_owned());
        let crossing = match self.crossing_minimization {
            CrossingMinimization::LayerSweep => "LAYER_SWEEP",
            CrossingMinimization::None => "NONE",
        };
        options.insert("elk.layered.crossingMinimization.strategy", crossing.to_owned());
        options.insert("elk.spacing.nodeNode", self.node_spacing.to_string());
        options
            .insert("elk.layered.spacing.nodeNodeBetweenLayers", self.layer_spacing.to_string());
        options
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverNode {
    pub id: ElementId,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverEdge {
    pub id: ElementId,
    pub sources: SmallVec<[ElementId; 1]>,
    pub targets: SmallVec<[ElementId; 1]>,
}

impl SolverEdge {
    pub fn simple(id: ElementId, source: ElementId, target: ElementId) -> Self {
        let mut sources = SmallVec::new();
        sources.push(source);
        let mut targets = SmallVec::new();
        targets.push(target);
        Self { id, sources, targets }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverGraph {
    pub nodes: Vec<SolverNode>,
    pub edges: Vec<SolverEdge>,
    pub options: LayeredOptions,
}

/// A solved node; `x`/`y` is its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedNode {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolverOutput {
    pub children: Vec<SolvedNode>,
}

pub trait LayeredSolver: Send + Sync {
    fn solve(&self, graph: &SolverGraph) -> Result<SolverOutput, LayoutError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleLayeredSolver {
    crossing_sweeps: usize,
    balance_passes: usize,
}

impl Default for SimpleLayeredSolver {
    fn default() -> Self {
        Self { crossing_sweeps: CROSSING_SWEEPS, balance_passes: BALANCE_PASSES }
    }
}

impl LayeredSolver for SimpleLayeredSolver {
    fn solve(&self, graph: &SolverGraph) -> Result<SolverOutput, LayoutError> {
        if graph.nodes.is_empty() {
            return Ok(SolverOutput::default());
        }

        let mut index = BTreeMap::<&str, usize>::new();
        for (idx, node) in graph.nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), idx).is_some() {
                return Err(LayoutError::Solver(format!("duplicate node {}", node.id)));
            }
        }

        let mut pairs = Vec::new();
        for edge in &graph.edges {
            for source in &edge.sources {
                for target in &edge.targets {
                    let lookup = |id: &ElementId| {
                        index.get(id.as_str()).copied().ok_or_else(|| {
                            LayoutError::Solver(format!(
                                "edge {} references unknown node {id}",
                                edge.id
                            ))
                        })
                    };
                    let (s, t) = (lookup(source)?, lookup(target)?);
                    if s != t {
                        pairs.push((s, t));
                    }
                }
            }
        }

        let dag = break_cycles(graph.nodes.len(), &pairs);
        let layer_of = assign_layers(graph.nodes.len(), &dag);

        let options = &graph.options;
        let breadth = graph
            .nodes
            .iter()
            .map(|node| match options.direction {
                Direction::Right => node.height,
                Direction::Down => node.width,
            })
            .collect::<Vec<_>>();
        let mut proper = ProperGraph::build(&layer_of, &breadth, &dag);

        if options.crossing_minimization == CrossingMinimization::LayerSweep {
            proper.minimize_crossings(self.crossing_sweeps);
        }

        let mut coords = proper.pack(options.node_spacing);
        if options.node_placement == NodePlacement::NetworkSimplex {
            proper.balance(&mut coords, options.node_spacing, self.balance_passes);
        }

        Ok(proper.output(graph, &coords))
    }
}

const UNVISITED: u8 = 0;
const ON_STACK: u8 = 1;
const DONE: u8 = 2;

/// Reverses every DFS back edge so the result is acyclic; duplicate pairs collapse.
fn break_cycles(node_count: usize, pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut outgoing = vec![Vec::<usize>::new(); node_count];
    for (edge_idx, &(source, _)) in pairs.iter().enumerate() {
        outgoing[source].push(edge_idx);
    }

    let mut state = vec![UNVISITED; node_count];
    let mut reversed = vec![false; pairs.len()];
    for start in 0..node_count {
        if state[start] != UNVISITED {
            continue;
        }
        state[start] = ON_STACK;
        let mut stack = vec![(start, 0usize)];
        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            match outgoing[node].get(cursor) {
                Some(&edge_idx) => {
                    frame.1 += 1;
                    let next = pairs[edge_idx].1;
                    match state[next] {
                        ON_STACK => reversed[edge_idx] = true,
                        UNVISITED => {
                            state[next] = ON_STACK;
                            stack.push((next, 0));
                        }
                        _ => {}
                    }
                }
                None => {
                    state[node] = DONE;
                    stack.pop();
                }
            }
        }
    }

    pairs
        .iter()
        .zip(reversed)
        .map(|(&(s, t), rev)| if rev { (t, s) } else { (s, t) })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Longest-path layering measured from the sinks: a node sits one layer before its
/// furthest-reaching successor, so every sink lands in the last layer.
fn assign_layers(node_count: usize, dag: &[(usize, usize)]) -> Vec<usize> {
    let mut successors = vec![Vec::<usize>::new(); node_count];
    let mut indegree = vec![0usize; node_count];
    for &(s, t) in dag {
        successors[s].push(t);
        indegree[t] += 1;
    }

    let mut ready = (0..node_count).filter(|&v| indegree[v] == 0).collect::<BTreeSet<_>>();
    let mut topo = Vec::with_capacity(node_count);
    while let Some(next) = ready.pop_first() {
        topo.push(next);
        for &succ in &successors[next] {
            indegree[succ] -= 1;
            if indegree[succ] == 0 {
                ready.insert(succ);
            }
        }
    }

    let mut height = vec![0usize; node_count];
    for &node in topo.iter().rev() {
        height[node] = successors[node].iter().map(|&s| height[s] + 1).max().unwrap_or(0);
    }
    let max_height = height.iter().copied().max().unwrap_or(0);
    height.into_iter().map(|h| max_height - h).collect()
}

type Adjacency = SmallVec<[usize; 4]>;

/// Layered graph in which every edge joins consecutive layers. Vertices `0..real` are the
/// caller's nodes, the rest are virtual nodes splitting long edges.
struct ProperGraph {
    real: usize,
    layer: Vec<usize>,
    breadth: Vec<f64>,
    preds: Vec<Adjacency>,
    succs: Vec<Adjacency>,
    layers: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Preds,
    Succs,
    Both,
}

impl ProperGraph {
    fn build(layer_of: &[usize], breadth: &[f64], dag: &[(usize, usize)]) -> Self {
        let real = layer_of.len();
        let mut graph = Self {
            real,
            layer: layer_of.to_vec(),
            breadth: breadth.to_vec(),
            preds: vec![Adjacency::new(); real],
            succs: vec![Adjacency::new(); real],
            layers: Vec::new(),
        };

        for &(source, target) in dag {
            let mut prev = source;
            for layer in (layer_of[source] + 1)..layer_of[target] {
                let virt = graph.layer.len();
                graph.layer.push(layer);
                graph.breadth.push(0.0);
                graph.preds.push(Adjacency::new());
                graph.succs.push(Adjacency::new());
                graph.link(prev, virt);
                prev = virt;
            }
            graph.link(prev, target);
        }

        graph.layers = graph.initial_order();
        graph
    }

    fn link(&mut self, from: usize, to: usize) {
        self.succs[from].push(to);
        self.preds[to].push(from);
    }

    /// Depth-first from the last layer back through predecessors, so the members of one
    /// subtree start out adjacent.
    fn initial_order(&self) -> Vec<Vec<usize>> {
        let layer_count = self.layer.iter().copied().max().map_or(0, |max| max + 1);
        let mut layers = vec![Vec::new(); layer_count];
        let mut seen = vec![false; self.layer.len()];

        let mut roots = (0..self.layer.len())
            .filter(|&v| self.succs[v].is_empty())
            .collect::<Vec<_>>();
        roots.extend(0..self.layer.len());

        for root in roots {
            if seen[root] {
                continue;
            }
            seen[root] = true;
            let mut stack = vec![root];
            while let Some(v) = stack.pop() {
                layers[self.layer[v]].push(v);
                for &pred in self.preds[v].iter().rev() {
                    if !seen[pred] {
                        seen[pred] = true;
                        stack.push(pred);
                    }
                }
            }
        }

        layers
    }

    fn positions(&self) -> Vec<usize> {
        let mut pos = vec![0usize; self.layer.len()];
        for layer in &self.layers {
            for (idx, &v) in layer.iter().enumerate() {
                pos[v] = idx;
            }
        }
        pos
    }

    fn neighbors(&self, v: usize, side: Side) -> impl Iterator<Item = usize> + '_ {
        let preds = matches!(side, Side::Preds | Side::Both);
        let succs = matches!(side, Side::Succs | Side::Both);
        let p: &[usize] = if preds { &self.preds[v] } else { &[] };
        let s: &[usize] = if succs { &self.succs[v] } else { &[] };
        p.iter().chain(s.iter()).copied()
    }

    fn crossings(&self) -> usize {
        let pos = self.positions();
        let mut total = 0usize;
        for layer in &self.layers {
            let segments = layer
                .iter()
                .flat_map(|&v| self.succs[v].iter().map(move |&w| (v, w)))
                .map(|(v, w)| (pos[v], pos[w]))
                .collect::<Vec<_>>();
            for (i, a) in segments.iter().enumerate() {
                for b in &segments[i + 1..] {
                    if (a.0 < b.0 && a.1 > b.1) || (a.0 > b.0 && a.1 < b.1) {
                        total += 1;
                    }
                }
            }
        }
        total
    }

    fn reorder(&mut self, layer_idx: usize, side: Side) {
        let pos = self.positions();
        let mut keyed = self.layers[layer_idx]
            .iter()
            .enumerate()
            .map(|(current, &v)| {
                let (sum, count) = self
                    .neighbors(v, side)
                    .fold((0usize, 0usize), |(sum, count), n| (sum + pos[n], count + 1));
                let key = if count == 0 { current as f64 } else { sum as f64 / count as f64 };
                (key, current, v)
            })
            .collect::<Vec<_>>();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        self.layers[layer_idx] = keyed.into_iter().map(|(_, _, v)| v).collect();
    }

    fn minimize_crossings(&mut self, sweeps: usize) {
        let layer_count = self.layers.len();
        if layer_count < 2 {
            return;
        }

        let mut best = self.layers.clone();
        let mut best_crossings = self.crossings();
        for _ in 0..sweeps {
            if best_crossings == 0 {
                break;
            }
            for layer_idx in 1..layer_count {
                self.reorder(layer_idx, Side::Preds);
            }
            for layer_idx in (0..layer_count - 1).rev() {
                self.reorder(layer_idx, Side::Succs);
            }
            let crossings = self.crossings();
            if crossings < best_crossings {
                best_crossings = crossings;
                best = self.layers.clone();
            }
        }
        self.layers = best;
    }

    /// Minimum center-to-center offsets of a layer's members from its first member.
    fn offsets(&self, layer: &[usize], spacing: f64) -> Vec<f64> {
        let mut offsets = Vec::with_capacity(layer.len());
        let mut acc = 0.0;
        for (idx, &v) in layer.iter().enumerate() {
            if idx > 0 {
                let prev = layer[idx - 1];
                acc += (self.breadth[prev] + self.breadth[v]) / 2.0 + spacing;
            }
            offsets.push(acc);
        }
        offsets
    }

    /// Packs each layer tightly and centers it on zero.
    fn pack(&self, spacing: f64) -> Vec<f64> {
        let mut coords = vec![0.0; self.layer.len()];
        for layer in &self.layers {
            let offsets = self.offsets(layer, spacing);
            let span = offsets.last().copied().unwrap_or(0.0);
            for (&v, offset) in layer.iter().zip(offsets) {
                coords[v] = offset - span / 2.0;
            }
        }
        coords
    }

    fn balance(&self, coords: &mut [f64], spacing: f64, passes: usize) {
        let layer_count = self.layers.len();
        for pass in 0..passes {
            let side = if pass + 1 == passes {
                Side::Both
            } else if pass % 2 == 0 {
                Side::Preds
            } else {
                Side::Succs
            };
            let order: Vec<usize> = match side {
                Side::Preds => (1..layer_count).collect(),
                Side::Succs => (0..layer_count.saturating_sub(1)).rev().collect(),
                Side::Both => (0..layer_count).collect(),
            };
            for layer_idx in order {
                self.align_layer(layer_idx, side, coords, spacing);
            }
        }
    }

    fn align_layer(&self, layer_idx: usize, side: Side, coords: &mut [f64], spacing: f64) {
        let layer = &self.layers[layer_idx];
        let desired = layer
            .iter()
            .map(|&v| {
                let (sum, count) = self
                    .neighbors(v, side)
                    .fold((0.0, 0usize), |(sum, count), n| (sum + coords[n], count + 1));
                if count == 0 {
                    coords[v]
                } else {
                    sum / count as f64
                }
            })
            .collect::<Vec<_>>();

        let offsets = self.offsets(layer, spacing);
        let shifted = desired.iter().zip(&offsets).map(|(d, o)| d - o).collect::<Vec<_>>();
        let fitted = isotonic_fit(&shifted);
        for ((&v, offset), base) in layer.iter().zip(offsets).zip(fitted) {
            coords[v] = base + offset;
        }
    }

    fn output(&self, graph: &SolverGraph, coords: &[f64]) -> SolverOutput {
        let options = &graph.options;
        let layer_count = self.layers.len();

        let mut extent = vec![0.0f64; layer_count];
        for (v, node) in graph.nodes.iter().enumerate() {
            let length = match options.direction {
                Direction::Right => node.width,
                Direction::Down => node.height,
            };
            extent[self.layer[v]] = extent[self.layer[v]].max(length);
        }
        let mut layer_pos = vec![0.0f64; layer_count];
        for idx in 1..layer_count {
            layer_pos[idx] = layer_pos[idx - 1] + extent[idx - 1] + options.layer_spacing;
        }

        let min_edge = (0..self.real)
            .map(|v| coords[v] - self.breadth[v] / 2.0)
            .fold(f64::INFINITY, f64::min);
        let min_edge = if min_edge.is_finite() { min_edge } else { 0.0 };

        let children = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(v, node)| {
                let along = layer_pos[self.layer[v]];
                let across = coords[v] - self.breadth[v] / 2.0 - min_edge;
                let (x, y) = match options.direction {
                    Direction::Right => (along, across),
                    Direction::Down => (across, along),
                };
                SolvedNode { id: node.id.clone(), x, y }
            })
            .collect();

        SolverOutput { children }
    }
}

/// Least-squares non-decreasing fit (pool adjacent violators).
fn isotonic_fit(values: &[f64]) -> Vec<f64> {
    let mut blocks: Vec<(f64, usize)> = Vec::with_capacity(values.len());
    for &value in values {
        blocks.push((value, 1));
        while blocks.len() >= 2 {
            let (sum_b, n_b) = blocks[blocks.len() - 1];
            let (sum_a, n_a) = blocks[blocks.len() - 2];
            if sum_a / n_a as f64 <= sum_b / n_b as f64 {
                break;
            }
            blocks.pop();
            let last = blocks.len() - 1;
            blocks[last] = (sum_a + sum_b, n_a + n_b);
        }
    }

    let mut out = Vec::with_capacity(values.len());
    for (sum, count) in blocks {
        let mean = sum / count as f64;
        out.extend(std::iter::repeat(mean).take(count));
    }
    out
}
