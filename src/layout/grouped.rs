// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Parameters for the renderer's force-directed layout of department graphs. The physics
//! run itself belongs to the renderer.

use serde::Serialize;

use super::{ANIMATION_DURATION_MS, ANIMATION_EASING, FIT_PADDING};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutQuality {
    Draft,
    Default,
    Proof,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedLayoutConfig {
    pub name: &'static str,
    pub quality: LayoutQuality,
    pub animate: bool,
    pub animation_duration: u32,
    pub animation_easing: &'static str,
    pub fit: bool,
    pub padding: f64,
    pub node_dimensions_include_labels: bool,
    pub uniform_node_dimensions: bool,
    pub pack_components: bool,
    pub node_repulsion: f64,
    pub ideal_edge_length: f64,
    pub edge_elasticity: f64,
    pub nesting_factor: f64,
    pub gravity: f64,
    pub gravity_range_compound: f64,
    pub gravity_compound: f64,
    pub gravity_range: f64,
    pub initial_energy_on_incremental: f64,
    pub randomize: bool,
}

pub fn generate_grouped_layout(animate: bool) -> GroupedLayoutConfig {
    GroupedLayoutConfig {
        name: "fcose",
        quality: LayoutQuality::Proof,
        animate,
        animation_duration: ANIMATION_DURATION_MS,
        animation_easing: ANIMATION_EASING,
        fit: true,
        padding: FIT_PADDING,
        node_dimensions_include_labels: true,
        uniform_node_dimensions: true,
        pack_components: true,
        node_repulsion: 40000.0,
        ideal_edge_length: 60.0,
        edge_elasticity: 0.002,
        nesting_factor: 1.0,
        gravity: 1.0,
        gravity_range_compound: 1.0,
        gravity_compound: 0.1,
        gravity_range: 1.5,
        initial_energy_on_incremental: 0.1,
        randomize: true,
    }
}
