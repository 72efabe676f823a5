// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::layout::{LayoutResult, Point};
use crate::model::{ElementId, GraphElement};

/// The rendering engine the live graph is mirrored into.
///
/// Calls arrive in a fixed order per change: element additions/removals, then
/// `apply_layout`, then expand controls via `add_at`, then edge redirects.
pub trait GraphRenderer: Send {
    fn add(&mut self, elements: &[GraphElement]);

    /// Adds a single element at a fixed position, outside the layout.
    fn add_at(&mut self, element: &GraphElement, position: Point);

    /// Removes elements by id; unknown ids are ignored.
    fn remove(&mut self, ids: &[ElementId]);

    fn apply_layout(&mut self, layout: &LayoutResult);

    fn set_label(&mut self, node_id: &str, label: &str);

    fn move_edge_target(&mut self, edge_id: &str, target: &str);
}
