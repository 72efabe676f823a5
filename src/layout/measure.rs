// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::NodeData;

pub const COURSE_FONT_SIZE: f64 = 8.0;
pub const OPERATOR_FONT_SIZE: f64 = 8.0;
pub const COURSE_PADDING_X: f64 = 10.0;
pub const COURSE_PADDING_Y: f64 = 5.0;
pub const OPERATOR_PADDING_X: f64 = 6.0;
pub const OPERATOR_PADDING_Y: f64 = 3.0;

/// Average glyph advance of the graph's sans-serif face, as a fraction of the font size.
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

pub const LAYERED_CHAR_WIDTH: f64 = 7.5;
pub const LAYERED_WIDTH_PADDING: f64 = 10.0;
pub const LAYERED_OPERATOR_HEIGHT: f64 = 20.0;
pub const LAYERED_CODE_HEIGHT: f64 = 15.0;
pub const LAYERED_TITLE_HEIGHT: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * GLYPH_WIDTH_RATIO
}

/// The node's label, falling back to its title and then its id.
fn label_or_fallback(node: &NodeData) -> &str {
    [node.label(), node.title()]
        .into_iter()
        .find(|text| !text.is_empty())
        .unwrap_or(node.id().as_str())
}

/// The text a node is drawn with: its short code label, or its title when titles are shown
/// and the node has one.
pub fn display_text(node: &NodeData, label_is_code: bool) -> &str {
    if label_is_code || node.title().is_empty() {
        label_or_fallback(node)
    } else {
        node.title()
    }
}

/// Rendered size of a node in the prerequisite tree layout.
pub fn tree_node_size(node: &NodeData, label_is_code: bool) -> Size {
    let text = display_text(node, label_is_code);
    if node.is_operator() {
        Size::new(
            text_width(text, OPERATOR_FONT_SIZE) + OPERATOR_PADDING_X * 2.0,
            OPERATOR_FONT_SIZE + OPERATOR_PADDING_Y * 2.0,
        )
    } else {
        Size::new(
            text_width(text, COURSE_FONT_SIZE) + COURSE_PADDING_X * 2.0,
            COURSE_FONT_SIZE + COURSE_PADDING_Y * 2.0,
        )
    }
}

/// Size estimate for the plain layered layout, which sizes by character count only.
pub fn layered_node_size(node: &NodeData, label_is_code: bool) -> Size {
    let text = if label_is_code { node.id().as_str() } else { label_or_fallback(node) };
    let width = text.chars().count() as f64 * LAYERED_CHAR_WIDTH + LAYERED_WIDTH_PADDING;
    let height = if node.is_operator() {
        LAYERED_OPERATOR_HEIGHT
    } else if label_is_code {
        LAYERED_CODE_HEIGHT
    } else {
        LAYERED_TITLE_HEIGHT
    };
    Size::new(width, height)
}
