// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Prerequisite expressions (`AstNode`) come from the course API; graph elements
//! (`GraphElement`) are what the compiler, layout and expansion layers exchange.

pub mod ast;
pub mod course;
pub mod element;
#[cfg(test)]
pub(crate) mod fixtures;

pub use ast::{AstNode, Operator, OperatorNode};
pub use course::{
    course_id_label, sanitize_course_id, Course, CourseParseError, CoursePrerequisites,
    CourseReference,
};
pub use element::{
    parse_graph_data, EdgeData, EdgeKind, ElementId, GraphElement, NodeData, NodeKind,
};
