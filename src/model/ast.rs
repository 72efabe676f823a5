// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::course::CourseReference;

/// A prerequisite expression.
///
/// The JSON form matches the course API: a bare string is free text, an object with
/// `subjects`/`course_number` is a course, and an object with `operator`/`children` is an
/// AND/OR node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AstNode {
    Text(String),
    Course(CourseReference),
    Operator(OperatorNode),
}

impl AstNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn course<I, S>(subjects: I, course_number: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Course(CourseReference::new(subjects, course_number))
    }

    pub fn and(children: impl IntoIterator<Item = AstNode>) -> Self {
        Self::Operator(OperatorNode::new(Operator::And, children))
    }

    pub fn or(children: impl IntoIterator<Item = AstNode>) -> Self {
        Self::Operator(OperatorNode::new(Operator::Or, children))
    }

    /// Every course referenced anywhere in the expression, in traversal order.
    pub fn course_references(&self) -> Vec<&CourseReference> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Text(_) => {}
                Self::Course(reference) => out.push(reference),
                Self::Operator(op) => stack.extend(op.children.iter().rev()),
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub fn label(self) -> &'static str {
        match self {
            Self::And => "all of",
            Self::Or => "one of",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OperatorNode {
    pub operator: Operator,
    pub children: Vec<AstNode>,
}

impl OperatorNode {
    pub fn new(operator: Operator, children: impl IntoIterator<Item = AstNode>) -> Self {
        Self { operator, children: children.into_iter().collect() }
    }
}
