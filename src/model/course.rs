// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ast::AstNode;

/// Number of leading characters kept from each subject in a display label.
pub const LABEL_SUBJECT_CHARS: usize = 4;

/// Number of subjects shown in a display label.
pub const LABEL_SUBJECT_COUNT: usize = 2;

/// A reference to a (possibly cross-listed) course.
///
/// Subjects are kept sorted, so the canonical string is a pure function of the set of
/// subjects and the number. Two references denote the same graph node iff their canonical
/// strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct CourseReference {
    subjects: BTreeSet<String>,
    course_number: u32,
}

impl CourseReference {
    pub fn new<I, S>(subjects: I, course_number: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { subjects: subjects.into_iter().map(Into::into).collect(), course_number }
    }

    pub fn subjects(&self) -> &BTreeSet<String> {
        &self.subjects
    }

    pub fn course_number(&self) -> u32 {
        self.course_number
    }

    /// `"COMPSCI/MATH 240"`: sorted subjects joined by `/`, a space, the number.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        for (idx, subject) in self.subjects.iter().enumerate() {
            if idx > 0 {
                out.push('/');
            }
            out.push_str(subject);
        }
        out.push(' ');
        out.push_str(&self.course_number.to_string());
        out
    }

    /// The canonical string with spaces and slashes replaced by `_`, as used in course URLs.
    pub fn sanitized(&self) -> String {
        sanitize_course_id(&self.canonical())
    }

    /// Short, lossy display label such as `"COMP/MATH 240"`.
    pub fn short_label(&self) -> String {
        short_label(self.subjects.iter().map(String::as_str), self.course_number)
    }
}

impl fmt::Display for CourseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseParseError {
    MissingNumber { input: String },
    InvalidNumber { input: String },
    EmptySubject { input: String },
}

impl fmt::Display for CourseParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNumber { input } => write!(f, "course id '{input}' has no course number"),
            Self::InvalidNumber { input } => {
                write!(f, "course id '{input}' has an invalid course number")
            }
            Self::EmptySubject { input } => write!(f, "course id '{input}' has an empty subject"),
        }
    }
}

impl std::error::Error for CourseParseError {}

impl FromStr for CourseReference {
    type Err = CourseParseError;

    /// Parses a canonical string. Subjects may contain spaces (`"COMP SCI 400"`), so the
    /// number is whatever follows the last space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (subjects, number) = trimmed
            .rsplit_once(' ')
            .ok_or_else(|| CourseParseError::MissingNumber { input: s.to_owned() })?;
        let course_number = number
            .parse::<u32>()
            .map_err(|_| CourseParseError::InvalidNumber { input: s.to_owned() })?;

        let mut parsed = BTreeSet::new();
        for subject in subjects.split('/') {
            let subject = subject.trim();
            if subject.is_empty() {
                return Err(CourseParseError::EmptySubject { input: s.to_owned() });
            }
            parsed.insert(subject.to_owned());
        }

        Ok(Self { subjects: parsed, course_number })
    }
}

pub fn sanitize_course_id(course_id: &str) -> String {
    course_id.replace([' ', '/'], "_")
}

pub(crate) fn short_label<'a>(subjects: impl Iterator<Item = &'a str>, number: u32) -> String {
    let mut label = String::new();
    for (idx, subject) in subjects.take(LABEL_SUBJECT_COUNT).enumerate() {
        if idx > 0 {
            label.push('/');
        }
        label.extend(subject.chars().take(LABEL_SUBJECT_CHARS));
    }
    label.push(' ');
    label.push_str(&number.to_string());
    label
}

/// Display label for an arbitrary course id. Ids that do not parse as a canonical course
/// string are used verbatim.
pub fn course_id_label(course_id: &str) -> String {
    match course_id.parse::<CourseReference>() {
        Ok(reference) => reference.short_label(),
        Err(_) => course_id.to_owned(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoursePrerequisites {
    #[serde(default)]
    pub prerequisites_text: String,
    #[serde(default)]
    pub course_references: Vec<CourseReference>,
    #[serde(default)]
    pub abstract_syntax_tree: Option<AstNode>,
}

/// The subset of the course API payload the graph engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub course_reference: CourseReference,
    #[serde(default)]
    pub course_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisites: CoursePrerequisites,
}

impl Course {
    pub fn new(course_reference: CourseReference) -> Self {
        Self {
            course_reference,
            course_title: String::new(),
            description: String::new(),
            prerequisites: CoursePrerequisites::default(),
        }
    }

    pub fn with_prerequisites(mut self, ast: AstNode) -> Self {
        self.prerequisites.abstract_syntax_tree = Some(ast);
        self
    }

    pub fn prerequisite_ast(&self) -> Option<&AstNode> {
        self.prerequisites.abstract_syntax_tree.as_ref()
    }
}
