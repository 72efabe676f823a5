// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::model::Course;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    NotFound { course_id: String },
    Transport(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { course_id } => write!(f, "course not found: {course_id}"),
            Self::Transport(message) => write!(f, "course fetch failed: {message}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Where expanded courses come from.
///
/// `course_id` is the canonical course string. Implementations talking to the course API
/// build the request path with [`crate::model::sanitize_course_id`]. A course without a
/// prerequisite tree is a successful fetch, not an error.
pub trait CourseSource: Send + Sync {
    fn fetch_course(
        &self,
        course_id: &str,
    ) -> impl Future<Output = Result<Course, FetchError>> + Send;
}

impl<T: CourseSource> CourseSource for Arc<T> {
    fn fetch_course(
        &self,
        course_id: &str,
    ) -> impl Future<Output = Result<Course, FetchError>> + Send {
        (**self).fetch_course(course_id)
    }
}

/// Courses held in memory, keyed by canonical id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCourses {
    courses: BTreeMap<String, Course>,
}

impl InMemoryCourses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, course: Course) {
        self.courses.insert(course.course_reference.canonical(), course);
    }

    pub fn with(mut self, course: Course) -> Self {
        self.insert(course);
        self
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl FromIterator<Course> for InMemoryCourses {
    fn from_iter<I: IntoIterator<Item = Course>>(iter: I) -> Self {
        let mut courses = Self::new();
        for course in iter {
            courses.insert(course);
        }
        courses
    }
}

impl CourseSource for InMemoryCourses {
    fn fetch_course(
        &self,
        course_id: &str,
    ) -> impl Future<Output = Result<Course, FetchError>> + Send {
        let result = self
            .courses
            .get(course_id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound { course_id: course_id.to_owned() });
        std::future::ready(result)
    }
}
