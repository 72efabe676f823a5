// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over course graphs.
//!
//! These back the interactive views: prerequisite paths, highlighting, taken/next course
//! marking and subject filtering.

pub mod paths;

pub use paths::{
    classify_courses, filter_elements_by_root_course, hide_subject, highlight_path,
    mark_next_courses, predecessors_not_taken, CourseClasses, PathHighlight,
};
