// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Coursemap: prerequisite graphs for course catalogs.
//!
//! A prerequisite expression ([`model::AstNode`]) is compiled into graph elements
//! ([`compile::ast_to_elements`]), positioned by [`layout`] and grown or shrunk interactively
//! through [`expand::ExpandState`]. [`query`] holds the traversal helpers the interactive views
//! use for highlighting and filtering.

pub mod compile;
pub mod expand;
pub mod layout;
pub mod model;
pub mod query;
