// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::format_smolstr;

use crate::model::{ElementId, Operator};

/// Call-scoped allocator for synthetic operator and edge ids.
///
/// Ids are salted with the target course id so elements from different expansions never
/// collide in one live graph: `one-of-<target>-<n>`, `and-<target>-<n>`, `edge-<target>-<n>`.
#[derive(Debug)]
pub(crate) struct SyntheticIds {
    scope: String,
    one_of: usize,
    and: usize,
    edges: usize,
}

/// An operator id handed out by [`SyntheticIds::reserve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reserved {
    operator: Operator,
    index: usize,
    id: ElementId,
}

impl Reserved {
    pub(crate) fn id(&self) -> &ElementId {
        &self.id
    }
}

impl SyntheticIds {
    pub(crate) fn new(scope: impl Into<String>) -> Self {
        Self { scope: scope.into(), one_of: 0, and: 0, edges: 0 }
    }

    pub(crate) fn reserve(&mut self, operator: Operator) -> Reserved {
        let (prefix, counter) = match operator {
            Operator::Or => ("one-of", &mut self.one_of),
            Operator::And => ("and", &mut self.and),
        };
        let index = *counter;
        *counter += 1;
        Reserved { operator, index, id: format_smolstr!("{prefix}-{}-{index}", self.scope) }
    }

    /// Returns an unused reservation so the next one reuses its number.
    ///
    /// Only the most recent reservation of a kind can be returned; anything older is already
    /// followed by a live id and stays a gap.
    pub(crate) fn reclaim(&mut self, reserved: Reserved) {
        let counter = match reserved.operator {
            Operator::Or => &mut self.one_of,
            Operator::And => &mut self.and,
        };
        if *counter == reserved.index + 1 {
            *counter -= 1;
        }
    }

    pub(crate) fn next_edge_id(&mut self) -> ElementId {
        let id = format_smolstr!("edge-{}-{}", self.scope, self.edges);
        self.edges += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::SyntheticIds;
    use crate::model::Operator;

    #[test]
    fn reclaim_reuses_last_number() {
        let mut ids = SyntheticIds::new("T 1");
        let first = ids.reserve(Operator::Or);
        assert_eq!(first.id(), "one-of-T 1-0");
        ids.reclaim(first);
        let again = ids.reserve(Operator::Or);
        assert_eq!(again.id(), "one-of-T 1-0");
    }

    #[test]
    fn reclaim_of_older_reservation_leaves_gap() {
        let mut ids = SyntheticIds::new("T 1");
        let outer = ids.reserve(Operator::And);
        let inner = ids.reserve(Operator::And);
        assert_eq!(inner.id(), "and-T 1-1");
        ids.reclaim(outer);
        assert_eq!(ids.reserve(Operator::And).id(), "and-T 1-2");
    }

    #[test]
    fn counters_are_independent_per_kind() {
        let mut ids = SyntheticIds::new("X 9");
        assert_eq!(ids.reserve(Operator::Or).id(), "one-of-X 9-0");
        assert_eq!(ids.reserve(Operator::And).id(), "and-X 9-0");
        assert_eq!(ids.next_edge_id(), "edge-X 9-0");
        assert_eq!(ids.next_edge_id(), "edge-X 9-1");
    }
}
