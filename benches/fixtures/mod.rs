// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use coursemap::layout::LayoutResult;
use coursemap::model::{AstNode, GraphElement};

const SUBJECTS: [&str; 4] = ["COMP SCI", "MATH", "STAT", "E C E"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AstParams {
    /// Operator nesting depth below the root operator.
    pub depth: usize,
    /// Children per operator.
    pub fanout: usize,
    /// Distinct course numbers; smaller pools produce more shared prerequisites.
    pub course_pool: u32,
    /// Every n-th leaf is free text instead of a course (0 = never).
    pub text_every: usize,
}

impl AstParams {
    pub const fn new(depth: usize, fanout: usize, course_pool: u32, text_every: usize) -> Self {
        Self { depth, fanout, course_pool, text_every }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    MediumShared,
    LargeWide,
}

impl Case {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::MediumShared => "medium_shared",
            Self::LargeWide => "large_wide",
        }
    }

    pub const fn params(self) -> AstParams {
        match self {
            Self::Small => AstParams::new(1, 3, 64, 0),
            Self::MediumShared => AstParams::new(3, 3, 12, 5),
            Self::LargeWide => AstParams::new(3, 6, 400, 7),
        }
    }
}

struct Generator {
    params: AstParams,
    leaves: usize,
}

impl Generator {
    fn leaf(&mut self) -> AstNode {
        self.leaves += 1;
        if self.params.text_every > 0 && self.leaves % self.params.text_every == 0 {
            return AstNode::text(format!("consent of instructor {}", self.leaves));
        }
        let pool = self.params.course_pool.max(1);
        let index = (self.leaves as u32).wrapping_mul(7919) % pool;
        let subject = SUBJECTS[index as usize % SUBJECTS.len()];
        let number = 100 + index * 3;
        if index % 5 == 0 {
            // Cross-listed course.
            AstNode::course([subject, SUBJECTS[(index as usize + 1) % SUBJECTS.len()]], number)
        } else {
            AstNode::course([subject], number)
        }
    }

    fn operator(&mut self, level: usize) -> AstNode {
        let children = (0..self.params.fanout)
            .map(|idx| {
                if level < self.params.depth && idx % 2 == 0 {
                    self.operator(level + 1)
                } else {
                    self.leaf()
                }
            })
            .collect::<Vec<_>>();
        if level % 2 == 0 {
            AstNode::and(children)
        } else {
            AstNode::or(children)
        }
    }
}

pub fn ast(params: AstParams) -> AstNode {
    Generator { params, leaves: 0 }.operator(0)
}

pub fn fixture(case: Case) -> AstNode {
    ast(case.params())
}

pub const TARGET: &str = "COMP SCI 999";

pub fn checksum_elements(elements: &[GraphElement]) -> u64 {
    let mut acc = 0u64;
    for element in elements {
        acc = acc.wrapping_mul(131).wrapping_add(element.id().len() as u64);
        acc = acc.wrapping_add(u64::from(element.is_edge()));
    }
    acc
}

pub fn checksum_layout(layout: &LayoutResult) -> u64 {
    let mut acc = 0u64;
    for point in layout.positions().values() {
        acc = acc.wrapping_mul(31).wrapping_add(point.x.to_bits());
        acc = acc.wrapping_add(point.y.to_bits());
    }
    acc
}
