// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Coursemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Coursemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use coursemap::compile::ast_to_elements;
use coursemap::layout::{generate_layered_layout, generate_tree_layout};

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group names in this file: `layout.tree`, `layout.layered`
// - Case IDs are the fixture case ids (`small`, `medium_shared`, `large_wide`).
fn benches_layout(c: &mut Criterion) {
    let cases = [fixtures::Case::Small, fixtures::Case::MediumShared, fixtures::Case::LargeWide];

    {
        let mut group = c.benchmark_group("layout.tree");

        for case in cases {
            let elements = ast_to_elements(&fixtures::fixture(case), fixtures::TARGET);
            group.throughput(Throughput::Elements(elements.len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let layout = generate_tree_layout(false, black_box(&elements), true)
                        .expect("tree layout");
                    black_box(fixtures::checksum_layout(&layout))
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("layout.layered");

        for case in cases {
            let elements = ast_to_elements(&fixtures::fixture(case), fixtures::TARGET);
            group.throughput(Throughput::Elements(elements.len() as u64));
            group.bench_function(case.id(), move |b| {
                b.iter(|| {
                    let layout = generate_layered_layout(false, black_box(&elements), true)
                        .expect("layered layout");
                    black_box(fixtures::checksum_layout(&layout))
                })
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_layout
}
criterion_main!(benches);
