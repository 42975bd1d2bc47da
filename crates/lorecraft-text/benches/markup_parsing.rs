//! Benchmarks for markup parsing and layout

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lorecraft_assets::MemoryReader;
use lorecraft_core::config::GlyphPaths;
use lorecraft_test_utils::glyphs::width_table;
use lorecraft_text::{GlyphCatalog, parse, reconcile};

fn catalog() -> GlyphCatalog {
    GlyphCatalog::from_width_table(
        &width_table(1, 6),
        Arc::new(MemoryReader::new()),
        GlyphPaths::default(),
    )
    .expect("Failed to build glyph catalog")
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    let long_lore = "&5&oAncient &r&7relic of the &6&lfirst age&r\n".repeat(40);
    let texts: Vec<(&str, &str)> = vec![
        ("plain", "Diamond Sword"),
        ("colored", "&bDiamond Sword &7(+7 &cDamage&7)"),
        ("styled", "&l&o&nFancy&r &mstruck&r &kobf"),
        ("literal_ampersands", "Tom & Jerry && friends &z &"),
        ("long_lore", &long_lore),
    ];

    for (name, content) in texts {
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_function(name, |b| b.iter(|| black_box(parse(black_box(content)))));
    }

    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let catalog = catalog();
    let font = catalog.font(0).expect("version 0 exists");
    let mut group = c.benchmark_group("reconcile");

    for lines in [1usize, 8, 32, 128] {
        let text = "&aline &lwith &r&9several &osegments\n".repeat(lines);
        let mut edited = text.clone();
        edited.push('!');

        let mut previous = parse(&text);
        reconcile(None, &mut previous, &font);
        previous.mark_valid();

        group.bench_with_input(BenchmarkId::new("full", lines), &text, |b, text| {
            b.iter(|| {
                let mut doc = parse(text);
                black_box(reconcile(None, &mut doc, &font))
            });
        });

        group.bench_with_input(BenchmarkId::new("one_edit", lines), &edited, |b, edited| {
            b.iter(|| {
                let mut doc = parse(edited);
                black_box(reconcile(Some(&previous), &mut doc, &font))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_reconcile);
criterion_main!(benches);
