//! Criterion benchmarks for the decomposition table pipeline.
//!
//! Run: cargo bench -p unidecomp --bench build_table
//!
//! Results show:
//!   parse_*k    — `UnicodeData.txt` line parsing throughput
//!   build_*k    — full parse → augment → expand → filter run
//!   render_c    — C table rendering of the built table

#![allow(
    clippy::unwrap_used,              // benchmark helpers use unwrap for brevity
    clippy::expect_used,
    clippy::arithmetic_side_effects,
    missing_docs,                     // criterion_group! macro generates undocumented items
)]

use std::fmt::Write as _;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use unidecomp::emit::render_table;
use unidecomp::{CharacterDatabase, TableBuilder, TableFormat};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Synthetic UCD excerpt: `n` letters, each with a one-accent form and a
/// two-accent form chained through it, plus the combining marks themselves.
fn synthetic_unidata(n: u32) -> String {
    let mut out = String::new();
    for mark in 0x300u32..=0x36F {
        writeln!(out, "{mark:04X};COMBINING MARK {mark:X};Mn;230;NSM;;;;;N;;;;;").unwrap();
    }
    for i in 0..n {
        let letter = 0x1_0000 + i * 3;
        let single = letter + 1;
        let double = letter + 2;
        let accent = 0x300 + (i % 0x70);
        writeln!(out, "{letter:04X};LETTER {i};Lu;0;L;;;;;N;;;;;").unwrap();
        writeln!(out, "{single:04X};LETTER {i} WITH ACCENT;Lu;0;L;{letter:04X} {accent:04X};;;;N;;;;;").unwrap();
        writeln!(out, "{double:04X};LETTER {i} WITH TWO ACCENTS;Lu;0;L;{single:04X} 0301;;;;N;;;;;").unwrap();
    }
    out
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for n in [1_000u32, 10_000] {
        let text = synthetic_unidata(n);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}k", n / 1000)), &text, |b, text| {
            b.iter(|| CharacterDatabase::parse_str(black_box(text)).unwrap());
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [1_000u32, 10_000] {
        let text = synthetic_unidata(n);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}k", n / 1000)), &text, |b, text| {
            b.iter(|| TableBuilder::new().build_from_str(black_box(text)).unwrap());
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let built = TableBuilder::new().build_from_str(&synthetic_unidata(10_000)).unwrap();
    c.bench_function("render_c", |b| {
        b.iter(|| render_table(black_box(&built.table), TableFormat::C, "bench"));
    });
}

criterion_group!(benches, bench_parse, bench_build, bench_render);
criterion_main!(benches);
