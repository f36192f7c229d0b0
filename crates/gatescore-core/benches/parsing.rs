use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gatescore_core::answer_key::parse_answer_key;
use gatescore_core::layout::ExamLayout;
use gatescore_core::options::OptionMap;
use gatescore_core::response::{parse_candidate_meta, parse_response_sheet, question_blocks};

const KEY: &str = include_str!("../../../fixtures/answer-key.txt");
const SHEET: &str = include_str!("../../../fixtures/response.html");

fn bench_answer_key(c: &mut Criterion) {
    let layout = ExamLayout::default();
    c.bench_function("answer_key/fixture", |b| {
        b.iter(|| parse_answer_key(black_box(KEY), &layout))
    });
}

fn bench_response_sheet(c: &mut Criterion) {
    let layout = ExamLayout::default();
    let mut group = c.benchmark_group("response_sheet");

    group.bench_function("full", |b| {
        b.iter(|| parse_response_sheet(black_box(SHEET), &layout))
    });

    group.bench_function("blocks_only", |b| {
        b.iter(|| question_blocks(black_box(SHEET)).len())
    });

    let blocks = question_blocks(SHEET);
    group.bench_function("option_maps", |b| {
        b.iter(|| {
            blocks
                .iter()
                .map(|block| OptionMap::from_block(black_box(block)).len())
                .sum::<usize>()
        })
    });

    group.bench_function("candidate_meta", |b| {
        b.iter(|| parse_candidate_meta(black_box(SHEET)))
    });

    group.finish();
}

criterion_group!(benches, bench_answer_key, bench_response_sheet);
criterion_main!(benches);
