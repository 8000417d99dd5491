//! Benchmarks for the selection policy
//!
//! One scheduling call recomputes every fact's activation from the full
//! log, so the axes are fact-set size and log length together.

#![allow(clippy::expect_used)] // Fine in benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mnemo_core::{select_next, Fact, ModelConfig, Response, ResponseLog, SchedulerConfig};

/// Materials of `count` facts with distinct answers.
fn generate_facts(count: usize) -> Vec<Fact> {
	(0..count)
		.map(|i| {
			Fact::new(
				format!("f{i}"),
				format!("stimulus number {i}"),
				format!("answer {i}"),
				0.3,
			)
		})
		.collect()
}

/// A log that has touched every fact twice, round-robin.
fn generate_log(facts: &[Fact]) -> ResponseLog {
	let mut log = ResponseLog::new();
	let mut now = 0.0;
	for _ in 0..2 {
		for fact in facts {
			log.push(Response::answered(
				fact.id.clone(),
				now,
				800.0,
				true,
				fact.text.clone(),
			))
			.expect("monotonic by construction");
			now += 4000.0;
		}
	}
	log
}

fn bench_selection(c: &mut Criterion) {
	let mut group = c.benchmark_group("select_next");
	let scheduler = SchedulerConfig::default();
	let model = ModelConfig::default();

	for count in &[10_usize, 50, 200] {
		let facts = generate_facts(*count);
		let log = generate_log(&facts);
		let now_ms = (log.len() + 1) as f64 * 4000.0;

		let _ = group.bench_with_input(BenchmarkId::new("facts", count), count, |bench, _| {
			bench.iter(|| {
				select_next(
					black_box(now_ms),
					black_box(&facts),
					black_box(&log),
					&scheduler,
					&model,
				)
				.expect("non-empty fact set")
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_selection);
criterion_main!(benches);
