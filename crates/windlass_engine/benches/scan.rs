//! Benchmarks for token extraction and class interpretation
//!
//! Run with: cargo bench -p windlass_engine

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use windlass_engine::{extract_tokens, HandlerRegistry, Interpreter};
use windlass_theme::{default_theme, TokenTable};

const MARKUP: &str = r#"
<header class="bg-white dark:bg-gray-900 text-gray-600 p-4 shadow">
  <nav class="flex justify-between items-center max-w-4xl mx-auto">
    <a href="/" class="text-3xl font-bold hover:text-blue-500">Home</a>
    <button class="rounded-full hover:bg-gray-200 dark:hover:bg-gray-700 w-5 h-5"></button>
  </nav>
</header>
<main class="grid grid-cols-1 md:grid-cols-2 gap-4 min-h-screen bg-[#1da1f2] w-[calc(100%_-_2rem)]">
  <p class="mb-6 -mt-2 truncate sm:p-2 lg:p-8">Lorem ipsum dolor sit amet.</p>
</main>
"#;

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan/extract");

    for repeat in [1usize, 16, 256] {
        let text = MARKUP.repeat(repeat);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(repeat), &text, |b, text| {
            b.iter(|| black_box(extract_tokens(text)))
        });
    }

    group.finish();
}

fn bench_interpret(c: &mut Criterion) {
    let table = TokenTable::from_spec(&default_theme()).expect("default theme resolves");
    let handlers = HandlerRegistry::builtin();
    let interpreter = Interpreter::new(&table, &handlers);
    let tokens = extract_tokens(MARKUP);

    c.bench_function("scan/interpret", |b| {
        b.iter(|| {
            for token in &tokens {
                black_box(interpreter.interpret(token));
            }
        })
    });
}

criterion_group!(benches, bench_extract, bench_interpret);
criterion_main!(benches);
