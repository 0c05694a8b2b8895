use divan::AllocProfiler;

#[path = "../tests/common/mod.rs"]
mod common;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

const STRINGS: usize = 2000;

/// A table with a default and an english configuration of `STRINGS` strings each
fn get_input() -> Vec<u8> {
    let values = (0..STRINGS * 2)
        .map(|i| format!("value number {i} with some padding text"))
        .collect::<Vec<_>>();
    let keys = (0..STRINGS).map(|i| format!("key_{i}")).collect::<Vec<_>>();

    let mut default = common::TypeChunk::new(2);
    let mut english = common::TypeChunk::new(2).language("en");
    for i in 0..STRINGS as u32 {
        default = default.string(i, i);
        english = english.string(i, i + STRINGS as u32);
    }

    common::Table::new()
        .values(&values.iter().map(String::as_str).collect::<Vec<_>>())
        .package(
            common::Package::new(0x7F, "com.example")
                .keys(&keys.iter().map(String::as_str).collect::<Vec<_>>())
                .chunk(common::type_spec(2, STRINGS as u32))
                .chunk(default.build())
                .chunk(english.build()),
        )
        .build()
}

pub mod read {
    use arsc_table::{ResourceTable, StringExtractor};
    use divan::Bencher;

    #[divan::bench]
    fn parse(bencher: Bencher) {
        bencher.with_inputs(super::get_input).bench_refs(|data| {
            divan::black_box(ResourceTable::parse(data).unwrap());
        });
    }

    #[divan::bench]
    fn extract(bencher: Bencher) {
        bencher.with_inputs(super::get_input).bench_refs(|data| {
            divan::black_box(StringExtractor::default().extract_bytes(data).unwrap());
        });
    }

    #[divan::bench(sample_count = 10)]
    fn to_json(bencher: Bencher) {
        let strings = StringExtractor::default()
            .extract_bytes(&super::get_input())
            .unwrap();

        bencher.bench_local(move || {
            let mut out = Vec::new();
            strings.to_writer(&mut out).unwrap();
            divan::black_box(out);
        });
    }
}
