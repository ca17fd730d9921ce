use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bpgen_core::{emit, emit_full, parse, parse_full, Language};

const TWO_SUM: &str = r#"Problem Name: "Two Sum"
Function Name: twoSum
Input Structure:
Input Field: nums array of integer
Input Field: target integer
Output Structure:
Output Field: array of integer
"#;

const NESTED: &str = r#"# Scheduling

- **Problem Name:** "Meeting Rooms"
- **Function Name:** assignRooms

## Input Structure:
- Input Field: meetings list of tuples of int, int and string
- Input Field: capacities array of integer
- Input Field: weights array of float

## Output Structure:
- Output Field: rooms array of pair of string and array of int

Input Format: capacities line
Output Format: lines
"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_two_sum", |b| b.iter(|| parse(black_box(TWO_SUM))));
    c.bench_function("parse_full_nested", |b| b.iter(|| parse_full(black_box(NESTED))));
}

fn bench_emit(c: &mut Criterion) {
    let definition = parse(TWO_SUM).expect("benchmark document parses");
    let full = parse_full(NESTED).expect("benchmark document parses");

    for language in Language::ALL {
        c.bench_function(&format!("emit_{}", language), |b| {
            b.iter(|| emit(language, black_box(&definition)))
        });
        c.bench_function(&format!("emit_full_{}", language), |b| {
            b.iter(|| emit_full(language, black_box(&full)))
        });
    }
}

criterion_group!(benches, bench_parse, bench_emit);
criterion_main!(benches);
