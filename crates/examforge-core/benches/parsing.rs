use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examforge_core::parser::{parse_grades_str, parse_responses_str};

fn generate_responses_toml(students: usize, questions: usize) -> String {
    let mut s = String::new();
    for i in 0..students {
        s.push_str(&format!(
            "\n[[students]]\nemailaddress = \"student{i}@university.edu\"\nstate = \"Finished\"\n"
        ));
        for q in 1..=questions {
            s.push_str(&format!(
                "response{q} = \"Answer from student {i} to question {q}, long enough to be realistic.\"\n"
            ));
        }
    }
    s
}

fn generate_grades_toml(students: usize, questions: usize) -> String {
    let mut s = String::new();
    for i in 0..students {
        s.push_str(&format!(
            "\n[[grades]]\nemailaddress = \"student{i}@university.edu\"\nstate = \"Finished\"\ngrade2700 = 21.5\n"
        ));
        for q in 1..=questions {
            s.push_str(&format!("q{q}123 = 2.5\n"));
        }
    }
    s
}

fn bench_parse_responses(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_responses");

    let small = generate_responses_toml(10, 9);
    let large = generate_responses_toml(200, 9);
    let grades = BTreeMap::new();

    group.bench_function("10_students", |b| {
        b.iter(|| parse_responses_str(black_box(&small), black_box(9), black_box(&grades)))
    });

    group.bench_function("200_students", |b| {
        b.iter(|| parse_responses_str(black_box(&large), black_box(9), black_box(&grades)))
    });

    group.finish();
}

fn bench_parse_grades(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_grades");

    let small = generate_grades_toml(10, 9);
    let large = generate_grades_toml(200, 9);

    group.bench_function("10_students", |b| {
        b.iter(|| parse_grades_str(black_box(&small)))
    });

    group.bench_function("200_students", |b| {
        b.iter(|| parse_grades_str(black_box(&large)))
    });

    group.finish();
}

criterion_group!(benches, bench_parse_responses, bench_parse_grades);
criterion_main!(benches);
