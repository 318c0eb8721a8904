use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dice_algebra::{lex::tokenize, parse::parse, validate, Expr};

const BASIC_EXPR: &str = "4d8 + 4";
const COMPLEX_EXPR: &str = "4d8 + 2d10 * (-3d6 - 6 / 2) - (1d4 + 1)d(2d3)";

fn lexing(c: &mut Criterion) {
	c.bench_function("tokenize_basic", |b| b.iter(|| tokenize(black_box(BASIC_EXPR)).unwrap()));
	c.bench_function("tokenize_complex", |b| b.iter(|| tokenize(black_box(COMPLEX_EXPR)).unwrap()));
}

fn parsing(c: &mut Criterion) {
	let tokens = tokenize(COMPLEX_EXPR).unwrap();
	c.bench_function("parse_tokens_complex", |b| b.iter(|| parse(black_box(&tokens)).unwrap()));
	c.bench_function("fromstr_basic", |b| b.iter(|| black_box(BASIC_EXPR).parse::<Expr>().unwrap()));
	c.bench_function("fromstr_complex", |b| b.iter(|| black_box(COMPLEX_EXPR).parse::<Expr>().unwrap()));
	c.bench_function("validate_complex", |b| b.iter(|| validate(black_box(COMPLEX_EXPR)).unwrap()));
}

criterion_group!(benches, lexing, parsing);
criterion_main!(benches);
