use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dice_algebra::{eval::evaluate, random::FastRand, Engine, Expr};

fn dice(c: &mut Criterion) {
	let mut source = FastRand::default();

	let small = Expr::dice(4, 8);
	c.bench_function("roll_4d8", |b| b.iter(|| evaluate(black_box(&small), &mut source).unwrap()));

	let large = Expr::dice(100, 20);
	c.bench_function("roll_100d20", |b| b.iter(|| evaluate(black_box(&large), &mut source).unwrap()));
}

fn e2e(c: &mut Criterion) {
	c.bench_function("e2e_basic", |b| b.iter(|| Engine::evaluate(black_box("4d8 + 4")).unwrap()));
	c.bench_function("e2e_complex", |b| {
		b.iter(|| Engine::evaluate(black_box("4d8 + 2d10 * (-3d6 - 6 / 2)")).unwrap());
	});

	let mut engine = Engine::builder().expression("4d8 + 2d10 * (-3d6 - 6 / 2)").seed(1).build();
	c.bench_function("engine_reroll_complex", |b| b.iter(|| engine.roll().unwrap().total));
}

criterion_group!(benches, dice, e2e);
criterion_main!(benches);
