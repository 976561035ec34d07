use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use rand::prelude::*;
use skiprope::SkipRope;

const CHARS: [char; 16] = [
    'a', 'b', 'c', 'd', '1', '2', ' ', '\n', '©', '½', 'δ', 'Ϡ', '←', '⇈', '𐆐', '𐆚',
];

fn random_string(len: usize, rng: &mut SmallRng) -> String {
    let mut s = String::new();
    for _ in 0..len {
        s.push(CHARS[rng.gen_range(0..CHARS.len())]);
    }
    s
}

const NUM_EDITS: usize = 10_000;

fn edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("edits");
    group.throughput(Throughput::Elements(NUM_EDITS as u64));

    group.bench_function("random inserts and deletes", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(321);
            let mut rope = SkipRope::new_with_seed(123);

            for _ in 0..NUM_EDITS {
                let len = rope.len_chars();
                if len == 0 || rng.gen_bool(0.55) {
                    let pos = rng.gen_range(0..=len);
                    let text = random_string(rng.gen_range(1..10), &mut rng);
                    rope.insert(pos, &text);
                } else {
                    let pos = rng.gen_range(0..len);
                    let dlen = (len - pos).min(rng.gen_range(1..10));
                    rope.remove(pos..pos + dlen);
                }
            }

            black_box(rope.len_bytes())
        })
    });

    group.bench_function("append at end", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(321);
            let mut rope = SkipRope::new_with_seed(123);

            for _ in 0..NUM_EDITS {
                let text = random_string(rng.gen_range(1..10), &mut rng);
                rope.insert(rope.len_chars(), &text);
            }

            black_box(rope.len_bytes())
        })
    });

    group.finish();
}

fn read_back(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(555);
    let mut rope = SkipRope::new_with_seed(42);
    for _ in 0..1000 {
        let pos = rng.gen_range(0..=rope.len_chars());
        let text = random_string(rng.gen_range(1..50), &mut rng);
        rope.insert(pos, &text);
    }

    let mut group = c.benchmark_group("read");
    group.throughput(Throughput::Bytes(rope.len_bytes() as u64));

    group.bench_function("to_string", |b| b.iter(|| black_box(rope.to_string())));

    group.bench_function("substrings", |b| {
        b.iter(|| {
            let mut total = 0;
            for s in rope.substrings() {
                total += s.len();
            }
            black_box(total)
        })
    });

    group.finish();
}

criterion_group!(benches, edits, read_back);
criterion_main!(benches);
