//! Criterion benchmarks for action code decoding and pointer arbitration.
//!
//! Both run once per touch event on the input thread, so they must stay in
//! the table-lookup class.
//!
//! Run with:
//! ```bash
//! cargo bench --package overlay-core --bench action_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use overlay_core::{ActionCode, PointerArbiter};
use uuid::Uuid;

// ── Representative raw codes ──────────────────────────────────────────────────

/// One code from every range plus a few unmapped gaps.
const BENCH_RAW_CODES: &[i32] = &[
    4, 26, 44, 224, -1, -2, -3, -4, -5, -100, -200, -207, -214, -220, -221, -6, -150, -300,
];

const BENCH_NAMES: &[&str] = &["KeyW", "Space", "MouseLeft", "GamepadStart", "TriggerRight", "44"];

fn bench_decode(c: &mut Criterion) {
    c.bench_function("action_from_raw_all_ranges", |b| {
        b.iter(|| {
            for &code in BENCH_RAW_CODES {
                black_box(ActionCode::from_raw(black_box(code)));
            }
        })
    });

    c.bench_function("action_parse_names", |b| {
        b.iter(|| {
            for name in BENCH_NAMES {
                let _ = black_box(black_box(name).parse::<ActionCode>());
            }
        })
    });
}

fn bench_arbiter(c: &mut Criterion) {
    let arbiter = PointerArbiter::new();
    let control = Uuid::new_v4();

    c.bench_function("arbiter_claim_query_release", |b| {
        b.iter(|| {
            for pointer in 0..10u32 {
                arbiter.claim(pointer, control);
            }
            for pointer in 0..10u32 {
                black_box(arbiter.is_claimed(black_box(pointer)));
            }
            for pointer in 0..10u32 {
                arbiter.release(pointer);
            }
        })
    });
}

criterion_group!(benches, bench_decode, bench_arbiter);
criterion_main!(benches);
