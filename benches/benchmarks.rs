// benches/benchmarks.rs - Performance benchmarks (criterion)
//
// Hot paths on every keystroke or response:
//   1. Quantity validation over large dishes
//   2. Envelope folding of backend responses
//   3. Snapshot decoding

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dishhub::backend::envelope::ApiEnvelope;
use dishhub::backend::{Dish, DishIngredientLink, Ingredient};
use dishhub::cooking::validation::{
    is_any_ingredient_unavailable, quantity_issues, validate_quantities,
};
use dishhub::util::format_duration;

// ─── Helpers ────────────────────────────────────────────────────────────────

/// A dish with `n` in-stock ingredients and a matching quantity map.
fn large_dish(n: usize) -> (Dish, HashMap<String, u64>) {
    let mut quantities = HashMap::new();
    let ingredients = (0..n)
        .map(|i| {
            let id = format!("ing-{i}");
            quantities.insert(id.clone(), (i % 50 + 1) as u64);
            DishIngredientLink {
                id: format!("link-{i}"),
                ingredient: Some(Ingredient {
                    id,
                    name: format!("Ingredient {i}"),
                    stock_quantity: Some(1_000),
                }),
                quantity: Some(10),
            }
        })
        .collect();
    (
        Dish {
            id: "bench".into(),
            name: "Banquet".into(),
            ingredients,
        },
        quantities,
    )
}

// ─── Benchmark: Validation ──────────────────────────────────────────────────

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let (dish, quantities) = large_dish(200);

    group.bench_function("availability_200", |b| {
        b.iter(|| is_any_ingredient_unavailable(black_box(Some(&dish))))
    });

    group.bench_function("validate_quantities_200", |b| {
        b.iter(|| validate_quantities(black_box(&dish.ingredients), black_box(&quantities)))
    });

    let mut short = quantities.clone();
    short.remove("ing-199");
    group.bench_function("quantity_issues_200_one_missing", |b| {
        b.iter(|| quantity_issues(black_box(&dish.ingredients), black_box(&short)))
    });

    group.finish();
}

// ─── Benchmark: Responses ───────────────────────────────────────────────────

fn bench_responses(c: &mut Criterion) {
    let mut group = c.benchmark_group("responses");
    let (dish, _) = large_dish(50);
    let body = serde_json::to_vec(&dish).unwrap_or_default();

    group.bench_function("envelope_bare_body", |b| {
        b.iter(|| ApiEnvelope::from_http(200, black_box(&body)))
    });

    group.bench_function("envelope_rejection", |b| {
        let body = br#"{"message":"Insufficient stock for Tomato"}"#;
        b.iter(|| ApiEnvelope::from_http(400, black_box(body)))
    });

    group.bench_function("decode_dish_50", |b| {
        b.iter(|| serde_json::from_slice::<Dish>(black_box(&body)))
    });

    group.bench_function("format_duration", |b| {
        b.iter(|| format_duration(black_box(3_725)))
    });

    group.finish();
}

// ─── Main ───────────────────────────────────────────────────────────────────

criterion_group!(benches, bench_validation, bench_responses);
criterion_main!(benches);
