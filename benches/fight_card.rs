//! This bench sorts a large fight card that mixes explicit positions,
//! legacy main/co-main flags and bouts with no position at all.

#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use mmabox::domain::{Bout, CardPosition, order_fight_card};

const POSITIONS: [Option<CardPosition>; 7] = [
    Some(CardPosition::Prelim),
    Some(CardPosition::MainCard),
    None,
    Some(CardPosition::Cancelled),
    Some(CardPosition::TitleFight),
    Some(CardPosition::Unknown),
    Some(CardPosition::CoMain),
];

/// Generates a card of `size` bouts in no particular order.
fn shuffled_card(size: u32) -> Vec<Bout> {
    (0..size)
        .map(|i| {
            let mut bout = Bout::new(format!("Fighter {i}A"), format!("Fighter {i}B"));
            bout.card_position = POSITIONS[(i as usize * 5) % POSITIONS.len()];
            bout.bout_order = (i % 3 != 0).then_some((i * 7) % 13);
            bout.is_main_event = i == size / 2;
            bout
        })
        .collect()
}

fn order_cards(c: &mut Criterion) {
    for size in [12, 1_000] {
        c.bench_function(&format!("order fight card ({size} bouts)"), |b| {
            b.iter_batched(
                || shuffled_card(size),
                order_fight_card,
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group!(benches, order_cards);
criterion_main!(benches);
