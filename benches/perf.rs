use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::NaiveDate;
use lcb_insights::record::Record;
use lcb_insights::summary::{GroupBy, rank_leaderboard, summarize_player};
use lcb_insights::targets::TargetConfig;

const METRICS: &[&str] = &["Bench", "Squat", "10 yard sprint", "Pro Agility", "Pull Ups"];

/// Deterministic season of data: 120 players, 5 metrics, 12 sessions each.
fn sample_records() -> Vec<Record> {
    let mut out = Vec::new();
    for player in 0..120u32 {
        for (m, metric) in METRICS.iter().enumerate() {
            for session in 0..12u32 {
                let base = 20.0 + (player % 17) as f64 + m as f64 * 3.0;
                let value = base + (session as f64) * 0.4;
                out.push(Record {
                    full_name: format!("Player {player}"),
                    team: format!("Team {}", player % 8),
                    age: Some(8 + player % 9),
                    metric: metric.to_string(),
                    date: NaiveDate::from_ymd_opt(2025, 1 + session % 12, 1 + session % 28),
                    attempts: [Some(value - 1.0), Some(value), Some(value + 1.0)],
                    last_attempt: Some(value),
                    average: Some(value),
                    highest: Some(value + 1.0),
                    lowest: Some(value - 1.0),
                });
            }
        }
    }
    out
}

fn bench_summarize(c: &mut Criterion) {
    let cfg = TargetConfig::builtin();
    let records = sample_records();
    c.bench_function("summarize_player", |b| {
        b.iter(|| {
            let row = summarize_player(black_box(&records), "Player 57", "Bench", &cfg).unwrap();
            black_box(row.growth);
        })
    });
}

fn bench_leaderboard(c: &mut Criterion) {
    let cfg = TargetConfig::builtin();
    let records = sample_records();
    c.bench_function("rank_leaderboard", |b| {
        b.iter(|| {
            let rows = rank_leaderboard(
                black_box(&records),
                "10 yard sprint",
                20,
                GroupBy::Player,
                &cfg,
            );
            black_box(rows.len());
        })
    });
}

criterion_group!(benches, bench_summarize, bench_leaderboard);
criterion_main!(benches);
