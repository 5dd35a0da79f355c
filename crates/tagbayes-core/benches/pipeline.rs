//! Benchmarks for shard counting and score derivation.
//!
//! Run with: cargo bench -p tagbayes-core

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tagbayes_core::{GlobalCount, ScoreDeriver, ShardCounter, TagSpace, Vocabulary};

const GENERAL: usize = 2_000;
const CHARACTER: usize = 500;
const POSTS: usize = 5_000;

fn vocabulary(prefix: &str, len: usize) -> Vocabulary {
    let names = (0..len).map(|i| format!("{prefix}_{i}")).collect();
    Vocabulary::build(names, HashMap::new(), HashMap::new()).expect("distinct names")
}

fn tag_space() -> Arc<TagSpace> {
    Arc::new(TagSpace {
        general: vocabulary("general", GENERAL),
        character: vocabulary("character", CHARACTER),
    })
}

/// A shard of posts with ~25 general tags and mostly one character each.
fn synthetic_shard(seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut shard = String::new();
    for _ in 0..POSTS {
        let mut tags: Vec<String> = (0..rng.gen_range(5..45))
            .map(|_| {
                format!(
                    r#"{{"name":"general_{}","category":"0"}}"#,
                    rng.gen_range(0..GENERAL)
                )
            })
            .collect();
        for _ in 0..rng.gen_range(0..3) {
            tags.push(format!(
                r#"{{"name":"character_{}","category":"4"}}"#,
                rng.gen_range(0..CHARACTER)
            ));
        }
        shard.push_str(&format!(r#"{{"id":"1","tags":[{}]}}"#, tags.join(",")));
        shard.push('\n');
    }
    shard
}

fn benchmark_count_shard(c: &mut Criterion) {
    let counter = ShardCounter::new(tag_space(), true);
    let shard = synthetic_shard(7);

    c.bench_function("count_shard_5k_posts", |b| {
        b.iter(|| {
            let reader = Cursor::new(black_box(shard.as_bytes()));
            let _ = counter.count_reader(reader, Path::new("bench"));
        })
    });
}

fn benchmark_derive(c: &mut Criterion) {
    let counter = ShardCounter::new(tag_space(), false);
    let counts = counter
        .count_reader(Cursor::new(synthetic_shard(11).as_bytes()), Path::new("bench"))
        .expect("synthetic shard parses");
    let counts = GlobalCount::freeze(counts);
    let deriver = ScoreDeriver::new(0.1, true).expect("positive smoothing");

    let mut group = c.benchmark_group("derive");
    group.sample_size(10);
    group.bench_function("derive_2000x500", |b| {
        b.iter(|| {
            let _ = deriver.derive(black_box(&counts));
        })
    });
    group.finish();
}

criterion_group!(benches, benchmark_count_shard, benchmark_derive);
criterion_main!(benches);
