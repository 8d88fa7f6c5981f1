//! Randomized checks that splits partition the table in time order.

use cabcast_features::columns::{PICKUP_HOUR, ZONE_ID};
use cabcast_split::{Segment, SplitConfig, TemporalSplitter};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const HOUR: i64 = 3_600_000_000;

/// Shuffled table with irregular hours and a varying number of zones per hour.
fn random_table(rng: &mut StdRng) -> DataFrame {
    let mut rows: Vec<(i32, i64)> = Vec::new();
    let mut hour = 0i64;
    for _ in 0..rng.gen_range(1..60) {
        hour += rng.gen_range(1..4);
        for zone in 1..=rng.gen_range(1..5) {
            rows.push((zone, hour * HOUR));
        }
    }
    rows.shuffle(rng);

    let (zones, hours): (Vec<i32>, Vec<i64>) = rows.into_iter().unzip();
    DataFrame::new(vec![
        Series::new(ZONE_ID.into(), zones).into(),
        Series::new(PICKUP_HOUR.into(), hours)
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
            .unwrap()
            .into(),
    ])
    .unwrap()
}

fn keys(df: &DataFrame) -> Vec<(i32, i64)> {
    let zones = df.column(ZONE_ID).unwrap().i32().unwrap().clone();
    let hours = df.column(PICKUP_HOUR).unwrap().cast(&DataType::Int64).unwrap();
    zones
        .into_no_null_iter()
        .zip(hours.i64().unwrap().into_no_null_iter())
        .collect()
}

#[test]
fn test_random_partitions() {
    let mut rng = StdRng::seed_from_u64(20240131);

    for _ in 0..50 {
        let table = random_table(&mut rng);
        let train_ratio = rng.gen_range(0.0..=1.0);
        let val_ratio = rng.gen_range(0.0..=(1.0 - train_ratio));
        let config = SplitConfig::new(train_ratio, val_ratio).unwrap();
        let splits = TemporalSplitter::new(config).unwrap().split(&table).unwrap();

        // Union is the whole table, intersections are empty
        assert_eq!(splits.total_rows(), table.height());
        let mut seen = HashSet::new();
        for (_, frame) in splits.iter() {
            for key in keys(frame) {
                assert!(seen.insert(key), "row {key:?} in two segments");
            }
        }
        let all: HashSet<(i32, i64)> = keys(&table).into_iter().collect();
        assert_eq!(seen, all);

        // Segments never interleave in time
        let ranges: Vec<Option<(i64, i64)>> = Segment::ALL
            .iter()
            .map(|s| {
                let hours: Vec<i64> = keys(splits.get(*s)).into_iter().map(|(_, h)| h).collect();
                Some((*hours.iter().min()?, *hours.iter().max()?))
            })
            .collect();
        let present: Vec<(i64, i64)> = ranges.into_iter().flatten().collect();
        for pair in present.windows(2) {
            assert!(pair[0].1 < pair[1].0);
        }
    }
}

#[test]
fn test_whole_hours_stay_together() {
    let mut rng = StdRng::seed_from_u64(7);
    let table = random_table(&mut rng);
    let splits = TemporalSplitter::try_default().unwrap().split(&table).unwrap();

    let hours_of = |segment: Segment| -> HashSet<i64> {
        keys(splits.get(segment)).into_iter().map(|(_, h)| h).collect()
    };
    let train = hours_of(Segment::Train);
    let val = hours_of(Segment::Validation);
    let test = hours_of(Segment::Test);
    assert!(train.is_disjoint(&val));
    assert!(val.is_disjoint(&test));
    assert!(train.is_disjoint(&test));
    assert_eq!(
        train.len() + val.len() + test.len(),
        splits.boundaries.distinct_hours
    );
}

#[test]
fn test_full_train_ratio_keeps_everything() {
    let mut rng = StdRng::seed_from_u64(99);
    let table = random_table(&mut rng);
    let config = SplitConfig::new(1.0, 0.0).unwrap();
    let splits = TemporalSplitter::new(config).unwrap().split(&table).unwrap();

    assert!(splits.train.equals(&table));
    assert_eq!(splits.validation.height(), 0);
    assert_eq!(splits.test.height(), 0);
}
