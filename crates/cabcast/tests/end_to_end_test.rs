//! End-to-end pipeline runs on synthetic January 2024 trips.

use cabcast::data::{TripRecord, trips_to_frame};
use cabcast::features::columns::{PICKUP_HOUR, ZONE_AVG_FARE, ZONE_ID, lag_column};
use cabcast::split::SplitConfig;
use cabcast::{Pipeline, PipelineConfig, Segment, ZoneStatsMode};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use rstest::rstest;

fn jan(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// `per_hour` trips in each of `hours` consecutive hours from Jan 2.
fn zone_trips(zone: i32, hours: i64, per_hour: i64, fare: f64) -> Vec<TripRecord> {
    (0..hours)
        .flat_map(|h| {
            (0..per_hour).map(move |i| {
                let at = jan(2, 0) + Duration::hours(h) + Duration::minutes(i * 5);
                TripRecord::new(zone, at, fare, 2.0)
            })
        })
        .collect()
}

#[test]
fn test_constant_zone_scenario() {
    let trips = zone_trips(7, 25, 5, 11.0);
    let pipeline = Pipeline::new(PipelineConfig {
        split: SplitConfig::new(1.0, 0.0).unwrap(),
        ..PipelineConfig::default()
    })
    .unwrap();
    let splits = pipeline.run(trips_to_frame(&trips).unwrap()).unwrap();

    assert_eq!(splits.train.height(), 1);
    assert_eq!(splits.validation.height(), 0);
    assert_eq!(splits.test.height(), 0);
    let lag_24 = splits.train.column(&lag_column(24)).unwrap().i64().unwrap();
    assert_eq!(lag_24.get(0), Some(5));
    let rolling = splits.train.column("rolling_24h_mean").unwrap().f64().unwrap();
    assert_eq!(rolling.get(0), Some(5.0));
}

#[test]
fn test_cleaning_happens_before_aggregation() {
    let mut trips = zone_trips(7, 30, 2, 11.0);
    // Out of window, unknown zone, negative fare, too far
    trips.push(TripRecord::new(7, jan(1, 0) - Duration::hours(1), 11.0, 2.0));
    trips.push(TripRecord::new(264, jan(2, 3), 11.0, 2.0));
    trips.push(TripRecord::new(7, jan(2, 3), -5.0, 2.0));
    trips.push(TripRecord::new(7, jan(2, 3), 11.0, 250.0));

    let pipeline = Pipeline::try_default().unwrap();
    let hourly = pipeline.aggregate(trips_to_frame(&trips).unwrap()).unwrap();
    assert_eq!(hourly.height(), 30);
    let counts = hourly.column("pickup_count").unwrap().i64().unwrap();
    assert!(counts.into_no_null_iter().all(|c| c == 2));
}

#[rstest]
#[case(ZoneStatsMode::Global)]
#[case(ZoneStatsMode::TrainOnly)]
fn test_splits_are_chronological(#[case] mode: ZoneStatsMode) {
    let mut trips = zone_trips(4, 72, 3, 9.0);
    trips.extend(zone_trips(161, 60, 6, 21.0));
    let pipeline = Pipeline::new(PipelineConfig {
        zone_stats: mode,
        ..PipelineConfig::default()
    })
    .unwrap();
    let splits = pipeline.run(trips_to_frame(&trips).unwrap()).unwrap();

    // 48 + 36 feature rows survive the 24-sample warm-up
    assert_eq!(splits.total_rows(), 84);

    let range = |segment: Segment| {
        let micros = splits
            .get(segment)
            .column(PICKUP_HOUR)
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap();
        let ca = micros.i64().unwrap();
        (ca.min().unwrap(), ca.max().unwrap())
    };
    let (_, train_max) = range(Segment::Train);
    let (val_min, val_max) = range(Segment::Validation);
    let (test_min, _) = range(Segment::Test);
    assert!(train_max < val_min);
    assert!(val_max < test_min);

    for (_, frame) in splits.iter() {
        assert!(frame.column(ZONE_AVG_FARE).is_ok());
        assert!(frame.get_columns().iter().all(|c| c.null_count() == 0));
    }
}

#[test]
fn test_repeat_runs_identical() {
    let mut trips = zone_trips(90, 50, 4, 13.5);
    trips.extend(zone_trips(12, 45, 1, 8.25));
    let frame = trips_to_frame(&trips).unwrap();

    let pipeline = Pipeline::try_default().unwrap();
    let a = pipeline.run(frame.clone()).unwrap();
    let b = pipeline.run(frame).unwrap();

    for segment in Segment::ALL {
        assert!(a.get(segment).equals_missing(b.get(segment)));
    }
    let zones = a.train.column(ZONE_ID).unwrap().i32().unwrap();
    assert_eq!(zones.get(0), Some(12));
}
