// Resampling: epoch-aligned buckets, max per bucket, empty buckets dropped

mod common;

use common::{at, obs};
use loadcast::models::Cadence;
use loadcast::pipeline::resample_max;

#[test]
fn resample_empty_yields_empty_series() {
    let out = resample_max(&[], Cadence::minutes(5));
    assert!(out.is_empty());
    assert!(!out.has_enough_for_forecast());
}

#[test]
fn resample_takes_max_per_five_minute_bucket() {
    let rows = vec![
        obs(at(2024, 1, 1, 0, 0, 0), "a", "m", 1.0),
        obs(at(2024, 1, 1, 0, 2, 30), "a", "m", 7.0),
        obs(at(2024, 1, 1, 0, 4, 59), "a", "m", 3.0),
        obs(at(2024, 1, 1, 0, 5, 0), "a", "m", 2.0),
        obs(at(2024, 1, 1, 0, 9, 0), "a", "m", 4.0),
    ];
    let out = resample_max(&rows, Cadence::minutes(5));
    assert_eq!(out.cadence, Cadence::minutes(5));
    assert_eq!(out.len(), 2);
    assert_eq!(out.points[0].timestamp, at(2024, 1, 1, 0, 0, 0));
    assert_eq!(out.points[0].value, 7.0);
    assert_eq!(out.points[1].timestamp, at(2024, 1, 1, 0, 5, 0));
    assert_eq!(out.points[1].value, 4.0);
}

#[test]
fn resample_drops_empty_buckets() {
    let rows = vec![
        obs(at(2024, 1, 1, 0, 1, 0), "a", "m", 1.0),
        obs(at(2024, 1, 1, 1, 1, 0), "a", "m", 2.0),
    ];
    let out = resample_max(&rows, Cadence::minutes(5));
    assert_eq!(out.len(), 2);
    assert_eq!(out.points[1].timestamp, at(2024, 1, 1, 1, 0, 0));
}

#[test]
fn resample_daily_aligns_to_midnight() {
    let rows = vec![
        obs(at(2024, 1, 1, 23, 59, 59), "a", "m", 5.0),
        obs(at(2024, 1, 1, 8, 0, 0), "a", "m", 9.0),
        obs(at(2024, 1, 2, 0, 0, 0), "a", "m", 1.0),
        obs(at(2024, 1, 4, 12, 0, 0), "a", "m", -2.0),
    ];
    let out = resample_max(&rows, Cadence::DAY);
    let got: Vec<_> = out.points.iter().map(|p| (p.timestamp, p.value)).collect();
    assert_eq!(
        got,
        vec![
            (at(2024, 1, 1, 0, 0, 0), 9.0),
            (at(2024, 1, 2, 0, 0, 0), 1.0),
            (at(2024, 1, 4, 0, 0, 0), -2.0),
        ]
    );
}

#[test]
fn resample_n_points_in_k_buckets_yields_k_rows() {
    // 60 points one minute apart cover twelve 5-minute buckets.
    let rows: Vec<_> = (0..60)
        .map(|i| {
            let ts = at(2024, 1, 1, 0, 0, 0) + chrono::TimeDelta::minutes(i);
            obs(ts, "a", "m", (i % 7) as f64)
        })
        .collect();
    let out = resample_max(&rows, Cadence::minutes(5));
    assert_eq!(out.len(), 12);
    for (k, p) in out.points.iter().enumerate() {
        let expected = rows[k * 5..k * 5 + 5]
            .iter()
            .map(|o| o.value)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(p.value, expected);
    }
}

#[test]
fn resample_is_order_independent() {
    let mut rows = vec![
        obs(at(2024, 1, 1, 0, 7, 0), "a", "m", 3.0),
        obs(at(2024, 1, 1, 0, 1, 0), "a", "m", 8.0),
        obs(at(2024, 1, 1, 0, 6, 0), "a", "m", 5.0),
    ];
    let forward = resample_max(&rows, Cadence::minutes(5));
    rows.reverse();
    let backward = resample_max(&rows, Cadence::minutes(5));
    assert_eq!(forward, backward);
}

#[test]
fn two_points_are_enough_one_is_not() {
    let one = resample_max(&[obs(at(2024, 1, 1, 0, 0, 0), "a", "m", 1.0)], Cadence::DAY);
    assert!(!one.has_enough_for_forecast());
    let two = resample_max(
        &[
            obs(at(2024, 1, 1, 0, 0, 0), "a", "m", 1.0),
            obs(at(2024, 1, 2, 0, 0, 0), "a", "m", 1.0),
        ],
        Cadence::DAY,
    );
    assert!(two.has_enough_for_forecast());
}

#[test]
fn cadence_bucket_start_before_epoch_floors_down() {
    let ts = at(1969, 12, 31, 23, 58, 0);
    assert_eq!(
        Cadence::minutes(5).bucket_start(ts),
        at(1969, 12, 31, 23, 55, 0)
    );
}
