// Per-category line series over a score axis

use crate::aggregate::{aggregate, group_by, Counting, KeyOrder};
use crate::field::{score_domain, Dimension, Measure};
use crate::record::SleepRecord;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const TOTAL_SERIES: &str = "Total";

/// Whether to split records by gender or pool them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMode {
    #[default]
    Compare,
    Aggregate,
}

impl SeriesMode {
    pub fn secondary(&self) -> Dimension {
        match self {
            SeriesMode::Compare => Dimension::Gender,
            SeriesMode::Aggregate => Dimension::Constant(TOTAL_SERIES),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: u8,
    pub y: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub id: String,
    pub points: Vec<Point>,
}

/// Mean of `measure` per `primary` score, one series per `secondary` group.
///
/// Series come in first-seen order. Points are ascending in x and limited
/// to `domain`; scores with no records, or whose mean is undefined, have no
/// point.
pub fn build_series_by(
    records: &[SleepRecord],
    secondary: Dimension,
    primary: Dimension,
    measure: Measure,
    domain: RangeInclusive<u8>,
) -> Vec<Series> {
    let order = KeyOrder::Domain(score_domain(domain));

    group_by(records, &[secondary])
        .into_iter()
        .map(|group| {
            let points = aggregate(group.members.iter().copied(), &[primary], &[measure], &order, Counting::Rows)
                .entries
                .into_iter()
                .filter(|(_, stat)| stat.count > 0)
                .filter_map(|(key, stat)| {
                    Some(Point {
                        x: key.first()?.as_score()?,
                        y: stat.mean(measure)?,
                        count: stat.count,
                    })
                })
                .collect();

            Series {
                id: group.key[0].to_string(),
                points,
            }
        })
        .collect()
}

/// Mean sleep duration per stress level.
pub fn build_series(records: &[SleepRecord], mode: SeriesMode, domain: RangeInclusive<u8>) -> Vec<Series> {
    build_series_by(records, mode.secondary(), Dimension::Stress, Measure::SleepDuration, domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(gender: &str, stress: u8, duration: f64) -> SleepRecord {
        SleepRecord {
            gender: Some(gender.to_string()),
            stress: Some(stress),
            sleep_duration: Some(duration),
            ..SleepRecord::default()
        }
    }

    fn dataset() -> Vec<SleepRecord> {
        vec![
            rec("Male", 8, 6.0),
            rec("Female", 3, 8.0),
            rec("Male", 3, 7.0),
            rec("Male", 8, 6.5),
            rec("Female", 5, 7.5),
        ]
    }

    #[test]
    fn test_compare_mode_one_series_per_gender() {
        let series = build_series(&dataset(), SeriesMode::Compare, 1..=10);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].id, "Male");
        assert_eq!(
            series[0].points,
            vec![
                Point { x: 3, y: 7.0, count: 1 },
                Point { x: 8, y: 6.25, count: 2 },
            ]
        );
        assert_eq!(series[1].id, "Female");
        assert_eq!(series[1].points.len(), 2);
    }

    #[test]
    fn test_aggregate_mode_single_total_series() {
        let series = build_series(&dataset(), SeriesMode::Aggregate, 1..=10);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].id, TOTAL_SERIES);
        let xs: Vec<u8> = series[0].points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![3, 5, 8]);
        assert_eq!(series[0].points[0].y, 7.5);
        assert_eq!(series[0].points.iter().map(|p| p.count).sum::<usize>(), 5);
    }

    #[test]
    fn test_toggle_is_reproducible() {
        let data = dataset();
        let first = build_series(&data, SeriesMode::Compare, 1..=10);
        let _ = build_series(&data, SeriesMode::Aggregate, 1..=10);
        let again = build_series(&data, SeriesMode::Compare, 1..=10);
        assert_eq!(first, again);
    }

    #[test]
    fn test_points_outside_domain_and_undefined_means_omitted() {
        let mut data = dataset();
        data.push(rec("Male", 11, 5.0));
        data.push(SleepRecord {
            gender: Some("Male".to_string()),
            stress: Some(4),
            sleep_duration: None,
            ..SleepRecord::default()
        });
        let series = build_series(&data, SeriesMode::Compare, 1..=10);
        let xs: Vec<u8> = series[0].points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![3, 8]);
    }

    #[test]
    fn test_missing_gender_grouped_as_unknown() {
        let data = vec![SleepRecord {
            stress: Some(2),
            sleep_duration: Some(7.0),
            ..SleepRecord::default()
        }];
        let series = build_series(&data, SeriesMode::Compare, 1..=10);
        assert_eq!(series[0].id, "Unknown");
    }
}
