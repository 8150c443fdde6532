// ── Equity series shaping ──
//
// Two pure steps applied before charting: keep the most recent `R` samples,
// then thin them to roughly `T` points with a fixed stride. The final
// sample always survives both steps.

use std::num::NonZeroUsize;

use chrono::{Local, TimeZone};

use crate::config::SeriesLimits;
use crate::format;
use crate::model::{ChartPoint, EquitySample};

/// The last `retention` items, or all of them if there are fewer.
pub fn trim_recent<T>(items: &[T], retention: usize) -> &[T] {
    let start = items.len().saturating_sub(retention);
    &items[start..]
}

/// Keep every `ceil(len / target)`-th item starting at index 0, then append
/// the final item if the stride skipped it. Inputs no longer than `target`
/// are returned unchanged.
pub fn downsample<T: Clone>(items: &[T], target: NonZeroUsize) -> Vec<T> {
    let len = items.len();
    if len <= target.get() {
        return items.to_vec();
    }

    let step = len.div_ceil(target.get());
    let mut out: Vec<T> = items.iter().step_by(step).cloned().collect();
    if (len - 1) % step != 0 {
        if let Some(last) = items.last() {
            out.push(last.clone());
        }
    }
    out
}

/// Trim, downsample, and label a history for the chart, rendering labels
/// in the local time zone.
pub fn prepare_chart(history: &[EquitySample], limits: SeriesLimits) -> Vec<ChartPoint> {
    prepare_chart_in(history, limits, &Local)
}

/// [`prepare_chart`] with an explicit time zone for the labels.
pub fn prepare_chart_in<Tz>(
    history: &[EquitySample],
    limits: SeriesLimits,
    tz: &Tz,
) -> Vec<ChartPoint>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let trimmed = trim_recent(history, limits.retention().get());
    downsample(trimmed, limits.target())
        .into_iter()
        .map(|sample| {
            let label = sample.timestamp.map_or_else(
                || format::NOT_A_NUMBER.to_owned(),
                |at| format::fmt_datetime(&at.with_timezone(tz)),
            );
            ChartPoint {
                timestamp: sample.timestamp,
                tick_label: format::tick_label(&label).to_owned(),
                label,
                equity: sample.equity,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroUsize;

    use chrono::{TimeDelta, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::{downsample, prepare_chart_in, trim_recent};
    use crate::config::SeriesLimits;
    use crate::model::EquitySample;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn trim_keeps_suffix() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(trim_recent(&items, 3), &[7, 8, 9]);
        assert_eq!(trim_recent(&items, 50), items.as_slice());
        assert!(trim_recent::<u32>(&[], 3).is_empty());
    }

    #[test]
    fn downsample_is_noop_within_target() {
        let items: Vec<u32> = (0..5).collect();
        assert_eq!(downsample(&items, nz(5)), items);
        assert!(downsample::<u32>(&[], nz(1)).is_empty());
    }

    #[test]
    fn downsample_appends_skipped_tail() {
        // len 10, target 4 -> step 3 -> 0,3,6,9 already ends on the tail.
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(downsample(&items, nz(4)), [0, 3, 6, 9]);

        // len 11, target 4 -> step 3 -> 0,3,6,9 then forced 10.
        let items: Vec<u32> = (0..11).collect();
        assert_eq!(downsample(&items, nz(4)), [0, 3, 6, 9, 10]);
    }

    #[test]
    fn fifteen_hundred_points_fit_the_chart() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let history: Vec<EquitySample> = (0..1500_i64)
            .map(|i| {
                let equity = if i == 1499 { 25_000.0 } else { 20_000.0 };
                EquitySample::new(start + TimeDelta::minutes(i), equity)
            })
            .collect();

        let limits = SeriesLimits::new(1200, 400).unwrap();
        let points = prepare_chart_in(&history, limits, &Utc);

        assert!(points.len() <= 401);
        let last = points.last().unwrap();
        assert!((last.equity - 25_000.0).abs() < f64::EPSILON);
        assert_eq!(last.timestamp, history[1499].timestamp);
        assert_eq!(points[0].timestamp, history[300].timestamp);
    }

    #[test]
    fn chart_labels_use_day_first_format() {
        let at = Utc.with_ymd_and_hms(2024, 2, 3, 14, 5, 9).unwrap();
        let points = prepare_chart_in(
            &[EquitySample::new(at, 1.0)],
            SeriesLimits::default(),
            &Utc,
        );
        assert_eq!(points[0].label, "03/02/2024, 14:05:09");
        assert_eq!(points[0].tick_label, "14:05:09");
    }

    #[test]
    fn unreadable_time_still_reaches_the_chart() {
        let at = Utc.with_ymd_and_hms(2024, 2, 3, 14, 5, 9).unwrap();
        let history = [
            EquitySample::new(at, 1.0),
            EquitySample {
                timestamp: None,
                ..EquitySample::new(at, 2.0)
            },
        ];
        let points = prepare_chart_in(&history, SeriesLimits::default(), &Utc);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].label, "n/a");
        assert_eq!(points[1].tick_label, "n/a");
        assert!((points[1].equity - 2.0).abs() < f64::EPSILON);
    }
}
