use chrono::{DateTime, Utc};

use crate::model::{DailyForecastSummary, ForecastSample, Units};

/// Maximum number of distinct days in a forecast summary.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Collapse the 3-hourly forecast series into per-day summaries.
///
/// Walks the series in order, keeps the first sample of each distinct
/// calendar day (no averaging), and stops once [`MAX_FORECAST_DAYS`] days
/// are collected. The caller's unit system is attached to every summary;
/// the upstream series does not carry one. Empty input yields an empty
/// sequence.
pub fn summarize_daily(samples: &[ForecastSample], units: Units) -> Vec<DailyForecastSummary> {
    let mut days: Vec<DailyForecastSummary> = Vec::with_capacity(MAX_FORECAST_DAYS);

    for sample in samples {
        if days.len() >= MAX_FORECAST_DAYS {
            break;
        }

        let Some(day) = day_label(sample.timestamp) else {
            tracing::warn!(
                timestamp = sample.timestamp,
                "skipping forecast sample with out-of-range timestamp"
            );
            continue;
        };

        if days.iter().any(|existing| existing.day == day) {
            continue;
        }

        days.push(DailyForecastSummary {
            day,
            temperature: sample.temperature,
            icon: sample.icon.clone(),
            description: sample.description.clone(),
            units,
        });
    }

    days
}

/// Label like "Mon, Aug 29" identifying one UTC calendar day.
fn day_label(timestamp: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).map(|dt| dt.format("%a, %b %-d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(timestamp: i64, temperature: f64) -> ForecastSample {
        ForecastSample {
            timestamp,
            temperature,
            icon: "01d".into(),
            description: "clear sky".into(),
        }
    }

    /// Monday 2022-08-29 00:00:00 UTC.
    fn monday() -> i64 {
        chrono::Utc
            .with_ymd_and_hms(2022, 8, 29, 0, 0, 0)
            .single()
            .expect("valid timestamp")
            .timestamp()
    }

    const HOUR: i64 = 3600;
    const DAY: i64 = 24 * HOUR;

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(summarize_daily(&[], Units::Metric).is_empty());
    }

    #[test]
    fn forty_samples_over_eight_days_cap_at_five() {
        // Five samples per day at 0/3/6/9/12 o'clock, eight days running.
        let base = monday();
        let mut samples = Vec::new();
        for day in 0..8 {
            for slot in 0..5 {
                let ts = base + day * DAY + slot * 3 * HOUR;
                samples.push(sample(ts, day as f64 * 10.0 + slot as f64));
            }
        }
        assert_eq!(samples.len(), 40);

        let summaries = summarize_daily(&samples, Units::Metric);

        assert_eq!(summaries.len(), MAX_FORECAST_DAYS);
        // One summary per day, in chronological order of first occurrence,
        // carrying the first sample's temperature (slot 0).
        let expected_days =
            ["Mon, Aug 29", "Tue, Aug 30", "Wed, Aug 31", "Thu, Sep 1", "Fri, Sep 2"];
        for (i, summary) in summaries.iter().enumerate() {
            assert_eq!(summary.day, expected_days[i]);
            assert_eq!(summary.temperature, i as f64 * 10.0);
        }
    }

    #[test]
    fn first_sample_per_day_wins() {
        let base = monday();
        let samples = vec![
            sample(base + 6 * HOUR, 18.0),
            sample(base + 9 * HOUR, 24.0),
            sample(base + DAY, 12.0),
        ];

        let summaries = summarize_daily(&samples, Units::Metric);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].temperature, 18.0);
        assert_eq!(summaries[1].temperature, 12.0);
    }

    #[test]
    fn day_labels_are_unique_within_one_summary() {
        let base = monday();
        let samples: Vec<_> = (0..16).map(|i| sample(base + i * 3 * HOUR, 20.0)).collect();

        let summaries = summarize_daily(&samples, Units::Metric);

        let mut labels: Vec<&str> = summaries.iter().map(|s| s.day.as_str()).collect();
        labels.dedup();
        assert_eq!(labels.len(), summaries.len());
    }

    #[test]
    fn caller_units_are_attached_to_every_summary() {
        let base = monday();
        let samples = vec![sample(base, 70.0), sample(base + DAY, 68.0)];

        let summaries = summarize_daily(&samples, Units::Imperial);

        assert!(summaries.iter().all(|s| s.units == Units::Imperial));
    }

    #[test]
    fn label_format_is_stable() {
        let summaries = summarize_daily(&[sample(monday() + 12 * HOUR, 21.0)], Units::Metric);
        assert_eq!(summaries[0].day, "Mon, Aug 29");
    }

    #[test]
    fn out_of_range_timestamp_is_skipped() {
        let samples = vec![sample(i64::MAX, 99.0), sample(monday(), 21.0)];

        let summaries = summarize_daily(&samples, Units::Metric);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].temperature, 21.0);
    }
}
