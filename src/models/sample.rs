use std::fmt;

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

use crate::constants::HOURS_PER_DAY;

/// One observed reading, or one aggregated bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Local>,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Local>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A single row of the hourly steps query: local hour start and summed steps.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySteps {
    pub hour: NaiveDateTime,
    pub steps: f64,
}

/// Continuous metrics served as raw series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    HeartRate,
    Weight,
}

impl Metric {
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::HeartRate => "bpm",
            Metric::Weight => "lb",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::HeartRate => write!(f, "heart rate"),
            Metric::Weight => write!(f, "weight"),
        }
    }
}

/// Resolve a naive local timestamp, picking the earlier instant on DST
/// overlaps and reading the wall clock as UTC inside DST gaps.
pub fn local_at(naive: NaiveDateTime) -> DateTime<Local> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => Local.from_utc_datetime(&naive),
    }
}

/// Local midnight at the start of `date`.
pub fn local_midnight(date: NaiveDate) -> DateTime<Local> {
    local_at(date.and_time(NaiveTime::MIN))
}

fn hour_of(date: NaiveDate, hour: usize) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(hour as u32, 0, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

/// Hourly step totals for one day, always exactly 24 buckets.
///
/// Provider rows land in the slot of their local hour-of-day; rows that share
/// an hour are summed. Hours without a row become zero-valued samples stamped
/// at `day + hour`, so an empty result still yields a full day.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    day: NaiveDate,
    entries: [Sample; HOURS_PER_DAY],
}

impl BarSeries {
    /// A zero-valued day.
    pub fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            entries: std::array::from_fn(|h| Sample::new(local_at(hour_of(day, h)), 0.0)),
        }
    }

    /// Gap-fill provider rows into 24 hour-ascending buckets.
    pub fn from_hourly(day: NaiveDate, rows: &[HourlySteps]) -> Self {
        let mut series = Self::empty(day);
        for row in rows {
            let slot = row.hour.hour() as usize;
            let entry = &mut series.entries[slot];
            entry.value += row.steps;
            entry.timestamp = local_at(hour_of(row.hour.date(), slot));
        }
        series
    }

    #[cfg(test)]
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn entries(&self) -> &[Sample] {
        &self.entries
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Value at `index`, or 0 when out of range.
    pub fn value(&self, index: usize) -> f64 {
        self.entries.get(index).map(|s| s.value).unwrap_or(0.0)
    }

    /// Two-digit hour label for a bucket.
    pub fn label(index: usize) -> String {
        format!("{:02}", index % HOURS_PER_DAY)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|s| s.value).sum()
    }

    #[cfg(test)]
    pub fn max(&self) -> f64 {
        self.entries.iter().map(|s| s.value).fold(0.0, f64::max)
    }

    pub fn first_nonzero(&self) -> Option<usize> {
        self.entries.iter().position(|s| s.value > 0.0)
    }

    pub fn is_all_zero(&self) -> bool {
        self.first_nonzero().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()
    }

    fn row(hour: u32, steps: f64) -> HourlySteps {
        HourlySteps {
            hour: day().and_hms_opt(hour, 0, 0).unwrap(),
            steps,
        }
    }

    // ── Gap filling ───────────────────────────────────────────────

    #[test]
    fn sparse_rows_land_in_their_hour() {
        let series = BarSeries::from_hourly(day(), &[row(9, 150.0), row(14, 300.0)]);
        assert_eq!(series.len(), 24);
        for (hour, sample) in series.entries().iter().enumerate() {
            let expected = match hour {
                9 => 150.0,
                14 => 300.0,
                _ => 0.0,
            };
            assert_eq!(sample.value, expected, "hour {}", hour);
        }
    }

    #[test]
    fn empty_rows_yield_full_zero_day() {
        let series = BarSeries::from_hourly(day(), &[]);
        assert_eq!(series.len(), 24);
        assert!(series.is_all_zero());
        assert_eq!(series.total(), 0.0);
        assert_eq!(series.entries()[0].timestamp.date_naive(), day());
    }

    #[test]
    fn full_day_is_kept_in_order() {
        let rows: Vec<HourlySteps> = (0..24).map(|h| row(h, h as f64 + 1.0)).collect();
        let series = BarSeries::from_hourly(day(), &rows);
        assert_eq!(series.len(), 24);
        for h in 0..24 {
            assert_eq!(series.value(h), h as f64 + 1.0);
        }
    }

    #[test]
    fn shared_hours_are_summed() {
        let series = BarSeries::from_hourly(day(), &[row(7, 10.0), row(7, 5.0)]);
        assert_eq!(series.value(7), 15.0);
        assert_eq!(series.total(), 15.0);
    }

    #[test]
    fn synthesized_timestamps_ascend_by_hour() {
        let series = BarSeries::from_hourly(day(), &[row(3, 1.0)]);
        let hours: Vec<u32> = series
            .entries()
            .iter()
            .map(|s| s.timestamp.naive_local().hour())
            .collect();
        let mut sorted = hours.clone();
        sorted.sort_unstable();
        assert_eq!(hours, sorted);
    }

    // ── Accessors ─────────────────────────────────────────────────

    #[test]
    fn first_nonzero_and_max() {
        let series = BarSeries::from_hourly(day(), &[row(6, 40.0), row(18, 900.0)]);
        assert_eq!(series.first_nonzero(), Some(6));
        assert_eq!(series.max(), 900.0);
    }

    #[test]
    fn value_out_of_range_is_zero() {
        let series = BarSeries::empty(day());
        assert_eq!(series.value(99), 0.0);
    }

    #[test]
    fn labels_are_two_digit_hours() {
        assert_eq!(BarSeries::label(0), "00");
        assert_eq!(BarSeries::label(9), "09");
        assert_eq!(BarSeries::label(23), "23");
    }

    #[test]
    fn metric_display_and_unit() {
        assert_eq!(Metric::HeartRate.to_string(), "heart rate");
        assert_eq!(Metric::Weight.unit(), "lb");
    }

    #[test]
    fn local_midnight_is_start_of_day() {
        let midnight = local_midnight(day());
        assert_eq!(midnight.date_naive(), day());
        assert_eq!(midnight.hour(), 0);
    }

    // ── Properties ────────────────────────────────────────────────

    proptest! {
        #[test]
        fn any_hour_subset_fills_a_full_day(
            hours in proptest::collection::vec(proptest::option::of(0u32..20_000), 24)
        ) {
            let rows: Vec<HourlySteps> = hours
                .iter()
                .enumerate()
                .filter_map(|(h, n)| n.map(|n| row(h as u32, n as f64)))
                .collect();
            let series = BarSeries::from_hourly(day(), &rows);

            prop_assert_eq!(series.len(), 24);
            for (hour, sample) in series.entries().iter().enumerate() {
                prop_assert_eq!(sample.timestamp.naive_local().hour() as usize, hour);
                let expected = hours[hour].unwrap_or(0) as f64;
                prop_assert_eq!(sample.value, expected);
            }
            let total: f64 = rows.iter().map(|r| r.steps).sum();
            prop_assert_eq!(series.total(), total);
        }

        #[test]
        fn repeated_hours_sum_into_one_slot(
            rows in proptest::collection::vec((0u32..24, 0u32..1_000), 0..60)
        ) {
            let mut sums: BTreeMap<u32, f64> = BTreeMap::new();
            for &(h, n) in &rows {
                *sums.entry(h).or_default() += n as f64;
            }
            let rows: Vec<HourlySteps> = rows.iter().map(|&(h, n)| row(h, n as f64)).collect();
            let series = BarSeries::from_hourly(day(), &rows);

            prop_assert_eq!(series.len(), 24);
            for hour in 0..24u32 {
                let expected = sums.get(&hour).copied().unwrap_or(0.0);
                prop_assert_eq!(series.value(hour as usize), expected);
            }
        }
    }
}
