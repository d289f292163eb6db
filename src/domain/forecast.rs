//! Turns the provider's flat, time-ordered forecast samples into one
//! [`ForecastDay`] per calendar date.
//!
//! Dates are read straight from the sample timestamps. No timezone
//! conversion happens here; the provider already reports local time.

use std::collections::HashMap;

use crate::domain::weather::{
    ConditionLabel, ForecastDay, HourSample, Temperature, icon_url, percent_from_probability,
};

/// One provider forecast sample, before any grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub timestamp: String,
    pub temp_c: f64,
    pub condition_id: u32,
    pub condition_main: String,
    pub condition_icon: String,
    /// Provider probability of precipitation, nominally `0.0..=1.0`.
    pub precip_probability: f64,
}

impl RawSample {
    fn condition_label(&self) -> ConditionLabel {
        ConditionLabel {
            text: self.condition_main.clone(),
            code: self.condition_id,
            icon: icon_url(&self.condition_icon),
        }
    }
}

#[derive(Debug)]
struct Bucket<'a> {
    date: &'a str,
    samples: Vec<&'a RawSample>,
}

/// Empty input yields an empty forecast.
#[must_use]
pub fn normalize_forecast(samples: &[RawSample]) -> Vec<ForecastDay> {
    group_by_date(samples)
        .into_iter()
        .map(summarize_bucket)
        .collect()
}

/// Date portion of a provider timestamp (`2024-01-01 12:00:00` or
/// `2024-01-01T12:00`).
#[must_use]
pub fn sample_date(timestamp: &str) -> &str {
    let trimmed = timestamp.trim();
    trimmed
        .split_once(['T', ' '])
        .map_or(trimmed, |(date, _)| date)
}

fn group_by_date(samples: &[RawSample]) -> Vec<Bucket<'_>> {
    let mut buckets: Vec<Bucket<'_>> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for sample in samples {
        let date = sample_date(&sample.timestamp);
        let slot = *slots.entry(date).or_insert_with(|| {
            buckets.push(Bucket {
                date,
                samples: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].samples.push(sample);
    }

    buckets
}

fn summarize_bucket(bucket: Bucket<'_>) -> ForecastDay {
    let (min_c, max_c, avg_c) = temperature_stats(&bucket.samples);
    let max_probability = bucket
        .samples
        .iter()
        .map(|sample| sample.precip_probability)
        .fold(f64::NEG_INFINITY, f64::max);

    ForecastDay {
        date: bucket.date.to_string(),
        min_temp: Temperature::from_celsius(min_c),
        max_temp: Temperature::from_celsius(max_c),
        avg_temp: Temperature::from_celsius(avg_c),
        condition: representative_condition(&bucket.samples),
        daily_chance_of_rain: percent_from_probability(max_probability),
        hours: bucket.samples.iter().map(|sample| hour_sample(sample)).collect(),
    }
}

/// Min, max and mean over the finite readings. A bucket with no finite
/// reading yields NaN for all three.
fn temperature_stats(samples: &[&RawSample]) -> (f64, f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut count = 0usize;
    for temp in samples.iter().map(|sample| sample.temp_c).filter(|t| t.is_finite()) {
        min = min.min(temp);
        max = max.max(temp);
        sum += temp;
        count += 1;
    }
    if count == 0 {
        return (f64::NAN, f64::NAN, f64::NAN);
    }
    let mean = sum / count as f64;
    // Summation error can push the mean one ulp past the extremes.
    (min, max, mean.max(min).min(max))
}

/// Most frequent condition id; on a tie the id seen first wins.
fn representative_condition(samples: &[&RawSample]) -> ConditionLabel {
    let mut tally: Vec<(&RawSample, usize)> = Vec::new();
    for sample in samples {
        match tally
            .iter_mut()
            .find(|(first, _)| first.condition_id == sample.condition_id)
        {
            Some((_, count)) => *count += 1,
            None => tally.push((*sample, 1)),
        }
    }

    let mut best: Option<(&RawSample, usize)> = None;
    for (first, count) in tally {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((first, count));
        }
    }

    best.map(|(first, _)| first.condition_label())
        .unwrap_or_else(|| ConditionLabel {
            text: String::new(),
            code: 0,
            icon: String::new(),
        })
}

fn hour_sample(sample: &RawSample) -> HourSample {
    HourSample {
        time: sample.timestamp.clone(),
        temp: Temperature::from_celsius(sample.temp_c),
        condition: sample.condition_label(),
        chance_of_rain: percent_from_probability(sample.precip_probability),
    }
}
