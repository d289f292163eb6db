const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

#[must_use]
pub fn meters_per_second_to_kph(speed: f64) -> f64 {
    speed * 3.6
}

/// 16-point compass label for a bearing. Any finite input is accepted;
/// bearings are normalized into `[0, 360)` first.
#[must_use]
pub fn compass_label(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    let sector = (normalized / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[sector]
}

#[must_use]
pub fn round_temp(value: f64) -> i32 {
    value.round() as i32
}

/// Provider probabilities are fractions in `[0, 1]` but are not trusted to
/// stay there.
#[must_use]
pub fn percent_from_probability(probability: f64) -> u8 {
    (probability * 100.0).round().clamp(0.0, 100.0) as u8
}
