// ─────────────────────────────────────────────────────────────────────
// SCPN KHI Init — Output Timeline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Output time coordinates and file naming.

use chrono::{DateTime, Duration, Timelike, Utc};
use khi_types::error::{KhiError, KhiResult};

/// Closed range `start, start + step, ...` ending at or before
/// `start + duration`: `floor(duration / step) + 1` entries.
///
/// Durations are in seconds and resolved to microseconds.
pub fn datetime_range(
    start: DateTime<Utc>,
    duration_s: f64,
    step_s: f64,
) -> KhiResult<Vec<DateTime<Utc>>> {
    if !duration_s.is_finite() || duration_s < 0.0 {
        return Err(KhiError::ConfigError(format!(
            "duration must be non-negative, got {duration_s} s"
        )));
    }
    if !step_s.is_finite() || step_s <= 0.0 {
        return Err(KhiError::ConfigError(format!(
            "time step must be positive, got {step_s} s"
        )));
    }
    let duration_us = to_micros(duration_s);
    let step_us = to_micros(step_s);
    if step_us == 0 {
        return Err(KhiError::ConfigError(format!(
            "time step {step_s} s is below microsecond resolution"
        )));
    }
    let n = duration_us / step_us + 1;
    Ok((0..n)
        .map(|i| start + Duration::microseconds(i * step_us))
        .collect())
}

/// Index of the entry closest to `t`; the first one wins a tie.
pub fn nearest_index(times: &[DateTime<Utc>], t: DateTime<Utc>) -> Option<usize> {
    times
        .iter()
        .enumerate()
        .min_by_key(|(_, &ti)| (ti - t).num_microseconds().map_or(i64::MAX, i64::abs))
        .map(|(i, _)| i)
}

/// `start + seconds`, resolved to microseconds.
pub fn offset(start: DateTime<Utc>, seconds: f64) -> DateTime<Utc> {
    start + Duration::microseconds(to_micros(seconds))
}

/// File stem `YYYYMMDD_SSSSS.ffffff` (UT seconds of day).
pub fn datetime_stem(t: DateTime<Utc>) -> String {
    let seconds = t.num_seconds_from_midnight() as f64 + t.nanosecond() as f64 * 1e-9;
    format!("{}_{:012.6}", t.format("%Y%m%d"), seconds)
}

fn to_micros(seconds: f64) -> i64 {
    (seconds * 1e6).round() as i64
}
