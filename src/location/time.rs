//! Time quantization for location tokens.
//!
//! Each observation is assigned two rounded buckets, one on either side of
//! the true time. Two devices whose clocks disagree by less than half an
//! interval always share at least one bucket.

use serde::{Deserialize, Serialize};

/// Default bucket width: five minutes.
pub const DEFAULT_WINDOW_INTERVAL_MS: i64 = 5 * 60 * 1000;

/// How bucket boundaries are computed for the division step.
///
/// The two modes only differ when `t - interval/2` is negative, i.e. for
/// timestamps before 1970 or within half an interval after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowRounding {
    /// Round toward negative infinity.
    #[default]
    Floor,
    /// Round toward zero, as tokens produced by older clients did.
    Truncate,
}

impl WindowRounding {
    /// Computes the early/late windows for `timestamp_ms`.
    ///
    /// A non-positive `interval_ms` has no buckets to round to, so both
    /// windows are the timestamp itself.
    #[must_use]
    pub const fn windows(self, timestamp_ms: i64, interval_ms: i64) -> TimeWindows {
        if interval_ms <= 0 {
            return TimeWindows {
                early: timestamp_ms,
                late: timestamp_ms,
            };
        }

        let half = interval_ms / 2;
        let before = timestamp_ms.saturating_sub(half);
        let after = timestamp_ms.saturating_add(half);

        match self {
            Self::Floor => TimeWindows {
                early: before.div_euclid(interval_ms).saturating_mul(interval_ms),
                late: after.div_euclid(interval_ms).saturating_mul(interval_ms),
            },
            Self::Truncate => TimeWindows {
                early: (before / interval_ms).saturating_mul(interval_ms),
                late: (after / interval_ms).saturating_mul(interval_ms),
            },
        }
    }
}

/// The pair of rounded buckets bracketing one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindows {
    /// Bucket at or before `t - interval/2`.
    pub early: i64,
    /// Bucket at or before `t + interval/2`.
    pub late: i64,
}

/// Computes time windows with floor division.
///
/// # Examples
///
/// ```
/// use geotrace_core::location::time_windows;
///
/// let windows = time_windows(1_590_000_000_000, 300_000);
/// assert_eq!(windows.early, 1_589_999_700_000);
/// assert_eq!(windows.late, 1_590_000_000_000);
/// ```
#[must_use]
pub const fn time_windows(timestamp_ms: i64, interval_ms: i64) -> TimeWindows {
    WindowRounding::Floor.windows(timestamp_ms, interval_ms)
}
