//! Threshold arithmetic shared by the sweep, the analyzer, and file naming.

/// Relative tolerance used by [`is_close`].
pub const CLOSE_RTOL: f64 = 1e-5;
/// Absolute tolerance used by [`is_close`].
pub const CLOSE_ATOL: f64 = 1e-8;

/// Numeric closeness, `|a - b| <= atol + rtol * |b|`.
///
/// Thresholds produced by repeated step addition rarely compare equal, so
/// every threshold match goes through this function.
#[must_use]
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= CLOSE_RTOL.mul_add(b.abs(), CLOSE_ATOL)
}

/// Round `value` to `precision` decimal places.
#[must_use]
pub fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10_f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    (value * scale).round() / scale
}

/// Decimal places a threshold swept at `precision` is rendered with.
///
/// Never fewer than two, so the usual `0.60` names stay stable, and never
/// fewer than `precision`, so distinct rounded thresholds get distinct names.
#[must_use]
pub fn threshold_decimals(precision: u32) -> usize {
    usize::try_from(precision).unwrap_or(usize::MAX).max(2)
}

/// Rendering used in output file names and log lines.
#[must_use]
pub fn format_threshold(threshold: f64, precision: u32) -> String {
    format!("{threshold:.*}", threshold_decimals(precision))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulated_steps_are_close() {
        let mut t = 0.5;
        for _ in 0..5 {
            t += 0.02;
        }
        assert!(is_close(t, 0.6));
        assert!(!is_close(0.58, 0.6));
    }

    #[test]
    fn rounding_clears_float_noise() {
        assert!((round_to(0.600_000_000_000_000_1, 2) - 0.6).abs() < f64::EPSILON);
        assert!((round_to(0.555, 1) - 0.6).abs() < f64::EPSILON);
        assert!((round_to(0.123_456, 4) - 0.1235).abs() < f64::EPSILON);
    }

    #[test]
    fn formatting_uses_at_least_two_decimals() {
        assert_eq!(format_threshold(0.6, 2), "0.60");
        assert_eq!(format_threshold(0.6, 0), "0.60");
        assert_eq!(format_threshold(0.580_000_000_000_000_1, 2), "0.58");
        assert_eq!(format_threshold(0.505, 3), "0.505");
        assert_eq!(format_threshold(0.5, 3), "0.500");
    }
}
