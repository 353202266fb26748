//! Bounds and step alignment for numeric fields
//!
//! [`align`] snaps a value onto the grid `min + k * step` and keeps it inside
//! `[min, max]`. It never fails: bad values and bad bounds are corrected, not
//! rejected.

use serde::Serialize;

/// Smallest integer exactly representable in an `f64` (`-(2^53 - 1)`)
pub const MIN_SAFE_INTEGER: f64 = -9_007_199_254_740_991.0;

/// Largest integer exactly representable in an `f64` (`2^53 - 1`)
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// Above this many decimals, rescaling for rounding costs more precision than
// it recovers.
const MAX_ROUNDING_DECIMALS: u32 = 10;

/// Snap `value` to the step grid anchored at `min` and clamp it into bounds
///
/// 1. The offset from `min` is reduced modulo `step` (always into `[0, step)`).
/// 2. The value is rounded to the nearest grid point.
/// 3. Values below `min` become `min`.
/// 4. Values above `max` become the highest grid point not above `max`. When
///    `max - min` is not a multiple of `step`, that is strictly below `max`.
///
/// The result is rounded to the decimal precision of `min` and `step` so
/// binary floating-point drift does not survive alignment. NaN aligns to
/// `min`; infinities clamp to the nearest bound.
pub fn align(value: f64, min: f64, max: f64, step: f64) -> f64 {
    let precision = precision_of(min, step);

    if value.is_nan() {
        return min;
    }

    let snapped = if value.is_finite() {
        let remainder = grid_remainder(value - min, step);
        round_to(
            value - remainder + (remainder / step).round() * step,
            precision,
        )
    } else {
        value
    };

    let aligned = snapped.max(min);
    if aligned > max {
        grid_ceiling(min, max, step, precision)
    } else {
        aligned
    }
}

/// Highest grid point not above `max`, i.e. `max - ((max - min) mod step)`
///
/// Counted in whole steps from `min` so the result stays on the grid. A
/// count that lands within noise of the next grid point is taken, then
/// stepped back down if rounding carries it past `max`.
fn grid_ceiling(min: f64, max: f64, step: f64, precision: Option<u32>) -> f64 {
    let steps = ((max - min) / step + 1e-9).floor();
    let mut ceiling = round_to(min + steps * step, precision);
    if ceiling > max {
        ceiling = round_to(min + (steps - 1.0).max(0.0) * step, precision);
    }
    ceiling.max(min)
}

/// `offset mod step`, sign-normalized into `[0, step)`
///
/// Remainders within floating-point noise of `step` are treated as zero, so
/// `0.3 mod 0.1` is `0` rather than `0.09999999999999998`.
fn grid_remainder(offset: f64, step: f64) -> f64 {
    let remainder = offset.rem_euclid(step);
    if step - remainder <= step * 1e-9 {
        0.0
    } else {
        remainder
    }
}

/// Decimal places needed to represent every grid point exactly
fn precision_of(min: f64, step: f64) -> Option<u32> {
    let places = decimal_places(min).max(decimal_places(step));
    (places <= MAX_ROUNDING_DECIMALS).then_some(places)
}

fn decimal_places(x: f64) -> u32 {
    if !x.is_finite() {
        return 0;
    }
    // f64's Display never uses exponent notation and prints the shortest
    // representation that round-trips.
    let text = x.abs().to_string();
    text.split_once('.')
        .map(|(_, frac)| frac.len() as u32)
        .unwrap_or(0)
}

fn round_to(value: f64, precision: Option<u32>) -> f64 {
    let Some(places) = precision else {
        return value;
    };
    let scale = 10f64.powi(places as i32);
    let scaled = value * scale;
    if !scaled.is_finite() || scaled.abs() > MAX_SAFE_INTEGER {
        return value;
    }
    let rounded = scaled.round() / scale;
    // Normalize -0.0 so it displays as "0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Parse the leading number of `text`, ignoring surrounding whitespace
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent, and stops at the first character that cannot extend
/// the number (`"12px"` parses as `12`). `"Infinity"` is accepted. Returns
/// `None` when no number starts the text, including for empty text.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };

    if rest.starts_with("Infinity") {
        return Some(sign * f64::INFINITY);
    }

    let bytes = rest.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_digits = digits_from(0);
    let mut end = int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let exp_digits = digits_from(cursor);
        if exp_digits > 0 {
            end = cursor + exp_digits;
        }
    }

    rest[..end].parse::<f64>().ok().map(|v| sign * v)
}

/// Render a number the way an edit surface shows it
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Covers -0.0 as well.
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Inclusive bounds plus a positive step
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StepConstraints {
    min: f64,
    max: f64,
    step: f64,
}

impl Default for StepConstraints {
    fn default() -> Self {
        Self {
            min: MIN_SAFE_INTEGER,
            max: MAX_SAFE_INTEGER,
            step: 1.0,
        }
    }
}

impl StepConstraints {
    /// Build constraints, correcting invalid configuration
    ///
    /// Non-finite bounds fall back to the safe-integer range, a step that is
    /// not a positive finite number falls back to `1`, and `max` is raised to
    /// `min` when it is below it.
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        let min = if min.is_finite() {
            min
        } else {
            tracing::debug!(min, "non-finite minimum replaced");
            MIN_SAFE_INTEGER
        };
        let max = if max.is_finite() {
            max
        } else {
            tracing::debug!(max, "non-finite maximum replaced");
            MAX_SAFE_INTEGER
        };
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            tracing::debug!(step, "invalid step replaced with 1");
            1.0
        };
        if max < min {
            tracing::debug!(min, max, "maximum raised to minimum");
        }

        Self {
            min,
            max: max.max(min),
            step,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Align a value to these constraints
    pub fn align(&self, value: f64) -> f64 {
        align(value, self.min, self.max, self.step)
    }

    /// Whether `value` lies within the bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Whether one step up from `value` stays within bounds
    pub fn can_step_up(&self, value: f64) -> bool {
        value + self.step <= self.max
    }

    /// Whether one step down from `value` stays within bounds
    pub fn can_step_down(&self, value: f64) -> bool {
        value - self.step >= self.min
    }

    /// Highest step-aligned value inside the bounds
    pub fn ceiling(&self) -> f64 {
        self.align(self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_rounds_to_nearest_step() {
        // 7 is one above the grid point 6 and two below 9.
        assert_eq!(align(7.0, 0.0, 10.0, 3.0), 6.0);
        assert_eq!(align(8.0, 0.0, 10.0, 3.0), 9.0);
        // Halfway rounds up.
        assert_eq!(align(5.0, 0.0, 100.0, 2.0), 6.0);
    }

    #[test]
    fn test_align_clamps_high_to_grid() {
        // 11 snaps to 12, above max; the highest grid point under 10 is 9.
        assert_eq!(align(11.0, 0.0, 10.0, 3.0), 9.0);
        // max itself is not reachable when it is off the grid.
        assert_eq!(align(10.0, 0.0, 10.0, 3.0), 9.0);
        // ... but is when the range divides evenly.
        assert_eq!(align(50.0, 0.0, 12.0, 3.0), 12.0);
    }

    #[test]
    fn test_align_ceiling_never_exceeds_max() {
        // max sits within noise of the grid point 3, which is above it.
        assert_eq!(align(5.0, 0.0, 2.9999999999, 1.0), 2.0);
        assert_eq!(align(2.9999999999, 0.0, 2.9999999999, 1.0), 2.0);
        assert_eq!(StepConstraints::new(0.0, 2.9999999999, 1.0).ceiling(), 2.0);
        // Without a usable precision the ceiling is still a grid point.
        let (step, max) = (1e-11, 2.9999999999e-11);
        let ceiling = align(1.0, 0.0, max, step);
        assert!(ceiling <= max);
        assert!((ceiling / step - 2.0).abs() < 1e-6);
        // Fractional configurations clamp onto the grid below max.
        assert_eq!(align(0.95, 0.0, 0.9, 0.25), 0.75);
        assert_eq!(align(9.0, 0.05, 1.0, 0.3), 0.95);
    }

    #[test]
    fn test_align_clamps_low() {
        assert_eq!(align(-4.0, 0.0, 10.0, 3.0), 0.0);
        assert_eq!(align(-1.0, 0.0, 10.0, 3.0), 0.0);
    }

    #[test]
    fn test_align_offset_grid() {
        // Grid anchored at 1: 1, 4, 7, 10.
        assert_eq!(align(5.0, 1.0, 10.0, 3.0), 4.0);
        assert_eq!(align(6.0, 1.0, 10.0, 3.0), 7.0);
        assert_eq!(align(10.0, 1.0, 10.0, 3.0), 10.0);
        // Negative anchors use the normalized remainder.
        assert_eq!(align(-7.0, -10.0, 10.0, 4.0), -6.0);
    }

    #[test]
    fn test_align_fractional_steps() {
        assert_eq!(align(0.3, 0.0, 1.0, 0.1), 0.3);
        assert_eq!(align(0.1 + 0.2, 0.0, 1.0, 0.1), 0.3);
        assert_eq!(align(0.26, 0.0, 1.0, 0.25), 0.25);
        assert_eq!(align(0.3, 0.0, 0.3, 0.1), 0.3);
        assert_eq!(align(1.05, 0.5, 2.0, 0.25), 1.0);
    }

    #[test]
    fn test_align_non_finite() {
        assert_eq!(align(f64::NAN, 2.0, 10.0, 1.0), 2.0);
        assert_eq!(align(f64::INFINITY, 0.0, 10.0, 3.0), 9.0);
        assert_eq!(align(f64::NEG_INFINITY, 0.0, 10.0, 3.0), 0.0);
    }

    #[test]
    fn test_align_degenerate_range() {
        assert_eq!(align(42.0, 5.0, 5.0, 3.0), 5.0);
        assert_eq!(align(-42.0, 5.0, 5.0, 3.0), 5.0);
    }

    #[test]
    fn test_align_is_deterministic() {
        let first = align(123.456, -7.5, 999.0, 0.75);
        for _ in 0..10 {
            assert_eq!(align(123.456, -7.5, 999.0, 0.75), first);
        }
    }

    #[test]
    fn test_constraints_correct_configuration() {
        let c = StepConstraints::new(10.0, 2.0, 0.0);
        assert_eq!(c.min(), 10.0);
        assert_eq!(c.max(), 10.0);
        assert_eq!(c.step(), 1.0);

        let c = StepConstraints::new(f64::NEG_INFINITY, f64::NAN, -2.0);
        assert_eq!(c, StepConstraints::default());
    }

    #[test]
    fn test_constraints_stepping_flags() {
        let c = StepConstraints::new(0.0, 10.0, 3.0);
        assert!(c.can_step_up(6.0));
        assert!(!c.can_step_up(9.0));
        assert!(c.can_step_down(3.0));
        assert!(!c.can_step_down(2.0));
        assert_eq!(c.ceiling(), 9.0);
        assert!(c.contains(10.0));
        assert!(!c.contains(10.5));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12"), Some(12.0));
        assert_eq!(parse_number("  -3.5 "), Some(-3.5));
        assert_eq!(parse_number("+.5"), Some(0.5));
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number("12px"), Some(12.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("2e"), Some(2.0));
        assert_eq!(parse_number("1.5e-1x"), Some(0.15));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_parse_number_rejects() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("notanumber"), None);
        assert_eq!(parse_number("."), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("e5"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(6.0), "6");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-12.5), "-12.5");
    }
}
