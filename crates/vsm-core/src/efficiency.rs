//! Output scaling by the efficiency/quality percentage.

/// `floor(quantity * percent / 100)`, evaluated in f64 on the configured
/// percentage. Negative, NaN or infinite results yield 0.
pub fn scale_percent(quantity: u32, percent: f64) -> u64 {
    let scaled = (f64::from(quantity) * percent / 100.0).floor();
    // u32::MAX * MAX_EFFICIENCY / 100 is far below 2^53, so the cast is exact.
    if scaled.is_finite() && scaled > 0.0 && scaled < u64::MAX as f64 {
        scaled as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_efficiency_keeps_quantity() {
        assert_eq!(scale_percent(2, 100.0), 2);
        assert_eq!(scale_percent(7, 100.0), 7);
    }

    #[test]
    fn half_efficiency_floors() {
        assert_eq!(scale_percent(2, 50.0), 1);
        assert_eq!(scale_percent(3, 50.0), 1);
        assert_eq!(scale_percent(1, 50.0), 0);
    }

    #[test]
    fn integer_percentages() {
        assert_eq!(scale_percent(100, 7.0), 7);
        assert_eq!(scale_percent(100, 29.0), 29);
    }

    #[test]
    fn one_third_efficiency() {
        let third = 100.0 / 3.0;
        assert_eq!(scale_percent(3, third), 1);
        assert_eq!(scale_percent(300, third), 100);
        assert_eq!(scale_percent(2, third), 0);
    }

    #[test]
    fn fractional_percentages_match_float_floor() {
        for percent in [12.5, 33.3, 66.6, 99.9, 150.75, 0.1] {
            for quantity in [1u32, 3, 7, 10, 1000, 123_456] {
                let expected = (f64::from(quantity) * percent / 100.0).floor() as u64;
                assert_eq!(scale_percent(quantity, percent), expected, "{quantity} @ {percent}");
            }
        }
    }

    #[test]
    fn over_unity_efficiency_multiplies() {
        assert_eq!(scale_percent(4, 250.0), 10);
    }

    #[test]
    fn zero_negative_and_nan_percent_yield_nothing() {
        assert_eq!(scale_percent(10, 0.0), 0);
        assert_eq!(scale_percent(10, -20.0), 0);
        assert_eq!(scale_percent(10, f64::NAN), 0);
    }

    #[test]
    fn large_quantities_do_not_overflow() {
        let out = scale_percent(u32::MAX, 1000.0);
        assert_eq!(out, u64::from(u32::MAX) * 10);
    }
}
