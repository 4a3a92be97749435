//! Two-point linear interpolation and extrapolation.

/// Maps `query_x` onto the line through `(left_x, left_y)` and `(right_x, right_y)`.
///
/// Works both inside the segment (interpolation) and outside it
/// (extrapolation). The caller guarantees `left_x != right_x`; no bounds
/// checking is done.
///
/// # Examples
///
/// ```
/// use analog_forecast::analog::mapper::map;
///
/// assert_eq!(map(1.5, 1.0, 10.0, 2.0, 20.0), 15.0);
/// assert_eq!(map(3.0, 1.0, 10.0, 2.0, 20.0), 30.0);
/// ```
#[inline]
pub fn map(query_x: f64, left_x: f64, left_y: f64, right_x: f64, right_y: f64) -> f64 {
    ((query_x - left_x) / (right_x - left_x)) * (right_y - left_y) + left_y
}

#[cfg(test)]
mod tests {
    use super::map;

    #[test]
    fn interpolates_midpoint() {
        assert_eq!(map(1.5, 1.0, 10.0, 2.0, 20.0), 15.0);
    }

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(map(1.0, 1.0, 10.0, 2.0, 20.0), 10.0);
        assert_eq!(map(2.0, 1.0, 10.0, 2.0, 20.0), 20.0);
    }

    #[test]
    fn extrapolates_on_both_sides() {
        assert_eq!(map(0.0, 1.0, 10.0, 2.0, 20.0), 0.0);
        assert_eq!(map(4.0, 1.0, 10.0, 2.0, 20.0), 40.0);
    }

    #[test]
    fn decreasing_segment() {
        assert_eq!(map(0.25, 0.0, 4.0, 1.0, 0.0), 3.0);
    }
}
