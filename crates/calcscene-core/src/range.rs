//! Min/max scans and normalization helpers.

/// A closed `[min, max]` interval observed over some data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Creates a range from explicit bounds.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Scans the finite values of `values`.
    ///
    /// Returns `None` when no finite value is present.
    pub fn of_finite<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some(Self::new(v, v)),
                Some(r) => Some(Self::new(r.min.min(v), r.max.max(v))),
            })
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true when `max == min`.
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }

    /// Maps `value` to `(value - min) / span`.
    ///
    /// A zero-width range divides by 1 instead, so the result is
    /// `value - min`: defined, never NaN.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        let divisor = if span == 0.0 { 1.0 } else { span };
        (value - self.min) / divisor
    }

    /// Like [`normalize`](Self::normalize) but clamped to `[0, 1]`.
    ///
    /// Non-finite input maps to 0.
    pub fn normalize_clamped(&self, value: f64) -> f32 {
        let t = self.normalize(value);
        if t.is_finite() {
            t.clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }

    /// Normalizes against the range, answering `0.5` for a degenerate range.
    pub fn normalize_or_mid(&self, value: f64) -> f32 {
        if self.is_degenerate() {
            0.5
        } else {
            self.normalize_clamped(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_skips_non_finite() {
        let r = ValueRange::of_finite([f64::NAN, 2.0, f64::INFINITY, -1.0, 5.0]).unwrap();
        assert_eq!(r, ValueRange::new(-1.0, 5.0));
    }

    #[test]
    fn scan_of_nothing_finite() {
        assert!(ValueRange::of_finite([f64::NAN, f64::NEG_INFINITY]).is_none());
        assert!(ValueRange::of_finite(std::iter::empty()).is_none());
    }

    #[test]
    fn degenerate_range_divides_by_one() {
        let r = ValueRange::new(3.0, 3.0);
        assert_eq!(r.normalize(3.0), 0.0);
        assert_eq!(r.normalize(3.5), 0.5);
        assert_eq!(r.normalize_or_mid(3.0), 0.5);
    }

    #[test]
    fn clamped_normalization() {
        let r = ValueRange::new(0.0, 2.0);
        assert_eq!(r.normalize_clamped(1.0), 0.5);
        assert_eq!(r.normalize_clamped(4.0), 1.0);
        assert_eq!(r.normalize_clamped(-4.0), 0.0);
        assert_eq!(r.normalize_clamped(f64::NAN), 0.0);
    }
}
