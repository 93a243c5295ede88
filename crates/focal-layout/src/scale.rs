//! Continuous scales mapping a numeric domain onto a numeric range.

/// Linear map from `domain` onto `range`.
///
/// A degenerate domain maps every input to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    pub fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (v - d0) / span };
        interpolate(self.range, t, self.clamp)
    }
}

/// `sqrt` scale (power scale with exponent 0.5), clamped to its domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (s0, s1) = (self.domain.0.sqrt(), self.domain.1.sqrt());
        let span = s1 - s0;
        let t = if span == 0.0 {
            0.5
        } else {
            (v.max(0.0).sqrt() - s0) / span
        };
        interpolate(self.range, t, true)
    }
}

/// Base-2 logarithmic scale, clamped to its domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Log2Scale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl Log2Scale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (l0, l1) = (self.domain.0.log2(), self.domain.1.log2());
        let span = l1 - l0;
        let t = if span == 0.0 || v <= 0.0 {
            0.0
        } else {
            (v.log2() - l0) / span
        };
        interpolate(self.range, t, true)
    }
}

fn interpolate(range: (f64, f64), t: f64, clamp: bool) -> f64 {
    let t = if clamp { t.clamp(0.0, 1.0) } else { t };
    range.0 * (1.0 - t) + range.1 * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_scale_hits_both_ends_and_clamps() {
        let s = SqrtScale::new((1.0, 10_000.0), (350.0, 1000.0));
        assert_eq!(s.apply(1.0), 350.0);
        assert_eq!(s.apply(10_000.0), 1000.0);
        assert_eq!(s.apply(50_000.0), 1000.0);
        assert_eq!(s.apply(0.0), 350.0);
    }

    #[test]
    fn log_scale_interpolates_in_log_space() {
        let s = Log2Scale::new((1.0, 16.0), (0.0, 4.0));
        assert!((s.apply(4.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn linear_scale_with_flat_domain_returns_midpoint() {
        let s = LinearScale::new((3.0, 3.0), (10.0, 20.0));
        assert_eq!(s.apply(3.0), 15.0);
    }
}
