use core::fmt;

/// Argument to an inverse cosine, clamped onto [-1, 1].
///
/// Rounding, or a target outside the workspace, can push a ratio that should
/// be a cosine slightly (or wildly) past the unit interval. The clamped value
/// is what gets fed to `acos`; the raw value is kept so the caller can
/// still tell that the answer is an approximation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClampedRatio {
    raw: f64,
    value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRange {
    pub min: f64,
    pub max: f64,
    pub observed: f64,
}

impl OutOfRange {
    #[inline]
    pub fn check(min: f64, max: f64, observed: f64) -> Result<(), Self> {
        if (min..=max).contains(&observed) {
            Ok(())
        } else {
            Err(Self { min, max, observed })
        }
    }
}

impl fmt::Display for OutOfRange {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is outside [{}, {}]",
            self.observed, self.min, self.max
        )
    }
}

impl core::error::Error for OutOfRange {}

impl ClampedRatio {
    pub const MIN: f64 = -1.0;
    pub const MAX: f64 = 1.0;

    /// `None` only for NaN, which has no meaningful clamp.
    #[inline]
    pub fn new(raw: f64) -> Option<Self> {
        if raw.is_nan() {
            return None;
        }
        Some(Self {
            raw,
            value: raw.clamp(Self::MIN, Self::MAX),
        })
    }

    #[inline]
    pub fn raw(&self) -> f64 {
        self.raw
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn was_clamped(&self) -> bool {
        self.raw != self.value
    }

    #[inline]
    pub fn check(&self) -> Result<(), OutOfRange> {
        OutOfRange::check(Self::MIN, Self::MAX, self.raw)
    }

    #[inline]
    pub fn acos(&self) -> f64 {
        libm::acos(self.value)
    }
}
