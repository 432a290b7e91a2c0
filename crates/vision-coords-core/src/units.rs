//! Thin angle and length scalars used by the coordinate types.
//!
//! Only the surface the conversions need is provided: construction from the
//! common units, trigonometry, and basic arithmetic. Values serialize as the
//! bare stored number (degrees for [`Angle`], millimetres for [`Length`]).

use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Hash an `f64` so that values comparing equal hash equally.
#[inline]
pub(crate) fn hash_f64<H: Hasher>(value: f64, state: &mut H) {
    // -0.0 == 0.0, so both must produce the same bits.
    let canonical = if value == 0.0 { 0.0 } else { value };
    canonical.to_bits().hash(state);
}

/// A signed angle, stored in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);
    pub const STRAIGHT: Angle = Angle(180.0);

    #[inline]
    pub const fn from_degrees(degrees: f64) -> Self {
        Self(degrees)
    }

    #[inline]
    pub fn from_radians(radians: f64) -> Self {
        Self(radians.to_degrees())
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    #[inline]
    pub fn sin(self) -> f64 {
        self.radians().sin()
    }

    #[inline]
    pub fn cos(self) -> f64 {
        self.radians().cos()
    }

    #[inline]
    pub fn tan(self) -> f64 {
        self.radians().tan()
    }

    /// Four-quadrant arctangent of `y / x`.
    #[inline]
    pub fn atan2(y: f64, x: f64) -> Self {
        Self::from_radians(y.atan2(x))
    }

    /// Wrap into the canonical range `(-180°, 180°]`.
    pub fn normalized(self) -> Self {
        let mut d = self.0 % 360.0;
        if d <= -180.0 {
            d += 360.0;
        } else if d > 180.0 {
            d -= 360.0;
        }
        Self(d)
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

// NaN is the only value that breaks reflexivity; projections reject it.
impl Eq for Angle {}

impl Hash for Angle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.0, state);
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;
    fn mul(self, rhs: f64) -> Angle {
        Angle(self.0 * rhs)
    }
}

impl Div<f64> for Angle {
    type Output = Angle;
    fn div(self, rhs: f64) -> Angle {
        Angle(self.0 / rhs)
    }
}

/// A signed length, stored in millimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Length(f64);

impl Length {
    pub const ZERO: Length = Length(0.0);

    /// Distance reported when a pixel does not map onto the ground plane
    /// (at or above the horizon). Finite so that later arithmetic stays finite.
    pub const MAX_DISTANCE: Length = Length(i32::MAX as f64);

    #[inline]
    pub const fn from_millimetres(mm: f64) -> Self {
        Self(mm)
    }

    #[inline]
    pub fn from_centimetres(cm: f64) -> Self {
        Self(cm * 10.0)
    }

    #[inline]
    pub fn from_metres(m: f64) -> Self {
        Self(m * 1000.0)
    }

    #[inline]
    pub fn millimetres(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn centimetres(self) -> f64 {
        self.0 / 10.0
    }

    #[inline]
    pub fn metres(self) -> f64 {
        self.0 / 1000.0
    }

    /// Euclidean length of the vector `(x, y)`.
    #[inline]
    pub fn hypot(x: Length, y: Length) -> Length {
        Length(x.0.hypot(y.0))
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Clamp to `[0, MAX_DISTANCE]`.
    #[inline]
    pub fn clamp_distance(self) -> Self {
        Self(self.0.clamp(0.0, Self::MAX_DISTANCE.0))
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Eq for Length {}

impl Hash for Length {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.0, state);
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl Neg for Length {
    type Output = Length;
    fn neg(self) -> Length {
        Length(-self.0)
    }
}

impl Mul<f64> for Length {
    type Output = Length;
    fn mul(self, rhs: f64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<f64> for Length {
    type Output = Length;
    fn div(self, rhs: f64) -> Length {
        Length(self.0 / rhs)
    }
}
