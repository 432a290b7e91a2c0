//! Positions inside a camera image.
//!
//! Three representations are used:
//! - [`PercentCoordinate`]: normalized `[-1, 1]` on both axes, origin at the
//!   image centre, `+y` up.
//! - [`PixelCoordinate`]: integer pixel cells, origin at the image centre,
//!   `+y` up.
//! - [`CameraCoordinate`]: integer pixel cells, origin at the top-left
//!   corner, `+y` down.
//!
//! For a width `W` the centered `x` spans `[-(W/2), W-1-W/2]` (integer
//! division), so `camera.x = pixel.x + W/2`. Vertically the centered `y`
//! spans `[-(H/2), H-1-H/2]` and `camera.y = (H-1-H/2) - pixel.y`.

use std::hash::{Hash, Hasher};
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::units::hash_f64;

/// Image coordinate errors.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("resolution must be non-zero (width={width}, height={height})")]
    EmptyResolution { width: u32, height: u32 },
}

/// Image size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Result<Self, CoordinateError> {
        match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(CoordinateError::EmptyResolution { width, height }),
        }
    }

    /// 640×480.
    pub const VGA: Resolution = match (NonZeroU32::new(640), NonZeroU32::new(480)) {
        (Some(width), Some(height)) => Resolution { width, height },
        _ => unreachable!(),
    };

    #[inline]
    fn w(self) -> i64 {
        self.width.get() as i64
    }

    #[inline]
    fn h(self) -> i64 {
        self.height.get() as i64
    }

    /// Smallest valid top-left-origin column.
    #[inline]
    pub fn x_lower_bound(self) -> i32 {
        0
    }

    /// Largest valid top-left-origin column, `W - 1`.
    #[inline]
    pub fn x_upper_bound(self) -> i32 {
        saturate(self.w() - 1)
    }

    #[inline]
    pub fn y_lower_bound(self) -> i32 {
        0
    }

    /// Largest valid top-left-origin row, `H - 1`.
    #[inline]
    pub fn y_upper_bound(self) -> i32 {
        saturate(self.h() - 1)
    }

    #[inline]
    fn half_w(self) -> i64 {
        self.w() / 2
    }

    #[inline]
    fn top_row(self) -> i64 {
        self.h() - 1 - self.h() / 2
    }
}

#[inline]
fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Index of the pixel cell containing normalized position `p` along an axis
/// of `n` cells, where `-1` is the leading edge and `+1` the trailing edge.
fn percent_to_cell(p: f64, n: NonZeroU32) -> i64 {
    let n = n.get() as f64;
    let mut cell = ((p + 1.0) / 2.0 * n).floor();
    if p <= 1.0 {
        // The trailing edge, and anything that rounds onto it, belongs to the last cell.
        cell = cell.min(n - 1.0);
    }
    cell.clamp(i64::MIN as f64, i64::MAX as f64) as i64
}

/// Normalized position of the centre of `cell` along an axis of `n` cells.
fn cell_to_percent(cell: i64, n: NonZeroU32) -> f64 {
    (cell as f64 + 0.5) / n.get() as f64 * 2.0 - 1.0
}

/// Normalized image position, `[-1, 1]` on both axes inside the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentCoordinate {
    pub x: f64,
    pub y: f64,
}

impl Eq for PercentCoordinate {}

impl Hash for PercentCoordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.x, state);
        hash_f64(self.y, state);
    }
}

impl PercentCoordinate {
    pub const CENTER: PercentCoordinate = PercentCoordinate { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_raw(x: f64, y: f64) -> Self {
        Self::new(x, y)
    }

    pub fn to_raw(self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// True when both components lie in `[-1, 1]`.
    pub fn is_within_frame(&self) -> bool {
        (-1.0..=1.0).contains(&self.x) && (-1.0..=1.0).contains(&self.y)
    }

    /// Clamp each component into `[-1, 1]`, keeping its sign.
    pub fn clamped(&self) -> Self {
        Self {
            x: self.x.clamp(-1.0, 1.0),
            y: self.y.clamp(-1.0, 1.0),
        }
    }

    pub fn camera_coordinate(&self, resolution: Resolution) -> CameraCoordinate {
        let x = percent_to_cell(self.x, resolution.width);
        let y = percent_to_cell(-self.y, resolution.height);
        CameraCoordinate::new(saturate(x), saturate(y), resolution)
    }

    pub fn pixel_coordinate(&self, resolution: Resolution) -> PixelCoordinate {
        self.camera_coordinate(resolution).pixel_coordinate()
    }
}

impl From<(f64, f64)> for PercentCoordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Pixel cell relative to the image centre, `+y` up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub x: i32,
    pub y: i32,
    pub res_width: NonZeroU32,
    pub res_height: NonZeroU32,
}

impl PixelCoordinate {
    pub fn new(x: i32, y: i32, resolution: Resolution) -> Self {
        Self {
            x,
            y,
            res_width: resolution.width,
            res_height: resolution.height,
        }
    }

    pub fn from_raw(
        x: i32,
        y: i32,
        res_width: u32,
        res_height: u32,
    ) -> Result<Self, CoordinateError> {
        Ok(Self::new(x, y, Resolution::new(res_width, res_height)?))
    }

    pub fn to_raw(self) -> (i32, i32, u32, u32) {
        (self.x, self.y, self.res_width.get(), self.res_height.get())
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.res_width,
            height: self.res_height,
        }
    }

    /// `-(W/2)`.
    pub fn x_lower_bound(&self) -> i32 {
        saturate(-self.resolution().half_w())
    }

    /// `W - 1 - W/2`.
    pub fn x_upper_bound(&self) -> i32 {
        let r = self.resolution();
        saturate(r.w() - 1 - r.half_w())
    }

    /// `-(H/2)`.
    pub fn y_lower_bound(&self) -> i32 {
        saturate(-(self.resolution().h() / 2))
    }

    /// `H - 1 - H/2`.
    pub fn y_upper_bound(&self) -> i32 {
        saturate(self.resolution().top_row())
    }

    pub fn is_within_bounds(&self) -> bool {
        (self.x_lower_bound()..=self.x_upper_bound()).contains(&self.x)
            && (self.y_lower_bound()..=self.y_upper_bound()).contains(&self.y)
    }

    pub fn clamped(&self) -> Self {
        Self {
            x: self.x.clamp(self.x_lower_bound(), self.x_upper_bound()),
            y: self.y.clamp(self.y_lower_bound(), self.y_upper_bound()),
            ..*self
        }
    }

    /// Move the origin to the top-left corner and flip `y` downward.
    pub fn camera_coordinate(&self) -> CameraCoordinate {
        let r = self.resolution();
        let x = self.x as i64 + r.half_w();
        let y = r.top_row() - self.y as i64;
        CameraCoordinate::new(saturate(x), saturate(y), r)
    }

    /// Normalized position of this pixel's centre.
    pub fn percent_coordinate(&self) -> PercentCoordinate {
        self.camera_coordinate().percent_coordinate()
    }
}

impl From<(i32, i32, Resolution)> for PixelCoordinate {
    fn from((x, y, resolution): (i32, i32, Resolution)) -> Self {
        Self::new(x, y, resolution)
    }
}

/// Pixel cell relative to the top-left corner, `+y` down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraCoordinate {
    pub x: i32,
    pub y: i32,
    pub res_width: NonZeroU32,
    pub res_height: NonZeroU32,
}

impl CameraCoordinate {
    pub fn new(x: i32, y: i32, resolution: Resolution) -> Self {
        Self {
            x,
            y,
            res_width: resolution.width,
            res_height: resolution.height,
        }
    }

    pub fn from_raw(
        x: i32,
        y: i32,
        res_width: u32,
        res_height: u32,
    ) -> Result<Self, CoordinateError> {
        Ok(Self::new(x, y, Resolution::new(res_width, res_height)?))
    }

    pub fn to_raw(self) -> (i32, i32, u32, u32) {
        (self.x, self.y, self.res_width.get(), self.res_height.get())
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.res_width,
            height: self.res_height,
        }
    }

    pub fn x_lower_bound(&self) -> i32 {
        self.resolution().x_lower_bound()
    }

    pub fn x_upper_bound(&self) -> i32 {
        self.resolution().x_upper_bound()
    }

    pub fn y_lower_bound(&self) -> i32 {
        self.resolution().y_lower_bound()
    }

    pub fn y_upper_bound(&self) -> i32 {
        self.resolution().y_upper_bound()
    }

    pub fn is_within_bounds(&self) -> bool {
        (self.x_lower_bound()..=self.x_upper_bound()).contains(&self.x)
            && (self.y_lower_bound()..=self.y_upper_bound()).contains(&self.y)
    }

    pub fn clamped(&self) -> Self {
        Self {
            x: self.x.clamp(self.x_lower_bound(), self.x_upper_bound()),
            y: self.y.clamp(self.y_lower_bound(), self.y_upper_bound()),
            ..*self
        }
    }

    /// Inverse of [`PixelCoordinate::camera_coordinate`].
    pub fn pixel_coordinate(&self) -> PixelCoordinate {
        let r = self.resolution();
        let x = self.x as i64 - r.half_w();
        let y = r.top_row() - self.y as i64;
        PixelCoordinate::new(saturate(x), saturate(y), r)
    }

    pub fn percent_coordinate(&self) -> PercentCoordinate {
        PercentCoordinate {
            x: cell_to_percent(self.x as i64, self.res_width),
            y: -cell_to_percent(self.y as i64, self.res_height),
        }
    }
}

impl From<(i32, i32, Resolution)> for CameraCoordinate {
    fn from((x, y, resolution): (i32, i32, Resolution)) -> Self {
        Self::new(x, y, resolution)
    }
}
