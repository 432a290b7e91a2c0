//! Coordinate spaces of a robot vision pipeline and the projection between them.
//!
//! Ground-plane positions ([`RelativeCoordinate`], [`CartesianCoordinate`],
//! [`FieldCoordinate`]) and image positions ([`PercentCoordinate`],
//! [`PixelCoordinate`], [`CameraCoordinate`]) are plain value types. The
//! [`projection`] module maps between the two for a camera selected from a
//! [`CameraPivot`], assuming a pinhole camera over flat ground.
//!
//! ```
//! use vision_coords_core::{Angle, CameraPivot, Length, RelativeCoordinate, Resolution};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pivot = CameraPivot::nao_v5_head();
//! let ball = RelativeCoordinate::new(Angle::from_degrees(5.0), Length::from_centimetres(40.0));
//!
//! let pixel = ball.camera_coordinate(&pivot, 1, Resolution::VGA)?;
//! let seen = pixel.relative_coordinate(&pivot, 1)?;
//! assert!((seen.distance.centimetres() - 40.0).abs() < 1.0);
//! # Ok(())
//! # }
//! ```

mod camera;
mod ground;
mod image;
mod logger;
pub mod projection;
mod units;

pub use camera::{
    Camera, CameraError, CameraMount, CameraPivot, CameraPivotError, CameraPivotRecord,
    MAX_CAMERAS,
};
pub use ground::{
    to_cartesian, to_relative, CartesianCoordinate, FieldCoordinate, RelativeCoordinate,
};
pub use image::{CameraCoordinate, CoordinateError, PercentCoordinate, PixelCoordinate, Resolution};
pub use projection::ProjectionError;
pub use units::{Angle, Length};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, parse_level, LOG_ENV};
