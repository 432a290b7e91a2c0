//! Ground plane ⇄ image projection for a camera on a pan/tilt pivot.
//!
//! The camera is modelled as a pinhole looking at flat ground. A ground
//! target at horizontal range `r` from the camera is seen at a depression
//! angle `atan2(H, r)` below the horizon, where `H` is the camera height
//! (camera height plus its mount offset). Angular offsets from the optical
//! axis are mapped linearly onto `[-1, 1]` across each field of view:
//!
//! ```text
//! azimuth      = direction(target from camera) - pivot.yaw
//! vertical     = (pivot.pitch + camera.v_direction) - atan2(H, r)
//! percent.x    = -azimuth / (h_fov / 2)      // +x is right, azimuth + is left
//! percent.y    = vertical / (v_fov / 2)      // +y is up
//! ```
//!
//! The camera sits `center_offset` ahead of the pivot along the pivot yaw;
//! range and azimuth are taken from that position. With a zero offset the
//! camera and pivot positions coincide.
//!
//! The inverse reports [`Length::MAX_DISTANCE`] for image points at or above
//! the horizon, since those never meet the ground in front of the camera.

use nalgebra::Vector2;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::camera::CameraPivot;
use crate::ground::{to_relative, CartesianCoordinate, RelativeCoordinate};
use crate::image::{CameraCoordinate, PercentCoordinate, PixelCoordinate, Resolution};
use crate::units::{Angle, Length};

/// Errors reported by the projection functions.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("camera index {index} out of range (pivot has {count} cameras)")]
    CameraIndexOutOfRange { index: usize, count: usize },
    #[error("input coordinate is not finite")]
    NonFiniteInput,
}

/// Everything the projection needs about one selected camera.
#[derive(Clone, Copy, Debug)]
struct CameraGeometry {
    yaw: Angle,
    tilt: Angle,
    height: Length,
    /// Camera position relative to the pivot, millimetres.
    position: Vector2<f64>,
    half_h_fov: f64,
    half_v_fov: f64,
}

impl CameraGeometry {
    fn new(pivot: &CameraPivot, index: usize) -> Result<Self, ProjectionError> {
        let mount = pivot.mount(index)?;
        let camera = &mount.camera;
        let yaw = pivot.yaw();
        let offset = camera.center_offset.millimetres();
        Ok(Self {
            yaw,
            tilt: pivot.pitch() + camera.v_direction,
            height: mount.effective_height(),
            position: Vector2::new(offset * yaw.cos(), offset * yaw.sin()),
            half_h_fov: camera.h_fov.degrees() / 2.0,
            half_v_fov: camera.v_fov.degrees() / 2.0,
        })
    }

    /// Azimuth off the optical axis and horizontal range from the camera.
    fn camera_polar(&self, target: &RelativeCoordinate) -> (Angle, Length) {
        let from_camera = target.cartesian_coordinate().to_vector() - self.position;
        let (direction, range) = to_relative(
            Length::from_millimetres(from_camera.x),
            Length::from_millimetres(from_camera.y),
        );
        ((direction - self.yaw).normalized(), range)
    }

    fn project(&self, target: &RelativeCoordinate) -> PercentCoordinate {
        let (azimuth, range) = self.camera_polar(target);
        let elevation = Angle::atan2(self.height.millimetres(), range.millimetres());
        let vertical = self.tilt - elevation;
        PercentCoordinate::new(
            -azimuth.degrees() / self.half_h_fov,
            vertical.degrees() / self.half_v_fov,
        )
    }

    fn unproject(&self, percent: &PercentCoordinate) -> RelativeCoordinate {
        let azimuth = Angle::from_degrees(-percent.x * self.half_h_fov);
        let vertical = Angle::from_degrees(percent.y * self.half_v_fov);
        let elevation = (self.tilt - vertical).normalized();
        let heading = (azimuth + self.yaw).normalized();

        let below_horizon = elevation > Angle::ZERO && elevation < Angle::STRAIGHT;
        if !below_horizon || self.height <= Length::ZERO {
            log::trace!(
                "pixel ray at elevation {:.3} deg does not meet the ground",
                elevation.degrees()
            );
            return RelativeCoordinate::new(heading, Length::MAX_DISTANCE);
        }

        // Signed: negative when the ray passes under the camera and lands behind it.
        let max = Length::MAX_DISTANCE.millimetres();
        let range =
            (self.height.millimetres() * elevation.cos() / elevation.sin()).clamp(-max, max);
        let ground = self.position + Vector2::new(range * heading.cos(), range * heading.sin());
        let rel = CartesianCoordinate::from_vector(ground).relative_coordinate();
        RelativeCoordinate {
            direction: rel.direction,
            distance: rel.distance.clamp_distance(),
        }
    }
}

fn check_relative(coord: &RelativeCoordinate) -> Result<(), ProjectionError> {
    if coord.direction.is_finite() && coord.distance.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::NonFiniteInput)
    }
}

fn check_percent(coord: &PercentCoordinate) -> Result<(), ProjectionError> {
    if coord.x.is_finite() && coord.y.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::NonFiniteInput)
    }
}

/// Where a ground target appears in the image of camera `camera`.
///
/// Components outside `[-1, 1]` mean the target is outside that camera's view.
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip(pivot)))]
pub fn percent_coordinate(
    coord: &RelativeCoordinate,
    pivot: &CameraPivot,
    camera: usize,
) -> Result<PercentCoordinate, ProjectionError> {
    let geometry = CameraGeometry::new(pivot, camera)?;
    check_relative(coord)?;
    Ok(geometry.project(coord))
}

/// [`percent_coordinate`] with each component clamped into `[-1, 1]`.
pub fn clamped_percent_coordinate(
    coord: &RelativeCoordinate,
    pivot: &CameraPivot,
    camera: usize,
) -> Result<PercentCoordinate, ProjectionError> {
    percent_coordinate(coord, pivot, camera).map(|p| p.clamped())
}

pub fn pixel_coordinate(
    coord: &RelativeCoordinate,
    pivot: &CameraPivot,
    camera: usize,
    resolution: Resolution,
) -> Result<PixelCoordinate, ProjectionError> {
    percent_coordinate(coord, pivot, camera).map(|p| p.pixel_coordinate(resolution))
}

pub fn clamped_pixel_coordinate(
    coord: &RelativeCoordinate,
    pivot: &CameraPivot,
    camera: usize,
    resolution: Resolution,
) -> Result<PixelCoordinate, ProjectionError> {
    clamped_percent_coordinate(coord, pivot, camera).map(|p| p.pixel_coordinate(resolution))
}

pub fn camera_coordinate(
    coord: &RelativeCoordinate,
    pivot: &CameraPivot,
    camera: usize,
    resolution: Resolution,
) -> Result<CameraCoordinate, ProjectionError> {
    percent_coordinate(coord, pivot, camera).map(|p| p.camera_coordinate(resolution))
}

pub fn clamped_camera_coordinate(
    coord: &RelativeCoordinate,
    pivot: &CameraPivot,
    camera: usize,
    resolution: Resolution,
) -> Result<CameraCoordinate, ProjectionError> {
    clamped_percent_coordinate(coord, pivot, camera).map(|p| p.camera_coordinate(resolution))
}

/// True when the target falls inside the frame of camera `camera`.
pub fn is_visible(
    coord: &RelativeCoordinate,
    pivot: &CameraPivot,
    camera: usize,
) -> Result<bool, ProjectionError> {
    percent_coordinate(coord, pivot, camera).map(|p| p.is_within_frame())
}

/// Ground position of an image point, the inverse of [`percent_coordinate`].
///
/// Points at or above the horizon yield a distance of [`Length::MAX_DISTANCE`].
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip(pivot)))]
pub fn relative_coordinate(
    coord: &PercentCoordinate,
    pivot: &CameraPivot,
    camera: usize,
) -> Result<RelativeCoordinate, ProjectionError> {
    let geometry = CameraGeometry::new(pivot, camera)?;
    check_percent(coord)?;
    Ok(geometry.unproject(coord))
}

pub fn relative_coordinate_from_pixel(
    coord: &PixelCoordinate,
    pivot: &CameraPivot,
    camera: usize,
) -> Result<RelativeCoordinate, ProjectionError> {
    relative_coordinate(&coord.percent_coordinate(), pivot, camera)
}

pub fn relative_coordinate_from_camera(
    coord: &CameraCoordinate,
    pivot: &CameraPivot,
    camera: usize,
) -> Result<RelativeCoordinate, ProjectionError> {
    relative_coordinate(&coord.percent_coordinate(), pivot, camera)
}

impl RelativeCoordinate {
    pub fn percent_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
    ) -> Result<PercentCoordinate, ProjectionError> {
        percent_coordinate(self, pivot, camera)
    }

    pub fn clamped_percent_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
    ) -> Result<PercentCoordinate, ProjectionError> {
        clamped_percent_coordinate(self, pivot, camera)
    }

    pub fn pixel_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
        resolution: Resolution,
    ) -> Result<PixelCoordinate, ProjectionError> {
        pixel_coordinate(self, pivot, camera, resolution)
    }

    pub fn clamped_pixel_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
        resolution: Resolution,
    ) -> Result<PixelCoordinate, ProjectionError> {
        clamped_pixel_coordinate(self, pivot, camera, resolution)
    }

    pub fn camera_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
        resolution: Resolution,
    ) -> Result<CameraCoordinate, ProjectionError> {
        camera_coordinate(self, pivot, camera, resolution)
    }

    pub fn clamped_camera_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
        resolution: Resolution,
    ) -> Result<CameraCoordinate, ProjectionError> {
        clamped_camera_coordinate(self, pivot, camera, resolution)
    }
}

impl CartesianCoordinate {
    pub fn percent_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
    ) -> Result<PercentCoordinate, ProjectionError> {
        percent_coordinate(&self.relative_coordinate(), pivot, camera)
    }

    pub fn clamped_percent_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
    ) -> Result<PercentCoordinate, ProjectionError> {
        clamped_percent_coordinate(&self.relative_coordinate(), pivot, camera)
    }
}

impl PercentCoordinate {
    pub fn relative_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
    ) -> Result<RelativeCoordinate, ProjectionError> {
        relative_coordinate(self, pivot, camera)
    }

    pub fn cartesian_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
    ) -> Result<CartesianCoordinate, ProjectionError> {
        relative_coordinate(self, pivot, camera).map(|r| r.cartesian_coordinate())
    }
}

impl PixelCoordinate {
    pub fn relative_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
    ) -> Result<RelativeCoordinate, ProjectionError> {
        relative_coordinate_from_pixel(self, pivot, camera)
    }
}

impl CameraCoordinate {
    pub fn relative_coordinate(
        &self,
        pivot: &CameraPivot,
        camera: usize,
    ) -> Result<RelativeCoordinate, ProjectionError> {
        relative_coordinate_from_camera(self, pivot, camera)
    }
}
