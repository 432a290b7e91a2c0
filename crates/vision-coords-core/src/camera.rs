//! Camera mounting geometry and the pivot assembly that carries the cameras.

use serde::{Deserialize, Serialize};

use crate::projection::ProjectionError;
use crate::units::{Angle, Length};

/// Maximum number of cameras one pivot can carry.
pub const MAX_CAMERAS: usize = 4;

/// Static geometry of one camera on its mount.
///
/// `height` is measured above the pivot reference, `center_offset` forward of
/// the pivot axis. `v_direction` is the fixed downward tilt of the optical
/// axis relative to the pivot, positive looking down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Camera {
    pub height: Length,
    pub center_offset: Length,
    pub v_direction: Angle,
    pub v_fov: Angle,
    pub h_fov: Angle,
}

/// Camera geometry validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} must be in (0, 360] degrees, got {degrees}")]
    InvalidFieldOfView { field: &'static str, degrees: f64 },
}

impl Camera {
    pub fn new(
        height: Length,
        center_offset: Length,
        v_direction: Angle,
        v_fov: Angle,
        h_fov: Angle,
    ) -> Self {
        Self {
            height,
            center_offset,
            v_direction,
            v_fov,
            h_fov,
        }
    }

    /// Check that every field is finite and both fields of view are usable.
    pub fn validate(&self) -> Result<(), CameraError> {
        let lengths = [("height", self.height), ("center_offset", self.center_offset)];
        for (field, value) in lengths {
            if !value.is_finite() {
                return Err(CameraError::NonFinite { field });
            }
        }
        if !self.v_direction.is_finite() {
            return Err(CameraError::NonFinite {
                field: "v_direction",
            });
        }
        for (field, fov) in [("v_fov", self.v_fov), ("h_fov", self.h_fov)] {
            let degrees = fov.degrees();
            if !degrees.is_finite() {
                return Err(CameraError::NonFinite { field });
            }
            if degrees <= 0.0 || degrees > 360.0 {
                return Err(CameraError::InvalidFieldOfView { field, degrees });
            }
        }
        Ok(())
    }

    /// Upper camera of the Nao V5 head.
    pub fn nao_v5_top() -> Self {
        Self::new(
            Length::from_centimetres(6.364),
            Length::from_centimetres(5.871),
            Angle::from_degrees(1.2),
            Angle::from_degrees(47.64),
            Angle::from_degrees(60.97),
        )
    }

    /// Lower camera of the Nao V5 head.
    pub fn nao_v5_bottom() -> Self {
        Self::new(
            Length::from_centimetres(1.774),
            Length::from_centimetres(5.071),
            Angle::from_degrees(39.7),
            Angle::from_degrees(47.64),
            Angle::from_degrees(60.97),
        )
    }
}

/// A camera together with its extra height above the pivot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraMount {
    pub camera: Camera,
    pub height_offset: Length,
}

impl CameraMount {
    pub fn new(camera: Camera, height_offset: Length) -> Self {
        Self {
            camera,
            height_offset,
        }
    }

    /// Height of the optical centre above the ground plane.
    #[inline]
    pub fn effective_height(&self) -> Length {
        self.camera.height + self.height_offset
    }
}

impl From<(Camera, Length)> for CameraMount {
    fn from((camera, height_offset): (Camera, Length)) -> Self {
        Self::new(camera, height_offset)
    }
}

/// Pivot construction errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CameraPivotError {
    #[error("pivot holds at most {capacity} cameras, got {count}")]
    TooManyCameras { count: usize, capacity: usize },
    #[error("camera {index} is invalid: {source}")]
    InvalidCamera {
        index: usize,
        #[source]
        source: CameraError,
    },
    #[error("pivot {field} must be finite")]
    NonFinite { field: &'static str },
}

/// Serialized form of a [`CameraPivot`]; decoding goes through validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPivotRecord {
    pub pitch: Angle,
    pub yaw: Angle,
    pub cameras: Vec<CameraMount>,
}

/// The pan/tilt mount and the cameras attached to it.
///
/// The camera list is bounded by [`MAX_CAMERAS`]; list order defines the
/// camera index used by the projection functions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CameraPivotRecord", into = "CameraPivotRecord")]
pub struct CameraPivot {
    pitch: Angle,
    yaw: Angle,
    cameras: Vec<CameraMount>,
}

impl CameraPivot {
    /// Validate and build a pivot. More than [`MAX_CAMERAS`] mounts is rejected.
    pub fn new(
        pitch: Angle,
        yaw: Angle,
        cameras: impl IntoIterator<Item = CameraMount>,
    ) -> Result<Self, CameraPivotError> {
        if !pitch.is_finite() {
            return Err(CameraPivotError::NonFinite { field: "pitch" });
        }
        if !yaw.is_finite() {
            return Err(CameraPivotError::NonFinite { field: "yaw" });
        }

        let cameras: Vec<CameraMount> = cameras.into_iter().collect();
        if cameras.len() > MAX_CAMERAS {
            log::debug!(
                "rejecting pivot with {} cameras (capacity {MAX_CAMERAS})",
                cameras.len()
            );
            return Err(CameraPivotError::TooManyCameras {
                count: cameras.len(),
                capacity: MAX_CAMERAS,
            });
        }
        for (index, mount) in cameras.iter().enumerate() {
            mount
                .camera
                .validate()
                .map_err(|source| CameraPivotError::InvalidCamera { index, source })?;
            if !mount.height_offset.is_finite() {
                return Err(CameraPivotError::InvalidCamera {
                    index,
                    source: CameraError::NonFinite {
                        field: "height_offset",
                    },
                });
            }
        }

        Ok(Self {
            pitch,
            yaw,
            cameras,
        })
    }

    /// Nao V5 head: top and bottom camera, both 41.7 cm above the ground reference.
    pub fn nao_v5_head() -> Self {
        let offset = Length::from_centimetres(41.7);
        Self {
            pitch: Angle::ZERO,
            yaw: Angle::ZERO,
            cameras: vec![
                CameraMount::new(Camera::nao_v5_top(), offset),
                CameraMount::new(Camera::nao_v5_bottom(), offset),
            ],
        }
    }

    #[inline]
    pub fn pitch(&self) -> Angle {
        self.pitch
    }

    #[inline]
    pub fn yaw(&self) -> Angle {
        self.yaw
    }

    /// Same cameras, different pan/tilt.
    pub fn with_angles(&self, pitch: Angle, yaw: Angle) -> Result<Self, CameraPivotError> {
        Self::new(pitch, yaw, self.cameras.iter().copied())
    }

    #[inline]
    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    #[inline]
    pub fn mounts(&self) -> &[CameraMount] {
        &self.cameras
    }

    /// The mount at `index`, or an error if the pivot has no such camera.
    pub fn mount(&self, index: usize) -> Result<&CameraMount, ProjectionError> {
        self.cameras
            .get(index)
            .ok_or(ProjectionError::CameraIndexOutOfRange {
                index,
                count: self.cameras.len(),
            })
    }

    pub fn camera(&self, index: usize) -> Result<&Camera, ProjectionError> {
        self.mount(index).map(|m| &m.camera)
    }

    pub fn height_offset(&self, index: usize) -> Result<Length, ProjectionError> {
        self.mount(index).map(|m| m.height_offset)
    }

    pub fn to_record(&self) -> CameraPivotRecord {
        self.clone().into()
    }
}

impl TryFrom<CameraPivotRecord> for CameraPivot {
    type Error = CameraPivotError;

    fn try_from(record: CameraPivotRecord) -> Result<Self, Self::Error> {
        Self::new(record.pitch, record.yaw, record.cameras)
    }
}

impl From<CameraPivot> for CameraPivotRecord {
    fn from(pivot: CameraPivot) -> Self {
        Self {
            pitch: pivot.pitch,
            yaw: pivot.yaw,
            cameras: pivot.cameras,
        }
    }
}
