//! JSON pivot configuration and projection reports.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::core::{
    projection, Angle, Camera, CameraCoordinate, CameraMount, CameraPivot, CameraPivotError,
    CartesianCoordinate, Length, PercentCoordinate, PixelCoordinate, ProjectionError,
    RelativeCoordinate, Resolution,
};

#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Pivot(#[from] CameraPivotError),
    #[error("unknown preset `{0}` (available: {available})", available = PRESET_NAMES.join(", "))]
    UnknownPreset(String),
    #[error("config names neither a pivot nor a preset")]
    MissingPivot,
}

/// Names accepted by [`preset_pivot`].
pub const PRESET_NAMES: &[&str] = &["nao_v5_head", "nao_v5_top", "nao_v5_bottom"];

fn single_camera(camera: Camera) -> Option<CameraPivot> {
    let mount = CameraMount::new(camera, Length::from_centimetres(41.7));
    CameraPivot::new(Angle::ZERO, Angle::ZERO, [mount]).ok()
}

/// Built-in pivot configurations.
pub fn preset_pivot(name: &str) -> Option<CameraPivot> {
    match name {
        "nao_v5_head" => Some(CameraPivot::nao_v5_head()),
        "nao_v5_top" => single_camera(Camera::nao_v5_top()),
        "nao_v5_bottom" => single_camera(Camera::nao_v5_bottom()),
        _ => None,
    }
}

fn default_resolution() -> Resolution {
    Resolution::VGA
}

/// Pivot configuration file.
///
/// Either `pivot` (explicit geometry) or `preset` (a name from
/// [`PRESET_NAMES`]) must be given; an explicit pivot wins when both are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<CameraPivot>,
    #[serde(default = "default_resolution")]
    pub resolution: Resolution,
}

impl PivotConfig {
    pub fn from_pivot(pivot: CameraPivot) -> Self {
        Self {
            preset: None,
            pivot: Some(pivot),
            resolution: default_resolution(),
        }
    }

    pub fn from_preset(name: impl Into<String>) -> Self {
        Self {
            preset: Some(name.into()),
            pivot: None,
            resolution: default_resolution(),
        }
    }

    /// Load a JSON config from disk.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(path)))]
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the pivot this config describes.
    pub fn build_pivot(&self) -> Result<CameraPivot, ConfigError> {
        match (&self.pivot, &self.preset) {
            (Some(pivot), preset) => {
                if let Some(name) = preset {
                    log::warn!("config has both a pivot and preset `{name}`; using the pivot");
                }
                Ok(pivot.clone())
            }
            (None, Some(name)) => {
                preset_pivot(name).ok_or_else(|| ConfigError::UnknownPreset(name.clone()))
            }
            (None, None) => Err(ConfigError::MissingPivot),
        }
    }
}

/// Ground → image result for one target and camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionReport {
    pub camera: usize,
    pub pivot: CameraPivot,
    pub target: RelativeCoordinate,
    pub cartesian: CartesianCoordinate,
    pub percent: PercentCoordinate,
    pub pixel: PixelCoordinate,
    pub camera_coordinate: CameraCoordinate,
    /// Whether `percent`/`pixel`/`camera_coordinate` were clamped into the frame.
    pub clamped: bool,
    /// Whether the unclamped projection falls inside the frame.
    pub visible: bool,
}

impl ProjectionReport {
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(pivot)))]
    pub fn compute(
        pivot: &CameraPivot,
        camera: usize,
        target: RelativeCoordinate,
        resolution: Resolution,
        clamp: bool,
    ) -> Result<Self, ProjectionError> {
        let raw = projection::percent_coordinate(&target, pivot, camera)?;
        let visible = raw.is_within_frame();
        let percent = if clamp { raw.clamped() } else { raw };
        let pixel = percent.pixel_coordinate(resolution);
        log::debug!(
            "camera {camera}: target {:.1} deg / {:.1} cm -> percent ({:.4}, {:.4}), \
             visible={visible}",
            target.direction.degrees(),
            target.distance.centimetres(),
            raw.x,
            raw.y
        );
        Ok(Self {
            camera,
            pivot: pivot.clone(),
            target,
            cartesian: target.cartesian_coordinate(),
            percent,
            pixel,
            camera_coordinate: pixel.camera_coordinate(),
            clamped: clamp,
            visible,
        })
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        write_pretty(self, path)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        load(path)
    }
}

/// Image → ground result for one pixel and camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocateReport {
    pub camera: usize,
    pub pivot: CameraPivot,
    pub camera_coordinate: CameraCoordinate,
    pub pixel: PixelCoordinate,
    pub percent: PercentCoordinate,
    pub relative: RelativeCoordinate,
    pub cartesian: CartesianCoordinate,
    /// False when the pixel lies at or above the horizon and `relative`
    /// carries the maximum-distance sentinel.
    pub on_ground: bool,
}

impl LocateReport {
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(pivot)))]
    pub fn compute(
        pivot: &CameraPivot,
        camera: usize,
        camera_coordinate: CameraCoordinate,
    ) -> Result<Self, ProjectionError> {
        if !camera_coordinate.is_within_bounds() {
            log::warn!(
                "pixel ({}, {}) lies outside the {}x{} image",
                camera_coordinate.x,
                camera_coordinate.y,
                camera_coordinate.res_width,
                camera_coordinate.res_height
            );
        }
        let pixel = camera_coordinate.pixel_coordinate();
        let percent = pixel.percent_coordinate();
        let relative = projection::relative_coordinate(&percent, pivot, camera)?;
        Ok(Self {
            camera,
            pivot: pivot.clone(),
            camera_coordinate,
            pixel,
            percent,
            relative,
            cartesian: relative.cartesian_coordinate(),
            on_ground: relative.distance < Length::MAX_DISTANCE,
        })
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        write_pretty(self, path)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        load(path)
    }
}

fn write_pretty<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn load<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T, ConfigIoError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_resolve() {
        for name in PRESET_NAMES {
            let pivot = preset_pivot(name).expect("preset");
            assert!(pivot.camera_count() >= 1);
        }
        assert!(preset_pivot("pepper").is_none());
        assert_eq!(preset_pivot("nao_v5_bottom").unwrap().camera_count(), 1);
    }

    #[test]
    fn config_needs_a_pivot_source() {
        let cfg: PivotConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.resolution, Resolution::VGA);
        assert!(matches!(cfg.build_pivot(), Err(ConfigError::MissingPivot)));

        let cfg = PivotConfig::from_preset("robot");
        assert!(matches!(cfg.build_pivot(), Err(ConfigError::UnknownPreset(_))));
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pivot.json");
        let mut cfg = PivotConfig::from_pivot(CameraPivot::nao_v5_head());
        cfg.resolution = Resolution::new(320, 240).unwrap();
        cfg.write_json(&path).unwrap();
        let back = PivotConfig::load_json(&path).unwrap();
        assert_eq!(back, cfg);
        assert_eq!(back.build_pivot().unwrap(), CameraPivot::nao_v5_head());
    }

    #[test]
    fn oversized_pivot_in_config_fails_to_load() {
        let mount = serde_json::to_value(CameraPivot::nao_v5_head().mounts()[0]).unwrap();
        let json = serde_json::json!({
            "pivot": { "pitch": 0.0, "yaw": 0.0, "cameras": vec![mount; 5] }
        });
        assert!(serde_json::from_value::<PivotConfig>(json).is_err());
    }

    #[test]
    fn projection_report_flags_visibility() {
        let pivot = CameraPivot::nao_v5_head();
        let near = RelativeCoordinate::new(Angle::ZERO, Length::from_centimetres(40.0));
        let report =
            ProjectionReport::compute(&pivot, 1, near, Resolution::VGA, false).unwrap();
        assert!(report.visible);
        assert!(report.camera_coordinate.is_within_bounds());

        let behind =
            RelativeCoordinate::new(Angle::from_degrees(170.0), Length::from_centimetres(40.0));
        let report =
            ProjectionReport::compute(&pivot, 1, behind, Resolution::VGA, true).unwrap();
        assert!(!report.visible);
        assert!(report.camera_coordinate.is_within_bounds());
    }

    #[test]
    fn locate_report_marks_sky_pixels() {
        let pivot = CameraPivot::nao_v5_head();
        let res = Resolution::VGA;
        // Top row of the upper camera looks above the horizon.
        let sky = LocateReport::compute(&pivot, 0, CameraCoordinate::new(320, 0, res)).unwrap();
        assert!(!sky.on_ground);
        let floor = LocateReport::compute(&pivot, 1, CameraCoordinate::new(320, 400, res)).unwrap();
        assert!(floor.on_ground);
        assert!(floor.relative.distance > Length::ZERO);
    }
}
