//! High-level facade crate for the `vision-coords` workspace.
//!
//! This crate provides:
//! - re-exports of the coordinate types and projection functions from
//!   `vision-coords-core`
//! - JSON pivot configuration files and projection reports ([`io`])
//! - (feature `cli`) the `vision-coords` command-line tool
//!
//! ## Quickstart
//!
//! ```
//! use vision_coords::io::{PivotConfig, ProjectionReport};
//! use vision_coords::{Angle, Length, RelativeCoordinate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = PivotConfig::from_preset("nao_v5_head");
//! let pivot = cfg.build_pivot()?;
//! let ball = RelativeCoordinate::new(Angle::from_degrees(-8.0), Length::from_centimetres(60.0));
//!
//! let report = ProjectionReport::compute(&pivot, 1, ball, cfg.resolution, false)?;
//! println!("ball at pixel ({}, {})", report.camera_coordinate.x, report.camera_coordinate.y);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `vision_coords::core`: unit scalars, cameras and pivots, coordinate types.
//! - `vision_coords::projection`: ground ⇄ image projection for a selected camera.
//! - `vision_coords::io`: pivot configs, presets, JSON reports.

pub use vision_coords_core as core;
pub use vision_coords_core::projection;

pub use vision_coords_core::{
    Angle, Camera, CameraCoordinate, CameraMount, CameraPivot, CartesianCoordinate,
    FieldCoordinate, Length, PercentCoordinate, PixelCoordinate, ProjectionError,
    RelativeCoordinate, Resolution,
};

pub mod io;
