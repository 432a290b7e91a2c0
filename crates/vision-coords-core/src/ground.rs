//! Ground-plane positions: polar (relative), cartesian and field poses.
//!
//! Directions are counter-clockwise with 0° straight ahead, so the robot
//! faces `+x` and positive directions point to its left (`+y`).

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use crate::units::{Angle, Length};

/// Polar `(direction, distance)` → cartesian `(x, y)`.
#[inline]
pub fn to_cartesian(direction: Angle, distance: Length) -> (Length, Length) {
    (distance * direction.cos(), distance * direction.sin())
}

/// Cartesian `(x, y)` → polar `(direction, distance)`, direction normalized.
#[inline]
pub fn to_relative(x: Length, y: Length) -> (Angle, Length) {
    let direction = Angle::atan2(y.millimetres(), x.millimetres()).normalized();
    (direction, Length::hypot(x, y))
}

/// Position of a target as direction and distance from the robot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelativeCoordinate {
    /// Positive to the left of the robot's heading.
    pub direction: Angle,
    pub distance: Length,
}

impl RelativeCoordinate {
    /// Build a coordinate, folding a negative distance into the opposite direction.
    pub fn new(direction: Angle, distance: Length) -> Self {
        if distance < Length::ZERO {
            Self {
                direction: (direction + Angle::STRAIGHT).normalized(),
                distance: distance.abs(),
            }
        } else {
            Self {
                direction: direction.normalized(),
                distance,
            }
        }
    }

    pub fn from_raw(direction_degrees: f64, distance_mm: f64) -> Self {
        Self::new(
            Angle::from_degrees(direction_degrees),
            Length::from_millimetres(distance_mm),
        )
    }

    pub fn to_raw(self) -> (f64, f64) {
        (self.direction.degrees(), self.distance.millimetres())
    }

    pub fn cartesian_coordinate(&self) -> CartesianCoordinate {
        let (x, y) = to_cartesian(self.direction, self.distance);
        CartesianCoordinate { x, y }
    }

    /// The coordinate of `target` as seen from `self`, both measured from the
    /// same origin and heading reference. Translation only, no rotation.
    pub fn relative_coordinate_to(&self, target: &RelativeCoordinate) -> RelativeCoordinate {
        let from = self.cartesian_coordinate();
        let to = target.cartesian_coordinate();
        CartesianCoordinate::new(to.x - from.x, to.y - from.y).relative_coordinate()
    }

    /// Attach a heading. `heading` is informational and does not rotate x/y.
    pub fn field_coordinate(&self, heading: Angle) -> FieldCoordinate {
        FieldCoordinate::new(self.cartesian_coordinate(), heading)
    }
}

impl From<(Angle, Length)> for RelativeCoordinate {
    fn from((direction, distance): (Angle, Length)) -> Self {
        Self::new(direction, distance)
    }
}

/// Ground-plane offset from an origin facing 0°.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartesianCoordinate {
    pub x: Length,
    pub y: Length,
}

impl CartesianCoordinate {
    pub const ORIGIN: CartesianCoordinate = CartesianCoordinate {
        x: Length::ZERO,
        y: Length::ZERO,
    };

    pub fn new(x: Length, y: Length) -> Self {
        Self { x, y }
    }

    pub fn from_raw(x_mm: f64, y_mm: f64) -> Self {
        Self::new(Length::from_millimetres(x_mm), Length::from_millimetres(y_mm))
    }

    pub fn to_raw(self) -> (f64, f64) {
        (self.x.millimetres(), self.y.millimetres())
    }

    /// Offset as a vector in millimetres.
    #[inline]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x.millimetres(), self.y.millimetres())
    }

    #[inline]
    pub fn from_vector(v: Vector2<f64>) -> Self {
        Self::from_raw(v.x, v.y)
    }

    pub fn relative_coordinate(&self) -> RelativeCoordinate {
        let (direction, distance) = to_relative(self.x, self.y);
        RelativeCoordinate {
            direction,
            distance,
        }
    }

    pub fn distance_to(&self, other: &CartesianCoordinate) -> Length {
        Length::hypot(other.x - self.x, other.y - self.y)
    }

    pub fn field_coordinate(&self, heading: Angle) -> FieldCoordinate {
        FieldCoordinate::new(*self, heading)
    }
}

impl From<(Length, Length)> for CartesianCoordinate {
    fn from((x, y): (Length, Length)) -> Self {
        Self::new(x, y)
    }
}

/// Absolute pose in the shared field frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldCoordinate {
    pub position: CartesianCoordinate,
    /// Normalized into `(-180°, 180°]`.
    pub heading: Angle,
}

impl FieldCoordinate {
    pub fn new(position: CartesianCoordinate, heading: Angle) -> Self {
        Self {
            position,
            heading: heading.normalized(),
        }
    }

    pub fn from_raw(x_mm: f64, y_mm: f64, heading_degrees: f64) -> Self {
        Self::new(
            CartesianCoordinate::from_raw(x_mm, y_mm),
            Angle::from_degrees(heading_degrees),
        )
    }

    pub fn to_raw(self) -> (f64, f64, f64) {
        let (x, y) = self.position.to_raw();
        (x, y, self.heading.degrees())
    }

    #[inline]
    fn rotation(&self) -> Rotation2<f64> {
        Rotation2::new(self.heading.radians())
    }

    /// Where `point` lies relative to this pose, in the pose's own heading frame.
    pub fn relative_coordinate_to(&self, point: &CartesianCoordinate) -> RelativeCoordinate {
        let offset = point.to_vector() - self.position.to_vector();
        let local = self.rotation().inverse() * offset;
        CartesianCoordinate::from_vector(local).relative_coordinate()
    }

    /// The field point an observation taken from this pose refers to.
    pub fn cartesian_coordinate_at(&self, observation: &RelativeCoordinate) -> CartesianCoordinate {
        let local = observation.cartesian_coordinate().to_vector();
        CartesianCoordinate::from_vector(self.position.to_vector() + self.rotation() * local)
    }
}

impl From<(Length, Length, Angle)> for FieldCoordinate {
    fn from((x, y, heading): (Length, Length, Angle)) -> Self {
        Self::new(CartesianCoordinate::new(x, y), heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn deg(d: f64) -> Angle {
        Angle::from_degrees(d)
    }

    fn cm(c: f64) -> Length {
        Length::from_centimetres(c)
    }

    #[test]
    fn left_of_heading_is_positive_y() {
        let c = RelativeCoordinate::new(deg(90.0), cm(100.0)).cartesian_coordinate();
        assert_abs_diff_eq!(c.x.centimetres(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c.y.centimetres(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn cartesian_round_trip_preserves_polar() {
        for d in [-179.0, -90.0, -30.0, 0.0, 45.0, 135.0, 180.0] {
            for r in [1.0, 37.5, 250.0] {
                let rel = RelativeCoordinate::new(deg(d), cm(r));
                let back = rel.cartesian_coordinate().relative_coordinate();
                assert_abs_diff_eq!(back.direction.degrees(), d, epsilon = 1e-9);
                assert_abs_diff_eq!(back.distance.centimetres(), r, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn negative_distance_flips_direction() {
        let rel = RelativeCoordinate::new(deg(30.0), cm(-10.0));
        assert_abs_diff_eq!(rel.direction.degrees(), -150.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rel.distance.centimetres(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn relative_between_two_targets_is_a_translation() {
        let a = RelativeCoordinate::new(deg(0.0), cm(100.0));
        let b = RelativeCoordinate::new(deg(90.0), cm(100.0));
        let ab = a.relative_coordinate_to(&b);
        assert_abs_diff_eq!(ab.direction.degrees(), 135.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ab.distance.centimetres(), 100.0 * 2f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn field_heading_does_not_rotate_position() {
        let f = RelativeCoordinate::new(deg(0.0), cm(50.0)).field_coordinate(deg(270.0));
        assert_abs_diff_eq!(f.position.x.centimetres(), 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(f.position.y.centimetres(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(f.heading.degrees(), -90.0, epsilon = 1e-12);
    }

    #[test]
    fn field_pose_observations_round_trip() {
        let pose = FieldCoordinate::from_raw(1000.0, -500.0, 90.0);
        let ahead = RelativeCoordinate::new(deg(0.0), cm(100.0));
        let world = pose.cartesian_coordinate_at(&ahead);
        // Facing +y, one metre ahead.
        assert_abs_diff_eq!(world.x.millimetres(), 1000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(world.y.millimetres(), 500.0, epsilon = 1e-9);

        let back = pose.relative_coordinate_to(&world);
        assert_abs_diff_eq!(back.direction.degrees(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(back.distance.centimetres(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn distance_between_points() {
        let a = CartesianCoordinate::from_raw(0.0, 0.0);
        let b = CartesianCoordinate::from_raw(30.0, 40.0);
        assert_abs_diff_eq!(a.distance_to(&b).millimetres(), 50.0);
    }

    #[test]
    fn record_fields_match_attributes() {
        let v = serde_json::to_value(FieldCoordinate::from_raw(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(v["position"]["x"], 1.0);
        assert_eq!(v["position"]["y"], 2.0);
        assert_eq!(v["heading"], 3.0);
        let v = serde_json::to_value(RelativeCoordinate::from_raw(10.0, 20.0)).unwrap();
        assert_eq!(v["direction"], 10.0);
        assert_eq!(v["distance"], 20.0);
    }
}
