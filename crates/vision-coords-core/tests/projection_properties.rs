use approx::assert_abs_diff_eq;
use vision_coords_core::projection::{self, ProjectionError};
use vision_coords_core::{
    Angle, Camera, CameraCoordinate, CameraMount, CameraPivot, Length, PercentCoordinate,
    PixelCoordinate, RelativeCoordinate, Resolution,
};

fn deg(d: f64) -> Angle {
    Angle::from_degrees(d)
}

fn cm(c: f64) -> Length {
    Length::from_centimetres(c)
}

/// pitch=0, yaw=0, tilt=0, height=50cm, hFov=60°, vFov=40°.
fn reference_pivot() -> CameraPivot {
    let camera = Camera::new(cm(50.0), Length::ZERO, deg(0.0), deg(40.0), deg(60.0));
    CameraPivot::new(deg(0.0), deg(0.0), [CameraMount::new(camera, Length::ZERO)])
        .expect("reference pivot")
}

fn looking_down_pivot() -> CameraPivot {
    let camera = Camera::new(cm(45.0), cm(4.0), deg(20.0), deg(48.0), deg(62.0));
    CameraPivot::new(deg(15.0), deg(-10.0), [CameraMount::new(camera, cm(3.0))])
        .expect("tilted pivot")
}

#[test]
fn polar_cartesian_round_trip() {
    for d in (-17..=18).map(|k| k as f64 * 10.0) {
        for r in [0.5, 1.0, 12.0, 100.0, 5000.0] {
            let rel = RelativeCoordinate::new(deg(d), cm(r));
            let back = rel.cartesian_coordinate().relative_coordinate();
            assert_abs_diff_eq!(back.direction.degrees(), d, epsilon = 1e-9);
            assert_abs_diff_eq!(back.distance.centimetres(), r, epsilon = 1e-9);
        }
    }
}

#[test]
fn pixel_camera_round_trips_for_in_frame_percents() {
    for (w, h) in [(640, 480), (320, 240), (1, 1), (99, 101)] {
        let res = Resolution::new(w, h).unwrap();
        for i in -4..=4 {
            for j in -4..=4 {
                let p = PercentCoordinate::new(i as f64 / 4.0, j as f64 / 4.0);
                let px = p.pixel_coordinate(res);
                assert!(px.is_within_bounds(), "{px:?} out of bounds");
                assert_eq!(px.camera_coordinate().pixel_coordinate(), px);

                let cam = p.camera_coordinate(res);
                assert!(cam.is_within_bounds(), "{cam:?} out of bounds");
                assert_eq!(cam.pixel_coordinate().camera_coordinate(), cam);
                assert_eq!(px.camera_coordinate(), cam);
            }
        }
    }
}

#[test]
fn reference_camera_projects_and_inverts() {
    let pivot = reference_pivot();
    let target = RelativeCoordinate::new(deg(0.0), cm(100.0));
    let p = projection::percent_coordinate(&target, &pivot, 0).unwrap();

    let elevation = 50f64.atan2(100.0).to_degrees();
    assert_abs_diff_eq!(elevation, 26.57, epsilon = 0.01);
    assert_abs_diff_eq!(p.y.abs() * 20.0, elevation, epsilon = 1e-9);
    assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);

    let back = projection::relative_coordinate(&p, &pivot, 0).unwrap();
    assert_abs_diff_eq!(back.direction.degrees(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(back.distance.centimetres(), 100.0, epsilon = 1e-9);
}

#[test]
fn projection_inverts_across_the_ground_plane() {
    let pivot = looking_down_pivot();
    for d in [-40.0, -15.0, 0.0, 10.0, 35.0] {
        for r in [20.0, 55.0, 90.0, 400.0] {
            let target = RelativeCoordinate::new(deg(d), cm(r));
            let p = target.percent_coordinate(&pivot, 0).unwrap();
            let back = p.relative_coordinate(&pivot, 0).unwrap();
            assert_abs_diff_eq!(back.direction.degrees(), d, epsilon = 1e-7);
            assert_abs_diff_eq!(back.distance.centimetres(), r, epsilon = 1e-7);
        }
    }
}

#[test]
fn clamping_bounds_components_and_keeps_sign() {
    let pivot = looking_down_pivot();
    for d in (-9..=9).map(|k| k as f64 * 20.0) {
        for r in [1.0, 10.0, 80.0, 1000.0, 100000.0] {
            let target = RelativeCoordinate::new(deg(d), cm(r));
            let raw = target.percent_coordinate(&pivot, 0).unwrap();
            let clamped = target.clamped_percent_coordinate(&pivot, 0).unwrap();
            assert!(clamped.is_within_frame());
            for (a, b) in [(raw.x, clamped.x), (raw.y, clamped.y)] {
                if a.abs() > 1.0 {
                    assert_eq!(b.signum(), a.signum());
                    assert_eq!(b.abs(), 1.0);
                } else {
                    assert_eq!(a, b);
                }
            }

            let res = Resolution::VGA;
            let px = target.clamped_pixel_coordinate(&pivot, 0, res).unwrap();
            assert!(px.is_within_bounds());
            let cam = target.clamped_camera_coordinate(&pivot, 0, res).unwrap();
            assert!(cam.is_within_bounds());
        }
    }
}

#[test]
fn farther_targets_move_toward_the_top_of_frame() {
    for pivot in [reference_pivot(), looking_down_pivot()] {
        let mut last_y = f64::NEG_INFINITY;
        // Beyond the camera's forward offset, along the pivot yaw.
        for r in [20.0, 50.0, 100.0, 300.0, 1000.0, 10000.0] {
            let target = RelativeCoordinate::new(deg(-10.0), cm(r));
            let p = target.percent_coordinate(&pivot, 0).unwrap();
            assert!(p.y > last_y, "percent y not increasing at r={r}");
            last_y = p.y;

            let res = Resolution::VGA;
            let cam = target.camera_coordinate(&pivot, 0, res).unwrap();
            let near = RelativeCoordinate::new(deg(-10.0), cm(r * 0.5))
                .camera_coordinate(&pivot, 0, res)
                .unwrap();
            assert!(cam.y <= near.y);
        }
    }
}

#[test]
fn bounds_helpers_cover_the_resolution() {
    for (w, h) in [(1, 1), (2, 3), (640, 480), (1920, 1080)] {
        let res = Resolution::new(w, h).unwrap();
        let cam = CameraCoordinate::new(0, 0, res);
        assert_eq!(cam.x_lower_bound(), 0);
        assert_eq!(cam.x_upper_bound(), w as i32 - 1);
        assert_eq!(cam.y_lower_bound(), 0);
        assert_eq!(cam.y_upper_bound(), h as i32 - 1);
        assert_eq!(res.x_upper_bound(), w as i32 - 1);
        assert_eq!(res.y_upper_bound(), h as i32 - 1);
    }
}

#[test]
fn rays_above_the_horizon_report_max_distance() {
    for pivot in [reference_pivot(), looking_down_pivot()] {
        let tilt_up = PercentCoordinate::new(0.3, 1.0);
        let rel = tilt_up.relative_coordinate(&pivot, 0).unwrap();
        if pivot.pitch() == Angle::ZERO {
            assert_eq!(rel.distance, Length::MAX_DISTANCE);
        }
        assert!(rel.distance >= Length::ZERO);
        assert!(rel.distance.is_finite());
        assert!(rel.direction.is_finite());
    }

    // Looking 15° + 20° down with a 24° half-fov: the top rows stay on the ground,
    // so aim past the frame to cross the horizon.
    let pivot = looking_down_pivot();
    let past_top = PercentCoordinate::new(0.0, 1.6);
    let rel = past_top.relative_coordinate(&pivot, 0).unwrap();
    assert_eq!(rel.distance, Length::MAX_DISTANCE);
}

#[test]
fn every_image_pixel_maps_to_finite_ground() {
    let pivot = reference_pivot();
    let res = Resolution::new(64, 48).unwrap();
    for x in 0..64 {
        for y in 0..48 {
            let cam = CameraCoordinate::new(x, y, res);
            let rel = cam.relative_coordinate(&pivot, 0).unwrap();
            assert!(rel.distance.is_finite() && rel.distance >= Length::ZERO);
            assert!(rel.distance <= Length::MAX_DISTANCE);
            assert!(rel.direction.is_finite());
        }
    }
}

#[test]
fn pixel_and_camera_inverse_agree() {
    let pivot = looking_down_pivot();
    let res = Resolution::VGA;
    let px = PixelCoordinate::new(40, -100, res);
    let a = projection::relative_coordinate_from_pixel(&px, &pivot, 0).unwrap();
    let b =
        projection::relative_coordinate_from_camera(&px.camera_coordinate(), &pivot, 0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn selecting_a_missing_camera_fails() {
    let pivot = reference_pivot();
    let target = RelativeCoordinate::new(deg(0.0), cm(10.0));
    let err =
        projection::clamped_camera_coordinate(&target, &pivot, 4, Resolution::VGA).unwrap_err();
    assert_eq!(err, ProjectionError::CameraIndexOutOfRange { index: 4, count: 1 });
}

#[test]
fn values_hash_consistently_with_equality() {
    use std::collections::HashSet;

    let mut set = HashSet::new();
    set.insert(RelativeCoordinate::new(deg(0.0), cm(10.0)));
    set.insert(RelativeCoordinate::new(deg(-0.0), cm(10.0)));
    assert_eq!(set.len(), 1);

    let mut pivots = HashSet::new();
    pivots.insert(CameraPivot::nao_v5_head());
    pivots.insert(CameraPivot::nao_v5_head());
    assert_eq!(pivots.len(), 1);

    let mut percents = HashSet::new();
    percents.insert(PercentCoordinate::new(0.0, 0.5));
    percents.insert(PercentCoordinate::new(-0.0, 0.5));
    assert_eq!(percents.len(), 1);
}
