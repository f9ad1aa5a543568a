use nalgebra::{Point3, Rotation3, Unit, Vector3};
use rand::Rng;
use std::f64::consts::PI;

use crate::rigid::RigidTransform;

/// Generates `n` points spread over a 20 x 20 x 20 box around the origin
pub fn random_cloud<R: Rng>(rng: &mut R, n: usize) -> Vec<Point3<f64>> {
    (0..n)
        .map(|_| {
            Point3::new(
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
            )
        })
        .collect()
}

/// Random proper rotation about a random axis plus a translation
pub fn random_transform<R: Rng>(rng: &mut R) -> RigidTransform {
    let axis = Vector3::new(
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
        rng.random_range(0.1..1.0),
    );
    let angle = rng.random_range(0.05..(PI - 0.05));
    RigidTransform::new(
        Rotation3::from_axis_angle(&Unit::new_normalize(axis), angle),
        Vector3::new(
            rng.random_range(-5.0..5.0),
            rng.random_range(-5.0..5.0),
            rng.random_range(-5.0..5.0),
        ),
    )
}

/// Unit square corners in the z = 0 plane, the default image plane
pub fn unit_plane_corners() -> Vec<Point3<f64>> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
    ]
}
