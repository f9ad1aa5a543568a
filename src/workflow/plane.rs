use nalgebra::{Point3, Vector3};

const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Where the pick ray through `near` and `far` meets the image plane.
///
/// `None` when the ray is parallel to the plane or `near == far`.
pub fn point_on_plane(
    near: &Point3<f64>,
    far: &Point3<f64>,
    plane_point: &Point3<f64>,
    plane_normal: &Vector3<f64>,
) -> Option<Point3<f64>> {
    let direction = far - near;
    let denom = plane_normal.dot(&direction);
    if denom.abs() <= PARALLEL_TOLERANCE * plane_normal.norm() * direction.norm() {
        return None;
    }
    let s = plane_normal.dot(&(plane_point - near)) / denom;
    Some(near + direction * s)
}

/// Component-wise scaling, as the generator applies to scaffold coordinates.
pub fn scale_points(points: &[Point3<f64>], scale: &[f64; 3]) -> Vec<Point3<f64>> {
    let factors = Vector3::from(*scale);
    points
        .iter()
        .map(|p| Point3::from(p.coords.component_mul(&factors)))
        .collect()
}
