pub mod kabsch;

pub use kabsch::{apply_transform, compute_rigid_transform, is_collinear, RigidAligner};

use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Vector3};
use rayon::prelude::*;

/// Proper rotation followed by a translation: `p ↦ R·p + t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
}

impl RigidTransform {
    pub fn new(rotation: Rotation3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Rotation3::identity(), Vector3::zeros())
    }

    pub fn rotation_matrix(&self) -> &Matrix3<f64> {
        self.rotation.matrix()
    }

    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }

    /// Transforms every point, keeping order and length.
    pub fn transform_points(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points
            .par_iter()
            .map(|p| self.transform_point(p))
            .collect()
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self::new(rotation, -(rotation * self.translation))
    }

    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        let mut m = self.rotation.to_homogeneous();
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        m
    }

    /// Root-mean-square distance between transformed source and target.
    /// Returns 0.0 for an empty correspondence.
    pub fn rms_error(&self, source: &[Point3<f64>], target: &[Point3<f64>]) -> f64 {
        let n = source.len().min(target.len());
        if n == 0 {
            return 0.0;
        }
        let sum: f64 = source
            .iter()
            .zip(target.iter())
            .map(|(s, t)| (self.transform_point(s) - t).norm_squared())
            .sum();
        (sum / n as f64).sqrt()
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Unit;
    use std::f64::consts::FRAC_PI_2;

    fn quarter_turn_z() -> RigidTransform {
        RigidTransform::new(
            Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::z()), FRAC_PI_2),
            Vector3::new(1.0, 2.0, 3.0),
        )
    }

    #[test]
    fn test_transform_point_rotates_then_translates() {
        let moved = quarter_turn_z().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(moved.y, 3.0, epsilon = 1e-12);
        assert_relative_eq!(moved.z, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_undoes_transform() {
        let t = quarter_turn_z();
        let p = Point3::new(-4.0, 0.5, 7.25);
        let back = t.inverse().transform_point(&t.transform_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);
    }

    #[test]
    fn test_homogeneous_matches_transform_point() {
        let t = quarter_turn_z();
        let p = Point3::new(0.3, -1.2, 2.0);
        let h = t.to_homogeneous() * p.to_homogeneous();
        let expected = t.transform_point(&p);
        assert_relative_eq!(h.x, expected.x, epsilon = 1e-12);
        assert_relative_eq!(h.y, expected.y, epsilon = 1e-12);
        assert_relative_eq!(h.z, expected.z, epsilon = 1e-12);
        assert_relative_eq!(h.w, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rms_error() {
        let t = RigidTransform::identity();
        let source = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let target = vec![Point3::new(0.0, 0.0, 2.0), Point3::new(1.0, 0.0, 2.0)];
        assert_relative_eq!(t.rms_error(&source, &target), 2.0, epsilon = 1e-12);
        assert_eq!(t.rms_error(&[], &[]), 0.0);
    }
}
