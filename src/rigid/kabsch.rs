use log::debug;
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

use super::RigidTransform;
use crate::error::{AlignError, AlignResult, DegenerateReason};
use crate::settings::AlignerConfig;

const SVD_MAX_ITERATIONS: usize = 1000;

/// Least-squares rigid fit of paired point sets (Kabsch).
#[derive(Debug, Clone, Copy, Default)]
pub struct RigidAligner {
    config: AlignerConfig,
}

impl RigidAligner {
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Finds the proper rotation `R` and translation `t` minimising
    /// `Σ ‖R·source_i + t − target_i‖²`.
    ///
    /// Inputs best explained by a mirror image still yield a proper rotation
    /// (det = +1), never a reflection.
    ///
    /// # Errors
    ///
    /// - `DegenerateInput` for empty or unequal sets, fewer pairs than
    ///   `min_correspondences`, or collinear/coincident source points.
    /// - `NumericalInstability` for non-finite coordinates, an SVD that does
    ///   not converge, or a result that is not orthonormal.
    pub fn compute_rigid_transform(
        &self,
        source: &[Point3<f64>],
        target: &[Point3<f64>],
    ) -> AlignResult<RigidTransform> {
        self.check_correspondence(source, target)?;

        let source_centroid = centroid(source);
        let target_centroid = centroid(target);

        // H = Σ s'·t'ᵀ over the centred pairs
        let h = source
            .iter()
            .zip(target.iter())
            .fold(Matrix3::zeros(), |acc, (s, t)| {
                acc + (s.coords - source_centroid) * (t.coords - target_centroid).transpose()
            });

        let svd = h
            .try_svd(true, true, f64::EPSILON, SVD_MAX_ITERATIONS)
            .ok_or_else(|| {
                AlignError::NumericalInstability("SVD of the cross-covariance did not converge".into())
            })?;
        let u = svd.u.ok_or_else(|| {
            AlignError::NumericalInstability("SVD returned no left singular vectors".into())
        })?;
        let v_t = svd.v_t.ok_or_else(|| {
            AlignError::NumericalInstability("SVD returned no right singular vectors".into())
        })?;

        let mut singular: Vec<f64> = svd.singular_values.iter().copied().collect();
        singular.sort_by(|a, b| b.total_cmp(a));
        if singular[0] <= f64::EPSILON || singular[1] <= self.config.rank_tolerance * singular[0] {
            return Err(AlignError::DegenerateInput(DegenerateReason::Collinear));
        }

        let mut v = v_t.transpose();
        let mut rotation = v * u.transpose();
        if rotation.determinant() < 0.0 {
            debug!("best fit contains a reflection, flipping to a proper rotation");
            // Column of V paired with the smallest singular value.
            let smallest = svd
                .singular_values
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
                .unwrap_or(2);
            let flipped = -v.column(smallest);
            v.set_column(smallest, &flipped);
            rotation = v * u.transpose();
        }
        self.check_orthonormal(&rotation)?;

        let rotation = Rotation3::from_matrix_unchecked(rotation);
        let translation = target_centroid - rotation * source_centroid;
        let transform = RigidTransform::new(rotation, translation);

        debug!(
            "rigid fit of {} pairs, rms residual {:.6}",
            source.len(),
            transform.rms_error(source, target)
        );
        Ok(transform)
    }

    /// `R·p + t` for every point; order and length are preserved.
    pub fn apply_transform(
        &self,
        transform: &RigidTransform,
        points: &[Point3<f64>],
    ) -> Vec<Point3<f64>> {
        transform.transform_points(points)
    }

    fn check_correspondence(
        &self,
        source: &[Point3<f64>],
        target: &[Point3<f64>],
    ) -> AlignResult<()> {
        if source.is_empty() && target.is_empty() {
            return Err(AlignError::DegenerateInput(DegenerateReason::Empty));
        }
        if source.len() != target.len() {
            return Err(AlignError::DegenerateInput(
                DegenerateReason::LengthMismatch {
                    source_len: source.len(),
                    target_len: target.len(),
                },
            ));
        }
        if source.len() < self.config.min_correspondences {
            return Err(AlignError::DegenerateInput(DegenerateReason::TooFewPoints {
                required: self.config.min_correspondences,
                provided: source.len(),
            }));
        }
        let all_finite = source
            .iter()
            .chain(target.iter())
            .all(|p| p.coords.iter().all(|c| c.is_finite()));
        if !all_finite {
            return Err(AlignError::NumericalInstability(
                "point coordinates must be finite".into(),
            ));
        }
        Ok(())
    }

    fn check_orthonormal(&self, rotation: &Matrix3<f64>) -> AlignResult<()> {
        let tol = self.config.orthonormality_tolerance;
        let det = rotation.determinant();
        let drift = (rotation.transpose() * rotation - Matrix3::identity()).amax();
        if !det.is_finite() || (det - 1.0).abs() > tol || drift > tol {
            return Err(AlignError::NumericalInstability(format!(
                "rotation is not orthonormal (det {:.6e}, drift {:.3e})",
                det, drift
            )));
        }
        Ok(())
    }
}

/// [`RigidAligner::compute_rigid_transform`] with the default tolerances.
pub fn compute_rigid_transform(
    source: &[Point3<f64>],
    target: &[Point3<f64>],
) -> AlignResult<RigidTransform> {
    RigidAligner::default().compute_rigid_transform(source, target)
}

pub fn apply_transform(transform: &RigidTransform, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    transform.transform_points(points)
}

fn centroid(points: &[Point3<f64>]) -> Vector3<f64> {
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    sum / points.len() as f64
}

/// True when the points do not span a plane: all on one line, coincident, or
/// fewer than three. Uses the same relative threshold as the fit.
pub fn is_collinear(points: &[Point3<f64>], rank_tolerance: f64) -> bool {
    if points.len() < 3 {
        return true;
    }
    let c = centroid(points);
    let scatter = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = p.coords - c;
        acc + d * d.transpose()
    });
    let Some(svd) = scatter.try_svd(false, false, f64::EPSILON, SVD_MAX_ITERATIONS) else {
        return true;
    };
    let mut singular: Vec<f64> = svd.singular_values.iter().copied().collect();
    singular.sort_by(|a, b| b.total_cmp(a));
    if singular.iter().any(|s| !s.is_finite()) {
        return true;
    }
    singular[0] <= f64::EPSILON || singular[1] <= rank_tolerance * singular[0]
}
