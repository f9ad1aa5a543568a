use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::AlignError;
use crate::rigid::RigidTransform;

pub type PyPoint = (f64, f64, f64);
pub type PyMatrix3 = (PyPoint, PyPoint, PyPoint);

impl From<AlignError> for PyErr {
    fn from(err: AlignError) -> Self {
        match err {
            AlignError::DegenerateInput(_) => PyValueError::new_err(err.to_string()),
            AlignError::NumericalInstability(_) => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

pub fn to_points(points: &[PyPoint]) -> Vec<Point3<f64>> {
    points.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect()
}

pub fn from_points(points: &[Point3<f64>]) -> Vec<PyPoint> {
    points.iter().map(|p| (p.x, p.y, p.z)).collect()
}

/// Rotation (row-major 3x3) and translation of a rigid fit.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyRigidTransform {
    #[pyo3(get)]
    pub rotation: PyMatrix3,
    #[pyo3(get)]
    pub translation: PyPoint,
}

#[pymethods]
impl PyRigidTransform {
    /// Identity transform.
    #[new]
    fn new() -> Self {
        (&RigidTransform::identity()).into()
    }

    /// Applies the transform to a list of (x, y, z) tuples, keeping order.
    fn apply(&self, points: Vec<PyPoint>) -> Vec<PyPoint> {
        let transform = self.to_rust_transform();
        from_points(&transform.transform_points(&to_points(&points)))
    }

    fn inverse(&self) -> PyRigidTransform {
        (&self.to_rust_transform().inverse()).into()
    }

    fn __repr__(&self) -> String {
        let (r0, r1, r2) = self.rotation;
        format!(
            "RigidTransform(rotation=[[{:.4}, {:.4}, {:.4}], [{:.4}, {:.4}, {:.4}], [{:.4}, {:.4}, {:.4}]], translation=({:.4}, {:.4}, {:.4}))",
            r0.0, r0.1, r0.2,
            r1.0, r1.1, r1.2,
            r2.0, r2.1, r2.2,
            self.translation.0, self.translation.1, self.translation.2
        )
    }
}

impl PyRigidTransform {
    pub fn to_rust_transform(&self) -> RigidTransform {
        let (r0, r1, r2) = self.rotation;
        let m = Matrix3::new(
            r0.0, r0.1, r0.2,
            r1.0, r1.1, r1.2,
            r2.0, r2.1, r2.2,
        );
        let (tx, ty, tz) = self.translation;
        RigidTransform::new(Rotation3::from_matrix_unchecked(m), Vector3::new(tx, ty, tz))
    }
}

impl From<&RigidTransform> for PyRigidTransform {
    fn from(transform: &RigidTransform) -> Self {
        let m = transform.rotation_matrix();
        let row = |i: usize| (m[(i, 0)], m[(i, 1)], m[(i, 2)]);
        let t = transform.translation;
        Self {
            rotation: (row(0), row(1), row(2)),
            translation: (t.x, t.y, t.z),
        }
    }
}
