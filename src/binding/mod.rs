pub mod classes;

use nalgebra::{Point3, Vector3};
use pyo3::prelude::*;

use crate::annotation::AnnotationRegistry;
use crate::rigid;
use crate::settings::{format_element_ranges, format_scale, parse_element_ranges, parse_scale};
use crate::workflow;
pub use classes::PyRigidTransform;
use classes::{from_points, to_points, PyPoint};

/// Best rigid transform (rotation + translation) carrying ``source`` onto
/// ``target``. Points are paired by index.
///
/// Args:
///     source: list of (x, y, z) tuples, e.g. fiducial marker positions
///     target: list of (x, y, z) tuples of the same length, e.g. mesh landmarks
///
/// Returns:
///     PyRigidTransform with a proper rotation (never a reflection)
///
/// Raises:
///     ValueError: fewer than 3 pairs, unequal lengths or collinear points
///     RuntimeError: non-finite coordinates or a failed decomposition
///
/// Example:
///     >>> import scaffoldalign as sa
///     >>> t = sa.compute_rigid_transform(
///     ...     [(0, 0, 0), (1, 0, 0), (0, 1, 0)],
///     ...     [(1, 1, 0), (2, 1, 0), (1, 2, 0)],
///     ... )
///     >>> t.translation
///     (1.0, 1.0, 0.0)
#[pyfunction]
pub fn compute_rigid_transform(
    source: Vec<PyPoint>,
    target: Vec<PyPoint>,
) -> PyResult<PyRigidTransform> {
    let transform = rigid::compute_rigid_transform(&to_points(&source), &to_points(&target))?;
    Ok((&transform).into())
}

/// Moves every point by ``transform``; order and length are kept.
#[pyfunction]
pub fn apply_transform(transform: PyRigidTransform, points: Vec<PyPoint>) -> Vec<PyPoint> {
    let moved = rigid::apply_transform(&transform.to_rust_transform(), &to_points(&points));
    from_points(&moved)
}

/// Parses delete-element-range text such as ``"12-10,3,5-7"``.
///
/// Returns:
///     (list of (start, stop) tuples, canonical text), e.g.
///     ([(3, 3), (5, 7), (10, 12)], "3,5-7,10-12")
#[pyfunction]
#[pyo3(name = "parse_element_ranges")]
pub fn parse_element_ranges_py(text: &str) -> (Vec<(u32, u32)>, String) {
    let ranges = parse_element_ranges(text);
    let canonical = format_element_ranges(&ranges);
    (
        ranges.iter().map(|r| (r.start, r.stop)).collect(),
        canonical,
    )
}

/// Parses scale text such as ``"2*0.5"``.
///
/// Returns:
///     ((x, y, z), canonical text), e.g. ((2.0, 0.5, 0.5), "2*0.5*0.5")
#[pyfunction]
#[pyo3(name = "parse_scale")]
pub fn parse_scale_py(text: &str) -> (PyPoint, String) {
    let scale = parse_scale(text);
    ((scale[0], scale[1], scale[2]), format_scale(&scale))
}

/// Fiducial labels defined for a mesh type, empty if it has none.
#[pyfunction]
pub fn fiducial_labels(mesh_type: &str) -> Vec<String> {
    AnnotationRegistry::builtin()
        .fiducial_labels(mesh_type)
        .into_iter()
        .map(String::from)
        .collect()
}

/// Mesh node carrying ``label`` on ``mesh_type``, or None.
#[pyfunction]
pub fn annotation_node(mesh_type: &str, label: &str) -> Option<u32> {
    AnnotationRegistry::builtin().node_for(mesh_type, label)
}

/// Intersection of the pick ray ``near`` -> ``far`` with a plane, or None
/// when the ray is parallel to it.
#[pyfunction]
pub fn point_on_plane(
    near: PyPoint,
    far: PyPoint,
    plane_point: PyPoint,
    plane_normal: PyPoint,
) -> Option<PyPoint> {
    let p = |(x, y, z): PyPoint| Point3::new(x, y, z);
    let (nx, ny, nz) = plane_normal;
    workflow::point_on_plane(
        &p(near),
        &p(far),
        &p(plane_point),
        &Vector3::new(nx, ny, nz),
    )
    .map(|hit| (hit.x, hit.y, hit.z))
}
