//! Rigid fiducial alignment and settings handling for a scaffold mesh
//! generator step. The host engine stays behind the [`workflow::NodeLocator`]
//! and [`workflow::NodeEditor`] traits, or the Python module built with the
//! `python` feature.

pub mod annotation;
pub mod error;
pub mod rigid;
pub mod settings;
pub mod workflow;
mod utils;

#[cfg(feature = "python")]
mod binding;

pub use annotation::{AnnotationRegistry, MeshAnnotation};
pub use error::{AlignError, AlignResult, DegenerateReason};
pub use rigid::{apply_transform, compute_rigid_transform, RigidAligner, RigidTransform};
pub use settings::{AlignerConfig, GeneratorSettings};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// This is the module importable from Python:
///
/// ```python
/// import scaffoldalign as sa
/// t = sa.compute_rigid_transform(markers, landmarks)
/// corners = t.apply(corners)
/// ```
#[cfg(feature = "python")]
#[pymodule]
fn scaffoldalign(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use pyo3::wrap_pyfunction;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(binding::compute_rigid_transform, m)?)?;
    m.add_function(wrap_pyfunction!(binding::apply_transform, m)?)?;
    m.add_function(wrap_pyfunction!(binding::parse_element_ranges_py, m)?)?;
    m.add_function(wrap_pyfunction!(binding::parse_scale_py, m)?)?;
    m.add_function(wrap_pyfunction!(binding::fiducial_labels, m)?)?;
    m.add_function(wrap_pyfunction!(binding::annotation_node, m)?)?;
    m.add_function(wrap_pyfunction!(binding::point_on_plane, m)?)?;

    m.add_class::<binding::PyRigidTransform>()?;
    Ok(())
}
