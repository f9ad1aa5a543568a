use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use nalgebra::Point3;

use super::host::{NodeEditor, NodeLocator};
use super::markers::FiducialMarkers;
use crate::annotation::MeshAnnotation;
use crate::rigid::{RigidAligner, RigidTransform};

/// Marker positions paired with the mesh nodes carrying the same labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Correspondence {
    pub labels: Vec<String>,
    pub source: Vec<Point3<f64>>,
    pub target: Vec<Point3<f64>>,
}

#[derive(Debug, Clone)]
pub struct AlignmentOutcome {
    pub transform: RigidTransform,
    pub markers: FiducialMarkers,
    pub plane_corners: Vec<Point3<f64>>,
    pub rms_error: f64,
}

/// Looks up the mesh node for every placed marker.
pub fn correspondence<H: NodeLocator + ?Sized>(
    markers: &FiducialMarkers,
    annotation: &MeshAnnotation,
    host: &H,
) -> Result<Correspondence> {
    let mut labels = Vec::with_capacity(markers.len());
    let mut source = Vec::with_capacity(markers.len());
    let mut target = Vec::with_capacity(markers.len());

    for marker in markers.iter() {
        let node_id = annotation.node(&marker.label).ok_or_else(|| {
            anyhow!(
                "no landmark {:?} on mesh type {:?}",
                marker.label,
                annotation.mesh_type
            )
        })?;
        let node_position = host
            .node_location(node_id)
            .with_context(|| format!("failed to locate node {} for {:?}", node_id, marker.label))?;

        labels.push(marker.label.clone());
        source.push(marker.position);
        target.push(node_position);
    }

    Ok(Correspondence {
        labels,
        source,
        target,
    })
}

/// Fits the markers onto their mesh landmarks and moves the markers and the
/// image plane corners with the resulting transform.
pub fn align_markers<H: NodeLocator + ?Sized>(
    aligner: &RigidAligner,
    markers: &FiducialMarkers,
    annotation: &MeshAnnotation,
    host: &H,
    plane_corners: &[Point3<f64>],
) -> Result<AlignmentOutcome> {
    if !markers.is_ready(aligner.config()) {
        bail!(
            "need at least {} non-collinear fiducial markers, have {}",
            aligner.config().min_correspondences,
            markers.len()
        );
    }

    let pairs = correspondence(markers, annotation, host)?;
    let transform = aligner
        .compute_rigid_transform(&pairs.source, &pairs.target)
        .context("failed to fit fiducial markers to the mesh")?;
    let rms_error = transform.rms_error(&pairs.source, &pairs.target);

    info!(
        "aligned {} fiducial markers to {:?}, rms {:.4}",
        pairs.labels.len(),
        annotation.mesh_type,
        rms_error
    );

    Ok(AlignmentOutcome {
        transform,
        markers: markers.transformed(&transform),
        plane_corners: aligner.apply_transform(&transform, plane_corners),
        rms_error,
    })
}

/// Moves the plane-corner nodes held by the host rigidly with `transform`.
/// All nodes are read before any is written.
pub fn apply_to_plane<H: NodeEditor + ?Sized>(
    host: &mut H,
    plane_node_ids: &[u32],
    transform: &RigidTransform,
) -> Result<Vec<Point3<f64>>> {
    let corners = plane_node_ids
        .iter()
        .map(|id| {
            host.node_location(*id)
                .with_context(|| format!("failed to read plane node {}", id))
        })
        .collect::<Result<Vec<_>>>()?;

    let moved = transform.transform_points(&corners);
    for (id, position) in plane_node_ids.iter().zip(moved.iter()) {
        host.set_node_location(*id, *position)
            .with_context(|| format!("failed to move plane node {}", id))?;
    }
    debug!("moved {} plane nodes", moved.len());
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationRegistry;
    use crate::error::{AlignError, DegenerateReason};
    use crate::utils::test_utils::{random_transform, unit_plane_corners};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    const MESH_TYPE: &str = "3D Heart Ventricles with Base 1";

    /// Mesh nodes for the four annotated landmarks
    fn heart_nodes() -> HashMap<u32, Point3<f64>> {
        HashMap::from([
            (46, Point3::new(0.0, -1.0, -2.0)),
            (112, Point3::new(1.5, -0.5, -1.5)),
            (40, Point3::new(0.2, 0.8, 1.0)),
            (118, Point3::new(2.0, 0.5, 0.2)),
            (500, Point3::new(0.0, 0.0, 0.0)),
            (501, Point3::new(1.0, 0.0, 0.0)),
        ])
    }

    /// Markers that are the landmarks moved by the inverse of `transform`
    fn markers_for(nodes: &HashMap<u32, Point3<f64>>, transform: &RigidTransform) -> FiducialMarkers {
        let registry = AnnotationRegistry::builtin();
        let annotation = registry.get(MESH_TYPE).unwrap();
        let inverse = transform.inverse();
        let mut markers = FiducialMarkers::new();
        for label in annotation.labels() {
            let node = nodes[&annotation.node(label).unwrap()];
            markers.place(label, inverse.transform_point(&node));
        }
        markers
    }

    #[test]
    fn test_correspondence_follows_marker_order() {
        let registry = AnnotationRegistry::builtin();
        let annotation = registry.get(MESH_TYPE).unwrap();
        let nodes = heart_nodes();
        let mut markers = FiducialMarkers::new();
        markers.place("RV apex", Point3::new(9.0, 9.0, 9.0));
        markers.place("LV apex", Point3::new(8.0, 8.0, 8.0));

        let pairs = correspondence(&markers, annotation, &nodes).unwrap();
        assert_eq!(pairs.labels, vec!["RV apex", "LV apex"]);
        assert_eq!(pairs.source[0], Point3::new(9.0, 9.0, 9.0));
        assert_eq!(pairs.target[0], nodes[&112u32]);
        assert_eq!(pairs.target[1], nodes[&46u32]);
    }

    #[test]
    fn test_correspondence_errors() {
        let registry = AnnotationRegistry::builtin();
        let annotation = registry.get(MESH_TYPE).unwrap();

        let mut markers = FiducialMarkers::new();
        markers.place("Left atrium", Point3::origin());
        let err = correspondence(&markers, annotation, &heart_nodes()).unwrap_err();
        assert!(err.to_string().contains("Left atrium"));

        let mut markers = FiducialMarkers::new();
        markers.place("LV apex", Point3::origin());
        let err = correspondence(&markers, annotation, &HashMap::<u32, Point3<f64>>::new()).unwrap_err();
        assert!(format!("{:#}", err).contains("node 46"));
    }

    #[test]
    fn test_align_markers_lands_on_landmarks() {
        let mut rng = StdRng::seed_from_u64(23);
        let truth = random_transform(&mut rng);
        let nodes = heart_nodes();
        let markers = markers_for(&nodes, &truth);
        let registry = AnnotationRegistry::builtin();
        let annotation = registry.get(MESH_TYPE).unwrap();

        let corners = unit_plane_corners();
        let outcome =
            align_markers(&RigidAligner::default(), &markers, annotation, &nodes, &corners).unwrap();

        assert!(outcome.rms_error < 1e-9);
        assert_relative_eq!(
            *outcome.transform.rotation_matrix(),
            *truth.rotation_matrix(),
            epsilon = 1e-9
        );
        for marker in outcome.markers.iter() {
            let node = nodes[&annotation.node(&marker.label).unwrap()];
            assert_relative_eq!(marker.position, node, epsilon = 1e-9);
        }
        assert_eq!(outcome.plane_corners.len(), corners.len());
        for (before, after) in corners.iter().zip(outcome.plane_corners.iter()) {
            assert_relative_eq!(truth.transform_point(before), *after, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_align_requires_ready_markers() {
        let registry = AnnotationRegistry::builtin();
        let annotation = registry.get(MESH_TYPE).unwrap();
        let mut markers = FiducialMarkers::new();
        markers.place("LV apex", Point3::origin());
        markers.place("RV apex", Point3::new(1.0, 0.0, 0.0));

        let err = align_markers(&RigidAligner::default(), &markers, annotation, &heart_nodes(), &[])
            .unwrap_err();
        assert!(err.to_string().contains("at least 3"));
    }

    #[test]
    fn test_collinear_landmarks_surface_align_error() {
        let annotation = crate::annotation::MeshAnnotation::new(
            "line",
            &[("a", 500), ("b", 501), ("c", 502)],
        );
        let mut nodes = heart_nodes();
        nodes.insert(502, Point3::new(2.0, 0.0, 0.0));
        let mut markers = FiducialMarkers::new();
        markers.place("a", Point3::new(0.0, 0.0, 0.0));
        markers.place("b", Point3::new(0.0, 1.0, 0.0));
        markers.place("c", Point3::new(1.0, 0.0, 0.0));

        let err = align_markers(&RigidAligner::default(), &markers, &annotation, &nodes, &[])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AlignError>(),
            Some(AlignError::DegenerateInput(DegenerateReason::Collinear))
        ));
    }

    #[test]
    fn test_apply_to_plane_updates_host() {
        let mut rng = StdRng::seed_from_u64(29);
        let transform = random_transform(&mut rng);
        let corners = unit_plane_corners();
        let mut host: HashMap<u32, Point3<f64>> = corners
            .iter()
            .enumerate()
            .map(|(i, p)| (i as u32 + 1, *p))
            .collect();

        let moved = apply_to_plane(&mut host, &[1, 2, 3, 4], &transform).unwrap();
        for (i, corner) in corners.iter().enumerate() {
            let expected = transform.transform_point(corner);
            assert_relative_eq!(moved[i], expected, epsilon = 1e-12);
            assert_relative_eq!(host[&(i as u32 + 1)], expected, epsilon = 1e-12);
        }

        let err = apply_to_plane(&mut host, &[1, 99], &transform).unwrap_err();
        assert!(err.to_string().contains("99"));
        assert_relative_eq!(host[&1u32], moved[0], epsilon = 1e-12);
    }
}
