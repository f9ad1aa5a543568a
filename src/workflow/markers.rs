use nalgebra::Point3;

use crate::rigid::{is_collinear, RigidTransform};
use crate::settings::AlignerConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct FiducialMarker {
    pub label: String,
    pub position: Point3<f64>,
}

/// Markers placed by the user, one per anatomical label, in placement order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiducialMarkers {
    markers: Vec<FiducialMarker>,
}

impl FiducialMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a marker; a marker already carrying `label` is moved instead.
    pub fn place(&mut self, label: &str, position: Point3<f64>) {
        match self.markers.iter_mut().find(|m| m.label == label) {
            Some(marker) => marker.position = position,
            None => self.markers.push(FiducialMarker {
                label: label.to_string(),
                position,
            }),
        }
    }

    pub fn remove(&mut self, label: &str) -> Option<Point3<f64>> {
        let idx = self.markers.iter().position(|m| m.label == label)?;
        Some(self.markers.remove(idx).position)
    }

    pub fn get(&self, label: &str) -> Option<Point3<f64>> {
        self.markers
            .iter()
            .find(|m| m.label == label)
            .map(|m| m.position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FiducialMarker> {
        self.markers.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.markers.iter().map(|m| m.label.as_str()).collect()
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.markers.iter().map(|m| m.position).collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Enough markers, not all on one line, to fit a rotation.
    pub fn is_ready(&self, config: &AlignerConfig) -> bool {
        self.len() >= config.min_correspondences
            && !is_collinear(&self.positions(), config.rank_tolerance)
    }

    /// Copy with every marker moved by `transform`.
    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        Self {
            markers: self
                .markers
                .iter()
                .map(|m| FiducialMarker {
                    label: m.label.clone(),
                    position: transform.transform_point(&m.position),
                })
                .collect(),
        }
    }
}
