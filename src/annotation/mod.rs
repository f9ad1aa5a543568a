use std::collections::HashMap;

/// Anatomical landmarks of one scaffold type, keyed by label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshAnnotation {
    pub mesh_type: String,
    landmarks: Vec<(String, u32)>,
}

impl MeshAnnotation {
    pub fn new<S: Into<String>>(mesh_type: S, landmarks: &[(&str, u32)]) -> Self {
        Self {
            mesh_type: mesh_type.into(),
            landmarks: landmarks
                .iter()
                .map(|(label, node)| (label.to_string(), *node))
                .collect(),
        }
    }

    /// Labels in declaration order.
    pub fn labels(&self) -> Vec<&str> {
        self.landmarks.iter().map(|(l, _)| l.as_str()).collect()
    }

    pub fn node(&self, label: &str) -> Option<u32> {
        self.landmarks
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, node)| *node)
    }
}

/// Scaffold types that carry fiducial landmarks, looked up by mesh type name.
#[derive(Debug, Clone, Default)]
pub struct AnnotationRegistry {
    entries: HashMap<String, MeshAnnotation>,
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the annotated heart ventricle scaffolds.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(MeshAnnotation::new(
            "3D Heart Ventricles with Base 1",
            &[
                ("LV apex", 46),
                ("RV apex", 112),
                ("LAD CFX junction", 40),
                ("RV wall extent", 118),
            ],
        ));
        registry.register(MeshAnnotation::new(
            "3D Heart Ventricles with Base 2",
            &[
                ("LV apex", 62),
                ("RV apex", 167),
                ("LAD CFX junction", 54),
                ("RV wall extent", 191),
            ],
        ));
        registry
    }

    /// Adds or replaces the annotation for its mesh type.
    pub fn register(&mut self, annotation: MeshAnnotation) -> Option<MeshAnnotation> {
        self.entries
            .insert(annotation.mesh_type.clone(), annotation)
    }

    pub fn get(&self, mesh_type: &str) -> Option<&MeshAnnotation> {
        self.entries.get(mesh_type)
    }

    pub fn node_for(&self, mesh_type: &str, label: &str) -> Option<u32> {
        self.get(mesh_type).and_then(|a| a.node(label))
    }

    /// Labels a user can place markers for; empty for unannotated mesh types.
    pub fn fiducial_labels(&self, mesh_type: &str) -> Vec<&str> {
        self.get(mesh_type).map(|a| a.labels()).unwrap_or_default()
    }

    pub fn mesh_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(|k| k.as_str()).collect();
        names.sort();
        names
    }
}
