use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::parse::{
    format_element_ranges, format_scale, parse_element_ranges, parse_scale, ElementRange,
};

/// Which graphics the host draws for the generated scaffold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    pub display_axes: bool,
    pub display_element_numbers: bool,
    pub display_lines: bool,
    pub display_node_derivatives: bool,
    pub display_node_numbers: bool,
    pub display_surfaces: bool,
    pub display_surfaces_exterior: bool,
    pub display_surfaces_translucent: bool,
    pub display_surfaces_wireframe: bool,
    pub display_xi_axes: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            display_axes: true,
            display_element_numbers: true,
            display_lines: true,
            display_node_derivatives: false,
            display_node_numbers: true,
            display_surfaces: true,
            display_surfaces_exterior: true,
            display_surfaces_translucent: true,
            display_surfaces_wireframe: false,
            display_xi_axes: false,
        }
    }
}

impl DisplaySettings {
    /// Lines drawn over opaque surfaces need depth perturbation to stay visible.
    pub fn needs_perturb_lines(&self, has_surfaces: bool) -> bool {
        has_surfaces
            && self.display_lines
            && self.display_surfaces
            && !self.display_surfaces_translucent
    }
}

/// Scaffold generator settings exchanged with the host as JSON.
///
/// The record is immutable: every `with_*` method returns an updated copy,
/// together with whether the parsed value actually changed where the host
/// needs to know if the mesh must be regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorSettings {
    pub mesh_type_name: String,
    pub mesh_type_options: Map<String, Value>,
    delete_element_ranges: String,
    scale: String,
    #[serde(flatten)]
    pub display: DisplaySettings,
    #[serde(skip)]
    parsed_ranges: Vec<ElementRange>,
    #[serde(skip)]
    parsed_scale: [f64; 3],
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        let parsed_scale = [1.0; 3];
        Self {
            mesh_type_name: String::new(),
            mesh_type_options: Map::new(),
            delete_element_ranges: String::new(),
            scale: format_scale(&parsed_scale),
            display: DisplaySettings::default(),
            parsed_ranges: Vec::new(),
            parsed_scale,
        }
    }
}

impl GeneratorSettings {
    /// Reads host settings; range and scale text are re-parsed and canonicalised.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: GeneratorSettings =
            serde_json::from_str(text).context("failed to parse generator settings")?;
        let (settings, _) = raw.with_delete_element_ranges_text(&raw.delete_element_ranges);
        let (settings, _) = settings.with_scale_text(&raw.scale);
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialise generator settings")
    }

    pub fn with_mesh_type_name(&self, name: &str) -> Self {
        Self {
            mesh_type_name: name.to_string(),
            ..self.clone()
        }
    }

    pub fn with_mesh_type_option(&self, key: &str, value: Value) -> (Self, bool) {
        let changed = self.mesh_type_options.get(key) != Some(&value);
        let mut next = self.clone();
        next.mesh_type_options.insert(key.to_string(), value);
        (next, changed)
    }

    /// Starts from a mesh type's default options and keeps any saved values on top.
    pub fn with_merged_mesh_type_options(&self, defaults: &Map<String, Value>) -> Self {
        let mut options = defaults.clone();
        for (key, value) in &self.mesh_type_options {
            options.insert(key.clone(), value.clone());
        }
        Self {
            mesh_type_options: options,
            ..self.clone()
        }
    }

    pub fn delete_element_ranges_text(&self) -> &str {
        &self.delete_element_ranges
    }

    pub fn element_ranges(&self) -> &[ElementRange] {
        &self.parsed_ranges
    }

    pub fn with_delete_element_ranges_text(&self, text: &str) -> (Self, bool) {
        let ranges = parse_element_ranges(text);
        let changed = ranges != self.parsed_ranges;
        let next = Self {
            delete_element_ranges: format_element_ranges(&ranges),
            parsed_ranges: ranges,
            ..self.clone()
        };
        (next, changed)
    }

    pub fn scale_text(&self) -> &str {
        &self.scale
    }

    pub fn scale(&self) -> [f64; 3] {
        self.parsed_scale
    }

    pub fn is_unit_scale(&self) -> bool {
        self.parsed_scale == [1.0; 3]
    }

    pub fn with_scale_text(&self, text: &str) -> (Self, bool) {
        let scale = parse_scale(text);
        let changed = scale != self.parsed_scale;
        let next = Self {
            scale: format_scale(&scale),
            parsed_scale: scale,
            ..self.clone()
        };
        (next, changed)
    }

    pub fn with_display(&self, display: DisplaySettings) -> Self {
        Self {
            display,
            ..self.clone()
        }
    }
}
