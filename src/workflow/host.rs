use anyhow::{anyhow, Result};
use nalgebra::Point3;
use std::collections::HashMap;

/// Read access to node coordinates held by the host engine.
pub trait NodeLocator {
    fn node_location(&self, node_id: u32) -> Result<Point3<f64>>;
}

/// Write access to node coordinates; the host redraws after updates.
pub trait NodeEditor: NodeLocator {
    fn set_node_location(&mut self, node_id: u32, location: Point3<f64>) -> Result<()>;
}

impl NodeLocator for HashMap<u32, Point3<f64>> {
    fn node_location(&self, node_id: u32) -> Result<Point3<f64>> {
        self.get(&node_id)
            .copied()
            .ok_or_else(|| anyhow!("node {} not found", node_id))
    }
}

impl NodeEditor for HashMap<u32, Point3<f64>> {
    fn set_node_location(&mut self, node_id: u32, location: Point3<f64>) -> Result<()> {
        match self.get_mut(&node_id) {
            Some(slot) => {
                *slot = location;
                Ok(())
            }
            None => Err(anyhow!("node {} not found", node_id)),
        }
    }
}
