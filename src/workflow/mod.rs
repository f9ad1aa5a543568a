pub mod fit;
pub mod host;
pub mod markers;
pub mod plane;

pub use fit::{align_markers, apply_to_plane, correspondence, AlignmentOutcome, Correspondence};
pub use host::{NodeEditor, NodeLocator};
pub use markers::{FiducialMarker, FiducialMarkers};
pub use plane::{point_on_plane, scale_points};
