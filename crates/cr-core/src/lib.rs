pub mod color;
pub mod cube;
pub mod cylinder;
pub mod draw;
pub mod graph;
pub mod id;
pub mod image;
pub mod lighting;
pub mod lint;
pub mod record;
pub mod transform;

pub use color::Color;
pub use cylinder::Cylinder;
pub use draw::{DrawCommand, DrawContext, RecordingContext, Vertex};
pub use graph::{Behavior, Node, SceneGraph};
pub use id::NodeId;
pub use image::{ImageHandle, ImageTable, ImageTableError, TexCoords};
pub use lighting::{LightSlot, LightSource, Material};
pub use lint::{LintSeverity, SceneDiagnostic, lint_scene};
pub use record::{CardRecord, Placement, RecordError, Side, emit_record, parse_record, parse_records};
pub use transform::{ShearCoefficients, Transform};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
