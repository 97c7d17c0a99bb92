//! Everything between the point list and the map: distances, proximity
//! grouping, location offsets, the cluster policy and marker bookkeeping.

pub mod cluster;
pub mod distance;
pub mod grouping;
pub mod offset;
pub mod pipeline;
pub mod reconcile;

pub use cluster::{layer_for, should_cluster_normal_points, FilterState, Layer};
pub use distance::{distance_km, Coord};
pub use grouping::{group, GroupedPoint, Grouping};
pub use offset::{OffsetPoint, OffsetResolver};
pub use pipeline::{MarkerPipeline, PlacedPoint, RenderPartition};
pub use reconcile::{LayerDiff, MarkerKey, MarkerLayers, Placement};
