pub mod quadtree;

pub use quadtree::{QuadTree, SpatialItem};
