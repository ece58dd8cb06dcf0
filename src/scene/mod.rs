//! Test scene construction
//!
//! Named demo scenes assembled from convex hull colliders. A hull that fails
//! construction aborts scene setup; it never enters the pair-testing set.

mod scene_builder;

pub use scene_builder::{build_scene, SceneError};
