//! satbox - rigid-body collision test harness
//!
//! A headless harness around the satbox physics core: it loads a named test
//! scene, steps the simulation at a fixed rate, and reports the contact
//! manifolds each tick. Rendering, windowing, and mesh loading are external
//! collaborators and live outside this crate.

pub mod config;
pub mod scene;
pub mod systems;
