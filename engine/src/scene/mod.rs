//! Scene Module
//!
//! Transform hierarchy, scene objects and the closed component registry.

pub mod component;
pub mod graph;
pub mod object;
pub mod transform;

pub use component::{Component, ComponentKind, ComponentSet, ComponentType};
pub use graph::Scene;
pub use object::{GameObject, ObjectId};
pub use transform::Transform;
