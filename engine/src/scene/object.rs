//! Scene objects: a named node owning a transform and its components.

use std::collections::HashMap;

use slotmap::new_key_type;

use super::component::ComponentSet;
use super::transform::Transform;

new_key_type! {
    /// Handle to a [`GameObject`] stored in a [`Scene`](super::Scene).
    ///
    /// Handles are generational: a handle to a destroyed object never
    /// resolves to an object created later in the same slot.
    pub struct ObjectId;
}

/// A node in the scene hierarchy.
///
/// The parent link is a plain id (non-owning); children are owned by the
/// scene arena and indexed here by name.
#[derive(Debug)]
pub struct GameObject {
    pub(crate) name: String,
    pub(crate) transform: Transform,
    pub(crate) components: ComponentSet,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: HashMap<String, ObjectId>,
}

impl GameObject {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            components: ComponentSet::default(),
            parent: None,
            children: HashMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    #[inline]
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Child id by name.
    pub fn child(&self, name: &str) -> Option<ObjectId> {
        self.children.get(name).copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Iterate `(name, id)` pairs of direct children (unordered).
    pub fn children(&self) -> impl Iterator<Item = (&str, ObjectId)> + '_ {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }
}
