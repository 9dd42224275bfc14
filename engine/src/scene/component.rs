//! Component Registry
//!
//! The set of capabilities an object can carry is closed: every kind is a
//! variant of [`Component`] and an object holds at most one of each. Storage
//! is a fixed slot array indexed by [`ComponentKind`], so lookups are O(1)
//! and the stored instance never moves while attached.

use crate::camera::Camera;
use crate::physics::Rigidbody;

/// Capability kinds an object can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Camera,
    Rigidbody,
}

impl ComponentKind {
    /// Number of kinds (slot count of a [`ComponentSet`]).
    pub const COUNT: usize = 2;

    pub const ALL: [ComponentKind; Self::COUNT] = [ComponentKind::Camera, ComponentKind::Rigidbody];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            ComponentKind::Camera => 0,
            ComponentKind::Rigidbody => 1,
        }
    }
}

/// A component instance owned by a scene object.
#[derive(Debug, Clone)]
pub enum Component {
    Camera(Camera),
    Rigidbody(Rigidbody),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Camera(_) => ComponentKind::Camera,
            Component::Rigidbody(_) => ComponentKind::Rigidbody,
        }
    }
}

/// Typed access to one variant of [`Component`].
///
/// Lets the scene offer `component::<Camera>(id)` style queries without the
/// caller matching on the enum.
pub trait ComponentType: Sized {
    const KIND: ComponentKind;

    fn into_component(self) -> Component;
    fn from_component(component: Component) -> Option<Self>;
    fn from_ref(component: &Component) -> Option<&Self>;
    fn from_mut(component: &mut Component) -> Option<&mut Self>;
}

macro_rules! component_type {
    ($ty:ty, $variant:ident) => {
        impl ComponentType for $ty {
            const KIND: ComponentKind = ComponentKind::$variant;

            fn into_component(self) -> Component {
                Component::$variant(self)
            }

            fn from_component(component: Component) -> Option<Self> {
                match component {
                    Component::$variant(c) => Some(c),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }

            fn from_ref(component: &Component) -> Option<&Self> {
                match component {
                    Component::$variant(c) => Some(c),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }

            fn from_mut(component: &mut Component) -> Option<&mut Self> {
                match component {
                    Component::$variant(c) => Some(c),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

component_type!(Camera, Camera);
component_type!(Rigidbody, Rigidbody);

/// At most one component per kind.
#[derive(Debug, Clone, Default)]
pub struct ComponentSet {
    slots: [Option<Component>; ComponentKind::COUNT],
}

impl ComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Store a component. Hands it back if the kind is already occupied.
    pub fn insert(&mut self, component: Component) -> Result<&mut Component, Component> {
        let slot = &mut self.slots[component.kind().index()];
        if slot.is_some() {
            return Err(component);
        }
        Ok(slot.insert(component))
    }

    pub fn get<T: ComponentType>(&self) -> Option<&T> {
        self.slots[T::KIND.index()].as_ref().and_then(T::from_ref)
    }

    pub fn get_mut<T: ComponentType>(&mut self) -> Option<&mut T> {
        self.slots[T::KIND.index()].as_mut().and_then(T::from_mut)
    }

    pub fn remove<T: ComponentType>(&mut self) -> Option<T> {
        self.slots[T::KIND.index()].take().and_then(T::from_component)
    }

    /// Kinds currently attached, in slot order.
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        ComponentKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every attached component.
    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_indices_are_dense() {
        for (i, kind) in ComponentKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn one_instance_per_kind() {
        let mut set = ComponentSet::new();
        assert!(set.insert(Camera::default().into_component()).is_ok());
        let rejected = set.insert(Camera::new(90.0, 0.1, 10.0).into_component());
        assert!(matches!(rejected, Err(Component::Camera(_))));
        assert_eq!(set.len(), 1);
        // The first instance survives the rejected insert.
        assert_eq!(set.get::<Camera>().unwrap().fov_degrees, Camera::default().fov_degrees);
    }

    #[test]
    fn typed_access_and_removal() {
        let mut set = ComponentSet::new();
        set.insert(Rigidbody::new(0.3, 1.8).into_component()).unwrap();
        assert!(set.get::<Camera>().is_none());
        set.get_mut::<Rigidbody>().unwrap().add_force(glam::Vec3::Y);
        let body = set.remove::<Rigidbody>().unwrap();
        assert_eq!(body.pending_impulse(), glam::Vec3::Y);
        assert!(set.is_empty());
    }

    #[test]
    fn kinds_lists_attached_slots() {
        let mut set = ComponentSet::new();
        set.insert(Rigidbody::new(0.3, 1.8).into_component()).unwrap();
        assert_eq!(set.kinds().collect::<Vec<_>>(), vec![ComponentKind::Rigidbody]);
        set.clear();
        assert_eq!(set.kinds().count(), 0);
    }
}
