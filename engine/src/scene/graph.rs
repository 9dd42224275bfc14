//! Scene Graph
//!
//! Arena of [`GameObject`]s keyed by [`ObjectId`]. The scene owns every
//! object; hierarchy links are ids, so re-parenting never moves data and a
//! stale id simply stops resolving.
//!
//! World transforms are cached per node and invalidated for the whole
//! subtree on any local change or re-parent. A dirty node always has dirty
//! descendants, which lets invalidation stop early at nodes that are
//! already dirty.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};
use slotmap::SlotMap;

use crate::error::{EngineError, EngineResult};
use crate::math::{FORWARD, GridAxes, RIGHT, UP, quat_to_euler_degrees};

use super::component::ComponentType;
use super::object::{GameObject, ObjectId};
use super::transform::Transform;

/// Parent label used in errors about the root namespace.
const ROOT_LABEL: &str = "<scene root>";

/// Owner of all scene objects.
#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<ObjectId, GameObject>,
    roots: HashMap<String, ObjectId>,
    grid_axes: GridAxes,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene whose transposed queries use the given grid convention.
    pub fn with_grid_axes(grid_axes: GridAxes) -> Self {
        Self {
            grid_axes,
            ..Default::default()
        }
    }

    #[inline]
    pub fn grid_axes(&self) -> GridAxes {
        self.grid_axes
    }

    pub fn set_grid_axes(&mut self, grid_axes: GridAxes) {
        self.grid_axes = grid_axes;
    }

    /// Number of live objects (attached or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(id)
    }

    fn object(&self, id: ObjectId) -> EngineResult<&GameObject> {
        self.objects
            .get(id)
            .ok_or_else(|| EngineError::not_found(format!("object {id:?}")))
    }

    fn object_mut(&mut self, id: ObjectId) -> EngineResult<&mut GameObject> {
        self.objects
            .get_mut(id)
            .ok_or_else(|| EngineError::not_found(format!("object {id:?}")))
    }

    // ========================================================================
    // HIERARCHY
    // ========================================================================

    /// Create a detached object. It is nobody's child and not a root until
    /// attached with [`Scene::add_child`] or [`Scene::set_parent`].
    pub fn create(&mut self, name: impl Into<String>) -> ObjectId {
        self.objects.insert(GameObject::new(name))
    }

    /// Create an object and register it as a root.
    pub fn spawn(&mut self, name: impl Into<String>) -> EngineResult<ObjectId> {
        let id = self.create(name);
        if let Err(err) = self.set_parent(id, None) {
            self.objects.remove(id);
            return Err(err);
        }
        log::debug!("spawned root '{}'", self.objects[id].name);
        Ok(id)
    }

    /// Attach `child` under `parent`, detaching it from wherever it was.
    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> EngineResult<()> {
        self.set_parent(child, Some(parent))
    }

    /// Re-parent `child`. `None` moves it into the root namespace.
    ///
    /// Fails without touching the scene when the new sibling set already has
    /// an object with the same name, or when the move would create a cycle.
    pub fn set_parent(&mut self, child: ObjectId, parent: Option<ObjectId>) -> EngineResult<()> {
        let name = self.object(child)?.name.clone();

        match parent {
            Some(parent_id) => {
                let parent_obj = self.object(parent_id)?;
                if parent_id == child || self.is_ancestor(child, parent_id) {
                    return Err(EngineError::contract(format!(
                        "attaching '{}' under '{}' would create a cycle",
                        name, parent_obj.name
                    )));
                }
                if let Some(&existing) = parent_obj.children.get(&name) {
                    if existing == child {
                        return Ok(());
                    }
                    return Err(EngineError::DuplicateChild {
                        parent: parent_obj.name.clone(),
                        name,
                    });
                }
            }
            None => {
                if let Some(&existing) = self.roots.get(&name) {
                    if existing == child {
                        return Ok(());
                    }
                    return Err(EngineError::DuplicateChild {
                        parent: ROOT_LABEL.to_string(),
                        name,
                    });
                }
            }
        }

        self.unlink(child);
        match parent {
            Some(parent_id) => {
                if let Some(parent_obj) = self.objects.get_mut(parent_id) {
                    parent_obj.children.insert(name, child);
                }
            }
            None => {
                self.roots.insert(name, child);
            }
        }
        if let Some(obj) = self.objects.get_mut(child) {
            obj.parent = parent;
        }
        self.invalidate_subtree(child);
        Ok(())
    }

    /// Remove `child` from its parent (or the roots) without destroying it.
    pub fn detach(&mut self, child: ObjectId) -> EngineResult<()> {
        self.object(child)?;
        self.unlink(child);
        if let Some(obj) = self.objects.get_mut(child) {
            obj.parent = None;
        }
        self.invalidate_subtree(child);
        Ok(())
    }

    /// Drop the link from the current parent's child map (or the root map).
    fn unlink(&mut self, id: ObjectId) {
        let Some(obj) = self.objects.get(id) else {
            return;
        };
        let name = obj.name.clone();
        match obj.parent {
            Some(parent_id) => {
                if let Some(parent_obj) = self.objects.get_mut(parent_id) {
                    parent_obj.children.remove(&name);
                }
            }
            None => {
                if self.roots.get(&name) == Some(&id) {
                    self.roots.remove(&name);
                }
            }
        }
    }

    /// True if `ancestor` appears on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: ObjectId, node: ObjectId) -> bool {
        let mut cursor = self.objects.get(node).and_then(|o| o.parent);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.objects.get(id).and_then(|o| o.parent);
        }
        false
    }

    /// Direct child of `parent` by name.
    pub fn child(&self, parent: ObjectId, name: &str) -> EngineResult<ObjectId> {
        let obj = self.object(parent)?;
        obj.child(name)
            .ok_or_else(|| EngineError::not_found(format!("child '{}' of '{}'", name, obj.name)))
    }

    /// Direct children of `id` (unordered). Empty for a stale id.
    pub fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects
            .get(id)
            .map(|o| o.children.values().copied().collect())
            .unwrap_or_default()
    }

    #[inline]
    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects.get(id).and_then(|o| o.parent)
    }

    #[inline]
    pub fn name(&self, id: ObjectId) -> Option<&str> {
        self.objects.get(id).map(|o| o.name.as_str())
    }

    /// Root object by name.
    pub fn root(&self, name: &str) -> Option<ObjectId> {
        self.roots.get(name).copied()
    }

    pub fn roots(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.roots.values().copied()
    }

    /// Resolve a slash separated path such as `"Player/Camera"` from the roots.
    pub fn find(&self, path: &str) -> Option<ObjectId> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let mut current = self.root(segments.next()?)?;
        for segment in segments {
            current = self.objects.get(current)?.child(segment)?;
        }
        Some(current)
    }

    /// Destroy an object and its whole subtree. Components go with their
    /// objects. Returns the number of objects removed.
    pub fn destroy(&mut self, id: ObjectId) -> EngineResult<usize> {
        let name = self.object(id)?.name.clone();
        self.unlink(id);

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(obj) = self.objects.remove(next) {
                stack.extend(obj.children.into_values());
                removed += 1;
            }
        }
        log::debug!("destroyed '{}' ({} objects)", name, removed);
        Ok(removed)
    }

    // ========================================================================
    // TRANSFORMS
    // ========================================================================

    pub fn transform(&self, id: ObjectId) -> EngineResult<&Transform> {
        Ok(&self.object(id)?.transform)
    }

    pub fn set_local_position(&mut self, id: ObjectId, position: Vec3) -> EngineResult<()> {
        self.object_mut(id)?.transform.set_local_position(position);
        self.invalidate_subtree(id);
        Ok(())
    }

    /// Set local rotation in Euler degrees (`x` pitch, `y` yaw, `z` roll).
    pub fn set_local_rotation(&mut self, id: ObjectId, degrees: Vec3) -> EngineResult<()> {
        self.object_mut(id)?.transform.set_local_rotation(degrees);
        self.invalidate_subtree(id);
        Ok(())
    }

    pub fn set_local_scale(&mut self, id: ObjectId, scale: Vec3) -> EngineResult<()> {
        self.object_mut(id)?.transform.set_local_scale(scale);
        self.invalidate_subtree(id);
        Ok(())
    }

    /// Offset the local position (parent space).
    pub fn translate(&mut self, id: ObjectId, delta: Vec3) -> EngineResult<()> {
        let position = self.object(id)?.transform.local_position();
        self.set_local_position(id, position + delta)
    }

    /// Offset the object by a world-space delta.
    pub fn translate_world(&mut self, id: ObjectId, delta: Vec3) -> EngineResult<()> {
        let local_delta = match self.object(id)?.parent {
            Some(parent) => self.world_matrix(parent)?.inverse().transform_vector3(delta),
            None => delta,
        };
        self.translate(id, local_delta)
    }

    /// Place the object at a world-space position. Roots store it verbatim.
    pub fn set_world_position(&mut self, id: ObjectId, position: Vec3) -> EngineResult<()> {
        let local = match self.object(id)?.parent {
            Some(parent) => self.world_matrix(parent)?.inverse().transform_point3(position),
            None => position,
        };
        self.set_local_position(id, local)
    }

    /// Add Euler degrees to the local rotation. No clamping or wrapping.
    pub fn rotate(&mut self, id: ObjectId, delta_degrees: Vec3) -> EngineResult<()> {
        let rotation = self.object(id)?.transform.local_rotation();
        self.set_local_rotation(id, rotation + delta_degrees)
    }

    fn invalidate_subtree(&self, id: ObjectId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(obj) = self.objects.get(next) else {
                continue;
            };
            if obj.transform.is_dirty() {
                continue;
            }
            obj.transform.invalidate();
            stack.extend(obj.children.values().copied());
        }
    }

    /// World matrix, recomputing dirty ancestors on the way down.
    pub fn world_matrix(&self, id: ObjectId) -> EngineResult<Mat4> {
        let obj = self.object(id)?;
        if let Some(world) = obj.transform.cached_world() {
            return Ok(world);
        }

        // Walk up to the first clean ancestor, then compose back down.
        let mut chain = vec![id];
        let mut base = Mat4::IDENTITY;
        let mut cursor = obj.parent;
        while let Some(parent_id) = cursor {
            let parent = self.objects.get(parent_id).ok_or_else(|| {
                EngineError::contract(format!("'{}' has a dangling parent link", obj.name))
            })?;
            if let Some(world) = parent.transform.cached_world() {
                base = world;
                break;
            }
            chain.push(parent_id);
            cursor = parent.parent;
        }

        for node in chain.into_iter().rev() {
            let transform = &self.object(node)?.transform;
            base *= transform.local_matrix();
            transform.store_world(base);
        }
        Ok(base)
    }

    pub fn world_position(&self, id: ObjectId) -> EngineResult<Vec3> {
        Ok(self.world_matrix(id)?.w_axis.truncate())
    }

    pub fn world_rotation(&self, id: ObjectId) -> EngineResult<Quat> {
        let (_, rotation, _) = self.world_matrix(id)?.to_scale_rotation_translation();
        Ok(rotation)
    }

    /// World rotation as Euler degrees (pitch, yaw, roll), the same layout
    /// as a transform's local rotation.
    pub fn world_rotation_degrees(&self, id: ObjectId) -> EngineResult<Vec3> {
        Ok(quat_to_euler_degrees(self.world_rotation(id)?))
    }

    pub fn world_scale(&self, id: ObjectId) -> EngineResult<Vec3> {
        let (scale, _, _) = self.world_matrix(id)?.to_scale_rotation_translation();
        Ok(scale)
    }

    /// World-space forward (+Z rotated), unit length.
    pub fn forward(&self, id: ObjectId) -> EngineResult<Vec3> {
        Ok(self.world_matrix(id)?.transform_vector3(FORWARD).normalize_or_zero())
    }

    pub fn right(&self, id: ObjectId) -> EngineResult<Vec3> {
        Ok(self.world_matrix(id)?.transform_vector3(RIGHT).normalize_or_zero())
    }

    pub fn up(&self, id: ObjectId) -> EngineResult<Vec3> {
        Ok(self.world_matrix(id)?.transform_vector3(UP).normalize_or_zero())
    }

    /// World position expressed in block-grid axes.
    pub fn world_position_transposed(&self, id: ObjectId) -> EngineResult<Vec3> {
        Ok(self.grid_axes.apply(self.world_position(id)?))
    }

    /// Forward expressed in block-grid axes.
    pub fn forward_transposed(&self, id: ObjectId) -> EngineResult<Vec3> {
        Ok(self.grid_axes.apply(self.forward(id)?))
    }

    /// Recompute every dirty world matrix. Returns how many were dirty.
    pub fn resolve_transforms(&self) -> EngineResult<usize> {
        let dirty: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, obj)| obj.transform.is_dirty())
            .map(|(id, _)| id)
            .collect();
        for &id in &dirty {
            self.world_matrix(id)?;
        }
        Ok(dirty.len())
    }

    // ========================================================================
    // COMPONENTS
    // ========================================================================

    /// Attach a component and return the stored instance.
    pub fn add_component<T: ComponentType>(
        &mut self,
        id: ObjectId,
        component: T,
    ) -> EngineResult<&mut T> {
        let obj = self.object_mut(id)?;
        match obj.components.insert(component.into_component()) {
            Ok(stored) => T::from_mut(stored)
                .ok_or_else(|| EngineError::contract("component stored under the wrong kind")),
            Err(_) => Err(EngineError::DuplicateComponent(T::KIND)),
        }
    }

    pub fn component<T: ComponentType>(&self, id: ObjectId) -> Option<&T> {
        self.objects.get(id)?.components.get::<T>()
    }

    pub fn component_mut<T: ComponentType>(&mut self, id: ObjectId) -> Option<&mut T> {
        self.objects.get_mut(id)?.components.get_mut::<T>()
    }

    /// Component that the caller's contract says must be present.
    pub fn require_component<T: ComponentType>(&self, id: ObjectId) -> EngineResult<&T> {
        let obj = self.object(id)?;
        obj.components.get::<T>().ok_or_else(|| {
            EngineError::contract(format!("'{}' has no {:?} component", obj.name, T::KIND))
        })
    }

    pub fn require_component_mut<T: ComponentType>(&mut self, id: ObjectId) -> EngineResult<&mut T> {
        let obj = self.object_mut(id)?;
        if !obj.components.contains(T::KIND) {
            return Err(EngineError::contract(format!(
                "'{}' has no {:?} component",
                obj.name,
                T::KIND
            )));
        }
        obj.components
            .get_mut::<T>()
            .ok_or_else(|| EngineError::contract("component stored under the wrong kind"))
    }

    pub fn remove_component<T: ComponentType>(&mut self, id: ObjectId) -> Option<T> {
        self.objects.get_mut(id)?.components.remove::<T>()
    }

    pub fn has_component<T: ComponentType>(&self, id: ObjectId) -> bool {
        self.component::<T>(id).is_some()
    }

    /// Ids of every object carrying a component of type `T`.
    pub fn objects_with<T: ComponentType>(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, obj)| obj.components.contains(T::KIND))
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn spawn_registers_root() {
        let mut scene = Scene::new();
        let id = scene.spawn("Player").unwrap();
        assert_eq!(scene.root("Player"), Some(id));
        assert_eq!(scene.find("Player"), Some(id));
        assert!(matches!(
            scene.spawn("Player"),
            Err(EngineError::DuplicateChild { .. })
        ));
        // The rejected spawn leaves no orphan behind.
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn find_walks_paths() {
        let mut scene = Scene::new();
        let player = scene.spawn("Player").unwrap();
        let camera = scene.create("Camera");
        scene.add_child(player, camera).unwrap();
        assert_eq!(scene.find("Player/Camera"), Some(camera));
        assert_eq!(scene.find("Player/Hand"), None);
        assert_eq!(scene.find(""), None);
    }

    #[test]
    fn self_parenting_is_a_cycle() {
        let mut scene = Scene::new();
        let a = scene.spawn("A").unwrap();
        let err = scene.add_child(a, a).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn world_matrix_composes_parent_first() {
        let mut scene = Scene::new();
        let parent = scene.spawn("P").unwrap();
        let child = scene.create("C");
        scene.add_child(parent, child).unwrap();
        scene.set_local_rotation(parent, Vec3::new(0.0, 90.0, 0.0)).unwrap();
        scene.set_local_position(child, Vec3::new(0.0, 0.0, 1.0)).unwrap();

        // Child sits one unit along the parent's forward, which yaw 90 maps to +X.
        assert!(approx(scene.world_position(child).unwrap(), Vec3::X));
        assert!(approx(scene.forward(child).unwrap(), Vec3::X));
    }

    #[test]
    fn invalidation_reaches_descendants() {
        let mut scene = Scene::new();
        let a = scene.spawn("A").unwrap();
        let b = scene.create("B");
        let c = scene.create("C");
        scene.add_child(a, b).unwrap();
        scene.add_child(b, c).unwrap();
        scene.world_matrix(c).unwrap();
        assert!(!scene.transform(a).unwrap().is_dirty());

        scene.translate(a, Vec3::Y).unwrap();
        assert!(scene.transform(b).unwrap().is_dirty());
        assert!(scene.transform(c).unwrap().is_dirty());
        assert!(approx(scene.world_position(c).unwrap(), Vec3::Y));
    }

    #[test]
    fn resolve_counts_dirty_nodes() {
        let mut scene = Scene::new();
        let a = scene.spawn("A").unwrap();
        let b = scene.create("B");
        scene.add_child(a, b).unwrap();
        assert_eq!(scene.resolve_transforms().unwrap(), 2);
        assert_eq!(scene.resolve_transforms().unwrap(), 0);
        scene.rotate(b, Vec3::new(0.0, 10.0, 0.0)).unwrap();
        assert_eq!(scene.resolve_transforms().unwrap(), 1);
    }

    #[test]
    fn transposed_queries_follow_grid_axes() {
        let mut scene = Scene::with_grid_axes(GridAxes::MirrorZ);
        let a = scene.spawn("A").unwrap();
        scene.set_local_position(a, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert!(approx(
            scene.world_position_transposed(a).unwrap(),
            Vec3::new(1.0, 2.0, -3.0)
        ));
        assert!(approx(scene.forward_transposed(a).unwrap(), -Vec3::Z));
    }

    #[test]
    fn require_component_reports_contract_violation() {
        let mut scene = Scene::new();
        let a = scene.spawn("A").unwrap();
        assert!(scene.require_component::<Camera>(a).unwrap_err().is_fatal());
        scene.add_component(a, Camera::default()).unwrap();
        assert!(scene.require_component::<Camera>(a).is_ok());
        assert_eq!(scene.objects_with::<Camera>(), vec![a]);
    }

    #[test]
    fn stale_ids_do_not_resolve() {
        let mut scene = Scene::new();
        let a = scene.spawn("A").unwrap();
        scene.destroy(a).unwrap();
        let b = scene.spawn("A").unwrap();
        assert_ne!(a, b);
        assert!(scene.get(a).is_none());
        assert!(matches!(
            scene.world_position(a),
            Err(EngineError::NotFound { .. })
        ));
    }
}
