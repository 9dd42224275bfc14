//! Entity Module
//!
//! An entity is gameplay logic bound one-to-one to a scene object. The
//! shared lifecycle is an explicit state machine checked at every entry
//! point:
//!
//! ```text
//! Uninitialized --initialize--> Initialized --update--> Updating --update--> ...
//!        \______________________________|______________________|--destroy--> Destroyed
//! ```
//!
//! Calling [`initialize`] twice, [`update`] before [`initialize`] or after
//! [`destroy`], or destroying twice is a contract violation.

pub mod player;

pub use player::EntityPlayer;

use glam::Vec3;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::input::InputService;
use crate::physics::{BodyShape, Rigidbody};
use crate::scene::{ObjectId, Scene};
use crate::world::BlockWorld;

/// Where an entity is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    Updating,
    Destroyed,
}

/// Shared entity attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityAttributes {
    pub max_health: f32,
    pub health: f32,
    /// Speed cap without sprint (blocks/s)
    pub walking_speed: f32,
    /// Speed cap with sprint (blocks/s)
    pub running_speed: f32,
    /// Collision box used for the entity's rigidbody
    pub shape: BodyShape,
}

impl EntityAttributes {
    pub fn new(max_health: f32, walking_speed: f32, running_speed: f32, shape: BodyShape) -> Self {
        Self {
            max_health,
            health: max_health,
            walking_speed,
            running_speed,
            shape,
        }
    }
}

/// State every entity carries.
#[derive(Debug, Clone)]
pub struct EntityCore {
    registry_name: &'static str,
    object: ObjectId,
    state: LifecycleState,
    pub attributes: EntityAttributes,
}

impl EntityCore {
    pub fn new(registry_name: &'static str, object: ObjectId, attributes: EntityAttributes) -> Self {
        Self {
            registry_name,
            object,
            state: LifecycleState::Uninitialized,
            attributes,
        }
    }

    #[inline]
    pub fn registry_name(&self) -> &'static str {
        self.registry_name
    }

    /// Scene object this entity is bound to.
    #[inline]
    pub fn object(&self) -> ObjectId {
        self.object
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.attributes.health > 0.0
    }

    /// Subtract health, never below zero. Returns whether the entity is alive.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if amount.is_finite() && amount > 0.0 {
            self.attributes.health = (self.attributes.health - amount).max(0.0);
        }
        self.is_alive()
    }

    /// Add health, never above the maximum.
    pub fn heal(&mut self, amount: f32) {
        if amount.is_finite() && amount > 0.0 {
            self.attributes.health = (self.attributes.health + amount).min(self.attributes.max_health);
        }
    }
}

/// Everything an entity may touch during a lifecycle call.
pub struct EntityContext<'a> {
    pub scene: &'a mut Scene,
    pub world: &'a mut dyn BlockWorld,
    pub input: &'a mut dyn InputService,
    pub config: &'a EngineConfig,
    /// Seconds covered by this tick
    pub dt: f32,
}

/// Gameplay behaviour layered on the shared lifecycle.
///
/// Implementors provide the hooks; the free functions [`initialize`],
/// [`update`] and [`destroy`] enforce the state machine around them.
pub trait Entity {
    fn core(&self) -> &EntityCore;

    fn core_mut(&mut self) -> &mut EntityCore;

    /// Runs once after the rigidbody is attached.
    fn on_initialize(&mut self, _ctx: &mut EntityContext<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// Runs once per tick.
    fn on_update(&mut self, _ctx: &mut EntityContext<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// Runs before the bound object is destroyed.
    fn on_destroy(&mut self, _scene: &mut Scene) {}

    fn registry_name(&self) -> &'static str {
        self.core().registry_name()
    }

    fn object(&self) -> ObjectId {
        self.core().object()
    }

    fn state(&self) -> LifecycleState {
        self.core().state()
    }

    fn walking_speed(&self) -> f32 {
        self.core().attributes.walking_speed
    }

    fn running_speed(&self) -> f32 {
        self.core().attributes.running_speed
    }
}

/// Uninitialized → Initialized. Attaches the entity's rigidbody, then runs
/// its `on_initialize` hook.
pub fn initialize(entity: &mut dyn Entity, ctx: &mut EntityContext<'_>) -> EngineResult<()> {
    let core = entity.core();
    if core.state() != LifecycleState::Uninitialized {
        return Err(EngineError::contract(format!(
            "'{}' initialized twice (state {:?})",
            core.registry_name(),
            core.state()
        )));
    }

    let object = core.object();
    let shape = core.attributes.shape;
    if !ctx.scene.contains(object) {
        return Err(EngineError::contract(format!(
            "'{}' is bound to an object that does not exist",
            core.registry_name()
        )));
    }
    ctx.scene.add_component(object, Rigidbody::with_shape(shape))?;
    entity.on_initialize(ctx)?;

    entity.core_mut().state = LifecycleState::Initialized;
    log::debug!("initialized '{}'", entity.registry_name());
    Ok(())
}

/// One tick of entity logic. Only valid between initialize and destroy.
pub fn update(entity: &mut dyn Entity, ctx: &mut EntityContext<'_>) -> EngineResult<()> {
    match entity.state() {
        LifecycleState::Initialized | LifecycleState::Updating => {}
        LifecycleState::Uninitialized => {
            return Err(EngineError::contract(format!(
                "'{}' updated before initialize",
                entity.registry_name()
            )));
        }
        LifecycleState::Destroyed => {
            return Err(EngineError::contract(format!(
                "'{}' updated after destroy",
                entity.registry_name()
            )));
        }
    }
    entity.core_mut().state = LifecycleState::Updating;
    entity.on_update(ctx)
}

/// Run the destroy hook and remove the bound object (with its children and
/// components) from the scene.
pub fn destroy(entity: &mut dyn Entity, scene: &mut Scene) -> EngineResult<()> {
    if entity.state() == LifecycleState::Destroyed {
        return Err(EngineError::contract(format!(
            "'{}' destroyed twice",
            entity.registry_name()
        )));
    }
    entity.on_destroy(scene);
    match scene.destroy(entity.object()) {
        Ok(_) | Err(EngineError::NotFound { .. }) => {}
        Err(err) => return Err(err),
    }
    entity.core_mut().state = LifecycleState::Destroyed;
    log::debug!("destroyed '{}'", entity.registry_name());
    Ok(())
}

/// Horizontal projection of `v`, normalized (zero stays zero).
pub(crate) fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;
    use crate::world::VoxelGrid;

    struct Dummy {
        core: EntityCore,
        updates: u32,
    }

    impl Entity for Dummy {
        fn core(&self) -> &EntityCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut EntityCore {
            &mut self.core
        }

        fn on_update(&mut self, _ctx: &mut EntityContext<'_>) -> EngineResult<()> {
            self.updates += 1;
            Ok(())
        }
    }

    fn dummy(object: ObjectId) -> Dummy {
        Dummy {
            core: EntityCore::new(
                "entity_dummy",
                object,
                EntityAttributes::new(10.0, 2.0, 4.0, BodyShape::new(0.4, 0.8)),
            ),
            updates: 0,
        }
    }

    #[test]
    fn lifecycle_walks_the_state_machine() {
        let mut scene = Scene::new();
        let mut world = VoxelGrid::new();
        let mut input = InputState::new();
        let config = EngineConfig::default();
        let object = scene.spawn("Dummy").unwrap();
        let mut entity = dummy(object);

        let mut ctx = EntityContext {
            scene: &mut scene,
            world: &mut world,
            input: &mut input,
            config: &config,
            dt: 0.1,
        };
        assert!(update(&mut entity, &mut ctx).unwrap_err().is_fatal());

        initialize(&mut entity, &mut ctx).unwrap();
        assert_eq!(entity.state(), LifecycleState::Initialized);
        assert!(ctx.scene.has_component::<Rigidbody>(object));
        assert!(initialize(&mut entity, &mut ctx).unwrap_err().is_fatal());

        update(&mut entity, &mut ctx).unwrap();
        update(&mut entity, &mut ctx).unwrap();
        assert_eq!(entity.state(), LifecycleState::Updating);
        assert_eq!(entity.updates, 2);

        destroy(&mut entity, ctx.scene).unwrap();
        assert!(!ctx.scene.contains(object));
        assert!(update(&mut entity, &mut ctx).unwrap_err().is_fatal());
        assert!(destroy(&mut entity, ctx.scene).unwrap_err().is_fatal());
    }

    #[test]
    fn health_stays_in_range() {
        let mut scene = Scene::new();
        let mut core = dummy(scene.spawn("D").unwrap()).core;
        assert!(core.apply_damage(4.0));
        core.heal(100.0);
        assert_eq!(core.attributes.health, 10.0);
        assert!(!core.apply_damage(25.0));
        assert_eq!(core.attributes.health, 0.0);
    }

    #[test]
    fn speeds_come_from_attributes() {
        let mut scene = Scene::new();
        let entity = dummy(scene.spawn("D").unwrap());
        assert_eq!(entity.walking_speed(), 2.0);
        assert_eq!(entity.running_speed(), 4.0);
        assert_eq!(entity.registry_name(), "entity_dummy");
    }
}
