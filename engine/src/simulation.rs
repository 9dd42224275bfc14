//! Simulation tick driver.
//!
//! Owns the scene, the block world and the registered entities, and runs one
//! tick at a time:
//!
//! 1. entity updates, in registration order
//! 2. physics phase for bodies nobody moved this tick
//! 3. transform resolution
//! 4. `InputService::end_frame`
//!
//! Input sampling happens before the call and is the host's job. A contract
//! violation stops the tick immediately; later entities are not updated.

use slotmap::{SlotMap, new_key_type};

use crate::config::EngineConfig;
use crate::entity::{self, Entity, EntityContext};
use crate::error::{EngineError, EngineResult};
use crate::input::InputService;
use crate::physics;
use crate::scene::{ObjectId, Scene};
use crate::world::BlockWorld;

new_key_type! {
    /// Handle to an entity registered with a [`Simulation`].
    pub struct EntityId;
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    pub entities_updated: usize,
    pub bodies_integrated: usize,
    pub transforms_resolved: usize,
}

pub struct Simulation<W: BlockWorld> {
    scene: Scene,
    world: W,
    config: EngineConfig,
    entities: SlotMap<EntityId, Box<dyn Entity>>,
    /// Update order (registration order).
    order: Vec<EntityId>,
    tick: u64,
}

impl<W: BlockWorld> Simulation<W> {
    pub fn new(world: W, config: EngineConfig) -> Self {
        Self {
            scene: Scene::with_grid_axes(config.grid_axes),
            world,
            config,
            entities: SlotMap::with_key(),
            order: Vec::new(),
            tick: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    pub fn entity(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities.get(id).map(|e| e.as_ref())
    }

    /// Entity ids in update order.
    pub fn entity_ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Spawn a root object named `name`, bind the entity built by `build`
    /// to it, initialize it and register it for updates.
    ///
    /// If initialization fails the object is removed again.
    pub fn spawn<E, F>(
        &mut self,
        name: &str,
        input: &mut dyn InputService,
        build: F,
    ) -> EngineResult<EntityId>
    where
        E: Entity + 'static,
        F: FnOnce(ObjectId, &EngineConfig) -> E,
    {
        let object = self.scene.spawn(name)?;
        let mut entity: Box<dyn Entity> = Box::new(build(object, &self.config));
        if entity.object() != object {
            self.scene.destroy(object)?;
            return Err(EngineError::contract(format!(
                "'{}' must be bound to the object spawned for it",
                entity.registry_name()
            )));
        }

        let mut ctx = EntityContext {
            scene: &mut self.scene,
            world: &mut self.world,
            input,
            config: &self.config,
            dt: 0.0,
        };
        if let Err(err) = entity::initialize(entity.as_mut(), &mut ctx) {
            ctx.scene.destroy(object)?;
            return Err(err);
        }

        let id = self.entities.insert(entity);
        self.order.push(id);
        Ok(id)
    }

    /// Destroy an entity and its object subtree and stop updating it.
    pub fn despawn(&mut self, id: EntityId) -> EngineResult<()> {
        let mut entity = self
            .entities
            .remove(id)
            .ok_or_else(|| EngineError::not_found(format!("entity {id:?}")))?;
        self.order.retain(|other| *other != id);
        entity::destroy(entity.as_mut(), &mut self.scene)
    }

    /// Run one tick.
    pub fn tick(&mut self, input: &mut dyn InputService) -> EngineResult<TickReport> {
        let dt = input.delta_time();
        let mut report = TickReport {
            tick: self.tick + 1,
            ..Default::default()
        };

        for id in &self.order {
            let Some(entity) = self.entities.get_mut(*id) else {
                continue;
            };
            let mut ctx = EntityContext {
                scene: &mut self.scene,
                world: &mut self.world,
                input: &mut *input,
                config: &self.config,
                dt,
            };
            match entity::update(entity.as_mut(), &mut ctx) {
                Ok(()) => report.entities_updated += 1,
                Err(err) if err.is_fatal() => {
                    log::error!("tick {} halted by '{}': {}", report.tick, entity.registry_name(), err);
                    return Err(err);
                }
                Err(err) => log::warn!("'{}' update failed: {}", entity.registry_name(), err),
            }
        }

        report.bodies_integrated =
            physics::integrate_idle_bodies(&mut self.scene, &self.world, dt, &self.config.physics)?;
        report.transforms_resolved = self.scene.resolve_transforms()?;
        input.end_frame();

        self.tick = report.tick;
        log::trace!("{:?}", report);
        Ok(report)
    }
}
