//! Invasion Engine Library
//!
//! Gameplay runtime core of a first-person voxel game: a transform
//! hierarchy with cached world matrices, a closed component registry,
//! entity lifecycle, a kinematic rigidbody that collides with the block
//! grid, and voxel raycasting for block placement and removal.
//!
//! Rendering, windowing and persistence are external. The host feeds an
//! [`InputService`], owns a [`BlockWorld`], and calls [`Simulation::tick`]
//! once per frame.
//!
//! # Modules
//!
//! - [`scene`] - Scene graph, transforms and components
//! - [`entity`] - Entity lifecycle and the player entity
//! - [`physics`] - Rigidbody and swept collision against blocks
//! - [`world`] - Block types, block storage and raycasting
//! - [`camera`] - Camera component and GPU uniform
//! - [`input`] - Polled input service and reference state
//! - [`simulation`] - Tick driver
//!
//! # Example
//!
//! ```ignore
//! use invasion_engine::{EngineConfig, EntityPlayer, InputState, Simulation, VoxelGrid};
//! use invasion_engine::world::BlockType;
//! use glam::IVec3;
//!
//! let mut world = VoxelGrid::new();
//! world.fill(IVec3::new(-8, 0, -8), IVec3::new(8, 0, 8), BlockType::BEDROCK);
//!
//! let mut sim = Simulation::new(world, EngineConfig::default());
//! let mut input = InputState::new();
//! sim.spawn("Player", &mut input, |object, config| {
//!     EntityPlayer::new(object, &config.player)
//! })?;
//!
//! input.begin_frame(1.0 / 60.0);
//! sim.tick(&mut input)?;
//! ```

pub mod camera;
pub mod config;
pub mod entity;
pub mod error;
pub mod input;
pub mod math;
pub mod physics;
pub mod scene;
pub mod simulation;
pub mod world;

pub use camera::{Camera, CameraUniform};
pub use config::{ConfigError, EngineConfig, PhysicsConfig, PlayerConfig};
pub use entity::{Entity, EntityContext, EntityCore, EntityPlayer, LifecycleState};
pub use error::{EngineError, EngineResult};
pub use input::{InputService, InputState, KeyCode, MouseButton};
pub use math::GridAxes;
pub use physics::Rigidbody;
pub use scene::{ComponentKind, GameObject, ObjectId, Scene};
pub use simulation::{EntityId, Simulation, TickReport};
pub use world::{BlockType, BlockWorld, RaycastHit, VoxelGrid};
